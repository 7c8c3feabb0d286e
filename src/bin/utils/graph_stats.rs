// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

use super::graph::{EdgeDir, GraphVisitor, StringGraph, VertexId};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub island: usize,
    pub terminal: usize,
    pub monobranch: usize,
    pub dibranch: usize,
    pub transitive: usize,
    pub vertices: usize,
    pub edges: usize,
}

/// Read-only pass counting vertices by the shape of their adjacency.
#[derive(Debug, Default)]
pub struct GraphStatsVisitor {
    stats: GraphStats,
}

impl GraphStatsVisitor {
    pub fn stats(&self) -> GraphStats {
        self.stats
    }
}

impl GraphVisitor for GraphStatsVisitor {
    fn previsit(&mut self, _g: &mut StringGraph) {
        self.stats = GraphStats::default();
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        let s_count = g[v].count_edges(EdgeDir::Sense);
        let as_count = g[v].count_edges(EdgeDir::Antisense);
        let stats = &mut self.stats;
        if s_count == 0 && as_count == 0 {
            stats.island += 1;
        } else if s_count == 0 || as_count == 0 {
            stats.terminal += 1;
        }

        if s_count > 1 && as_count > 1 {
            stats.dibranch += 1;
        } else if s_count > 1 || as_count > 1 {
            stats.monobranch += 1;
        }

        if s_count == 1 || as_count == 1 {
            stats.transitive += 1;
        }
        stats.edges += s_count + as_count;
        stats.vertices += 1;
        false
    }

    fn postvisit(&mut self, _g: &mut StringGraph) {
        let s = &self.stats;
        log::info!(
            "island: {} terminal: {} monobranch: {} dibranch: {} transitive: {}",
            s.island,
            s.terminal,
            s.monobranch,
            s.dibranch,
            s.transitive
        );
        log::info!("Total Vertices: {} Total Edges: {}", s.vertices, s.edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{layout_graph, Read};

    #[test]
    fn classifies_vertex_shapes() {
        // a reaches b and c, b reaches c, d is alone
        let reads = [
            Read::fwd("a", 0, 100),
            Read::fwd("b", 30, 100),
            Read::fwd("c", 60, 100),
            Read::fwd("d", 300, 100),
        ];
        let mut g = layout_graph(&reads, 20);
        let mut stats = GraphStatsVisitor::default();
        assert!(!g.visit(&mut stats));
        let s = stats.stats();
        assert_eq!(s.island, 1);
        assert_eq!(s.terminal, 2);
        assert_eq!(s.monobranch, 2);
        assert_eq!(s.dibranch, 0);
        assert_eq!(s.transitive, 1);
        assert_eq!(s.vertices, 4);
        assert_eq!(s.edges, g.num_edges());
        // nothing is touched
        assert_eq!(g.num_vertices(), 4);
    }

    #[test]
    fn counts_branching_sides() {
        let reads = [
            Read::fwd("a", 0, 100),
            Read::fwd("b", 20, 100),
            Read::fwd("c", 60, 100),
            Read::fwd("d", 80, 100),
        ];
        let mut g = layout_graph(&reads, 20);
        let mut stats = GraphStatsVisitor::default();
        g.visit(&mut stats);
        let s = stats.stats();
        // b: a on the left, c and d on the right; c: a and b on the left, d on the right
        assert_eq!(s.dibranch, 0);
        assert_eq!(s.monobranch, 4);
        assert_eq!(s.transitive, 2);
        assert_eq!(s.edges, 12);
    }
}
