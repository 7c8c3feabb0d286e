// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// remove reads whose overlaps carry too many mismatches
//

use super::graph::{Color, GraphVisitor, StringGraph, VertexId};

#[derive(Debug)]
pub struct ErrorFilterVisitor {
    max_error_rate: f64,
    removed: usize,
}

impl ErrorFilterVisitor {
    pub fn new(max_error_rate: f64) -> Self {
        ErrorFilterVisitor {
            max_error_rate,
            removed: 0,
        }
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

pub fn error_rate(g: &StringGraph, v: VertexId) -> f64 {
    let mut bp_overlap = 0_u64;
    let mut num_diff = 0_u64;
    for e in g[v].all_edges() {
        bp_overlap += g[*e].match_length() as u64;
        num_diff += g[*e].num_diff() as u64;
    }
    if bp_overlap == 0 {
        // no overlap, nothing to judge the read by
        0.0
    } else {
        num_diff as f64 / bp_overlap as f64
    }
}

impl GraphVisitor for ErrorFilterVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        g.set_colors(Color::White);
        self.removed = 0;
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        if error_rate(g, v) > self.max_error_rate {
            g.set_vertex_color(v, Color::Black);
            return true;
        }
        false
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        self.removed = g.sweep_vertices(Color::Black);
        log::info!(
            "error filter: removed {} reads above error rate {}",
            self.removed,
            self.max_error_rate
        );
        assert!(g.check_colors(Color::White));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::overlap::{Match, Overlap, SeqCoord};
    use crate::utils::test_utils::random_genome;

    fn graph() -> StringGraph {
        // b overlaps a with 5 diffs over 50 bases, c overlaps b cleanly, d is alone
        let genome = random_genome(100, 3);
        let mut g = StringGraph::new();
        for id in ["a", "b", "c", "d"].iter() {
            g.add_vertex(id, genome.clone(), 1).unwrap();
        }
        let m = Match::new(SeqCoord::new(50, 99, 100), SeqCoord::new(0, 49, 100), false, 5);
        g.add_overlap(&Overlap::new("a", "b", m)).unwrap();
        let m = Match::new(SeqCoord::new(50, 99, 100), SeqCoord::new(0, 49, 100), false, 0);
        g.add_overlap(&Overlap::new("b", "c", m)).unwrap();
        g
    }

    #[test]
    fn rates_per_vertex() {
        let g = graph();
        let rate = |id: &str| error_rate(&g, g.vertex_id(id).unwrap());
        assert!((rate("a") - 0.1).abs() < 1e-9);
        assert!((rate("b") - 0.05).abs() < 1e-9);
        assert_eq!(rate("c"), 0.0);
        assert_eq!(rate("d"), 0.0);
    }

    #[test]
    fn removes_reads_above_the_limit() {
        let mut g = graph();
        let mut filter = ErrorFilterVisitor::new(0.08);
        assert!(g.visit(&mut filter));
        assert_eq!(filter.removed(), 1);
        assert!(g.vertex_id("a").is_none());
        // the island has no overlap and is kept
        assert!(g.vertex_id("d").is_some());
        assert_eq!(g.num_edges(), 2);
        g.validate().unwrap();
    }

    #[test]
    fn permissive_limit_keeps_everything() {
        let mut g = graph();
        assert!(!g.visit(&mut ErrorFilterVisitor::new(0.2)));
        assert_eq!(g.num_vertices(), 4);
    }
}
