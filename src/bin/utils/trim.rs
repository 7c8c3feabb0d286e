// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// dead-end trimming and island removal
//

use super::graph::{Color, GraphVisitor, StringGraph, VertexId, EDGE_DIRECTIONS};

#[derive(Debug, Default)]
pub struct TrimVisitor {
    num_island: usize,
    num_terminal: usize,
    num_contig: usize,
    removed: usize,
}

impl TrimVisitor {
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.num_island, self.num_terminal, self.num_contig)
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl GraphVisitor for TrimVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        self.num_island = 0;
        self.num_terminal = 0;
        self.num_contig = 0;
        self.removed = 0;
        g.set_colors(Color::White);
    }

    // mark vertices without an extension on either side
    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        let mut noext = [false, false];
        for (idx, dir) in EDGE_DIRECTIONS.iter().enumerate() {
            if g[v].count_edges(*dir) == 0 {
                g.set_vertex_color(v, Color::Black);
                noext[idx] = true;
            }
        }
        if noext[0] && noext[1] {
            self.num_island += 1;
        } else if noext[0] || noext[1] {
            self.num_terminal += 1;
        } else {
            self.num_contig += 1;
        }
        noext[0] || noext[1]
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        self.removed = g.sweep_vertices(Color::Black);
        log::info!(
            "island: {} terminal: {} contig: {}",
            self.num_island,
            self.num_terminal,
            self.num_contig
        );
        assert!(g.check_colors(Color::White));
    }
}

#[derive(Debug, Default)]
pub struct IslandVisitor {
    removed: usize,
}

impl IslandVisitor {
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl GraphVisitor for IslandVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        self.removed = 0;
        g.set_colors(Color::White);
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        if g[v].total_edges() == 0 {
            g.set_vertex_color(v, Color::Black);
            return true;
        }
        false
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        self.removed = g.sweep_vertices(Color::Black);
        log::info!("islands removed: {}", self.removed);
        assert!(g.check_colors(Color::White));
    }
}
