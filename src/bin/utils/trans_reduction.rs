// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// Myers' transitive reduction of the string graph
// (E. W. Myers, The fragment assembly string graph, 2005)
//

use super::graph::{Color, EdgeId, GraphVisitor, StringGraph, VertexId, EDGE_DIRECTIONS};

/// Slack allowed when a two-hop path is compared against a direct edge.
pub const FUZZ: u32 = 10;

#[derive(Debug, Default)]
pub struct TransitiveReductionVisitor {
    marked_verts: usize,
    marked_edges: usize,
    unreduced: usize,
    removed_edges: usize,
}

impl TransitiveReductionVisitor {
    pub fn marked_edges(&self) -> usize {
        self.marked_edges
    }

    pub fn removed_edges(&self) -> usize {
        self.removed_edges
    }

    pub fn unreduced(&self) -> usize {
        self.unreduced
    }
}

impl GraphVisitor for TransitiveReductionVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        g.set_colors(Color::White);
        g.sort_adjacency_by_len();
        self.marked_verts = 0;
        self.marked_edges = 0;
        self.unreduced = 0;
        self.removed_edges = 0;
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        for dir in EDGE_DIRECTIONS.iter() {
            let edges = g[v].edges(*dir).to_vec();
            if edges.is_empty() {
                continue;
            }
            for e in edges.iter() {
                let w = g[*e].end();
                g.set_vertex_color(w, Color::Gray);
            }
            let longest = g[edges[edges.len() - 1]].seq_len() + FUZZ;

            // stage 1: x reachable through a shorter w within the longest edge
            for e in edges.iter() {
                let w = g[*e].end();
                if g[w].color() != Color::Gray {
                    continue;
                }
                let vw_len = g[*e].seq_len();
                let w_edges = g[w].edges(g.trans_dir(*e)).to_vec();
                for wx in w_edges {
                    if vw_len + g[wx].seq_len() > longest {
                        break;
                    }
                    let x = g[wx].end();
                    if g[x].color() == Color::Gray {
                        g.set_vertex_color(x, Color::Black);
                        self.marked_verts += 1;
                    }
                }
            }

            // stage 2: the first edge of each w and very short edges
            for e in edges.iter() {
                let w = g[*e].end();
                let w_edges = g[w].edges(g.trans_dir(*e)).to_vec();
                for (j, wx) in w_edges.iter().enumerate() {
                    if g[*wx].seq_len() >= FUZZ && j != 0 {
                        break;
                    }
                    let x = g[*wx].end();
                    if g[x].color() == Color::Gray {
                        g.set_vertex_color(x, Color::Black);
                        self.marked_verts += 1;
                    }
                }
            }

            let mut trans_count = 0_usize;
            for e in edges.iter() {
                let w = g[*e].end();
                if g[w].color() == Color::Black {
                    let twin = g[*e].twin();
                    g.set_edge_color(*e, Color::Black);
                    g.set_edge_color(twin, Color::Black);
                    self.marked_edges += 2;
                    trans_count += 1;
                }
                g.set_vertex_color(w, Color::White);
            }
            if trans_count + 1 != edges.len() {
                self.unreduced += 1;
                log::debug!(
                    "vertex {} could not be completely reduced ({}, {})",
                    g[v].id(),
                    trans_count,
                    edges.len()
                );
                for e in edges.iter() {
                    if g[*e].color() != Color::Black {
                        log_remaining_edge(g, *e);
                    }
                }
            }
        }
        false
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        log::info!(
            "TR marked {} verts and {} edges",
            self.marked_verts,
            self.marked_edges
        );
        if self.unreduced > 0 {
            log::warn!(
                "TR: {} vertex sides could not be completely reduced",
                self.unreduced
            );
        }
        self.removed_edges = g.sweep_edges(Color::Black);
        assert!(
            g.check_colors(Color::White),
            "transitive reduction left colored elements behind"
        );
    }
}

fn log_remaining_edge(g: &StringGraph, e: EdgeId) {
    let edge = &g[e];
    log::debug!(
        "remaining edge: {} -> {} {:?} {:?} len {}",
        g[edge.start()].id(),
        g[edge.end()].id(),
        edge.dir(),
        edge.comp(),
        edge.seq_len()
    );
}
