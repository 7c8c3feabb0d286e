// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// infer the missing overlaps between reads that share a neighbor, remove reads
// found to be contained and add edges for the others
//

use super::graph::{
    Color, EdgeComp, EdgeDesc, GraphVisitor, StringGraph, VertexId, EDGE_DIRECTIONS,
};
use super::overlap::{count_differences, reverse_complement, Match, Overlap};
use rustc_hash::FxHashSet;

/// An inferred overlap is accepted when it has fewer mismatches than this.
pub const MAX_INFERRED_DIFFS: u32 = 10;

#[derive(Debug, Default)]
pub struct VariantVisitor {
    // edges are added after the pass so the adjacency lists stay fixed while visiting
    pending: Vec<Overlap>,
    pending_desc: FxHashSet<(VertexId, EdgeDesc)>,
    num_contained: usize,
    num_inferred: usize,
    removed: usize,
}

impl VariantVisitor {
    pub fn num_inferred(&self) -> usize {
        self.num_inferred
    }

    pub fn num_contained(&self) -> usize {
        self.num_contained
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    fn is_linked(&self, g: &StringGraph, v: VertexId, desc: &EdgeDesc) -> bool {
        g.has_edge(v, desc) || self.pending_desc.contains(&(v, *desc))
    }
}

impl GraphVisitor for VariantVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        g.set_colors(Color::White);
        self.pending.clear();
        self.pending_desc.clear();
        self.num_contained = 0;
        self.num_inferred = 0;
        self.removed = 0;
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        if g[v].color() == Color::Red {
            return false;
        }
        let mut changed_graph = false;
        for dir in EDGE_DIRECTIONS.iter() {
            let edges = g[v].edges(*dir).to_vec();
            for i in 0..edges.len() {
                for j in i + 1..edges.len() {
                    let (e_i, e_j) = (edges[i], edges[j]);
                    let (v_i, v_j) = (g[e_i].end(), g[e_j].end());
                    if v_i == v_j || g[v_i].color() == Color::Red || g[v_j].color() == Color::Red
                    {
                        continue;
                    }
                    let comp = if g[e_i].comp() == g[e_j].comp() {
                        EdgeComp::Same
                    } else {
                        EdgeComp::Reverse
                    };

                    // skip pairs that already share an edge either way
                    let ij_desc = EdgeDesc {
                        end: v_j,
                        dir: g.trans_dir(e_i),
                        comp,
                    };
                    let ji_desc = EdgeDesc {
                        end: v_i,
                        dir: g.trans_dir(e_j),
                        comp,
                    };
                    if self.is_linked(g, v_i, &ij_desc) || self.is_linked(g, v_j, &ji_desc) {
                        continue;
                    }

                    let mut match_ij = match Match::infer(g[e_i].matching(), g[e_j].matching())
                    {
                        Some(m) => m,
                        None => continue,
                    };
                    match_ij.expand();

                    let seq_i = match_ij.coord[0].substring(g[v_i].seq());
                    let seq_j = match_ij.coord[1].substring(g[v_j].seq());
                    let num_diff = if match_ij.is_rc() {
                        count_differences(seq_i, &reverse_complement(seq_j))
                    } else {
                        count_differences(seq_i, seq_j)
                    };
                    match_ij.num_diff = num_diff;
                    if num_diff >= MAX_INFERRED_DIFFS {
                        continue;
                    }

                    let ovlp = Overlap::new(g[v_i].id(), g[v_j].id(), match_ij);
                    if match_ij.coord[0].is_contained() || match_ij.coord[1].is_contained() {
                        let contained = if ovlp.contained_idx() == 0 { v_i } else { v_j };
                        log::debug!("variant: {} is contained", g[contained].id());
                        g.set_vertex_color(contained, Color::Red);
                        self.num_contained += 1;
                    } else {
                        log::debug!(
                            "variant: infer {} -> {} with {} diffs",
                            ovlp.id[0],
                            ovlp.id[1],
                            num_diff
                        );
                        self.pending_desc.insert((v_i, ij_desc));
                        self.pending_desc.insert((v_j, ji_desc));
                        self.pending.push(ovlp);
                    }
                    changed_graph = true;
                }
            }
        }
        changed_graph
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        let mut inferred = Vec::with_capacity(self.pending.len());
        for ovlp in self.pending.drain(..) {
            let contained = ovlp.id.iter().any(|id| match g.vertex_id(id) {
                Some(v) => g[v].color() == Color::Red,
                None => true,
            });
            if contained {
                continue;
            }
            match g.add_overlap(&ovlp) {
                Ok((e_ij, e_ji)) => {
                    g.set_edge_color(e_ij, Color::Black);
                    g.set_edge_color(e_ji, Color::Black);
                    inferred.push((e_ij, e_ji));
                    self.num_inferred += 1;
                }
                Err(e) => log::debug!("variant: inferred overlap dropped: {}", e),
            }
        }
        self.pending_desc.clear();
        self.removed = g.sweep_vertices(Color::Red);
        log::info!(
            "variant: inferred {} edge pairs, removed {} contained reads",
            self.num_inferred,
            self.removed
        );
        for (e_ij, e_ji) in inferred {
            g.set_edge_color(e_ij, Color::White);
            g.set_edge_color(e_ji, Color::White);
        }
        assert!(
            g.check_colors(Color::White),
            "variant pass left colored elements behind"
        );
    }
}
