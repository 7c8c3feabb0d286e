// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// pop simple bubbles: a vertex that splits into branches which rejoin on the next vertex
//

use super::graph::{Color, EdgeId, GraphVisitor, StringGraph, VertexId, EDGE_DIRECTIONS};

#[derive(Debug, Default)]
pub struct BubbleVisitor {
    num_bubbles: usize,
    removed: usize,
}

impl BubbleVisitor {
    pub fn num_bubbles(&self) -> usize {
        self.num_bubbles
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

fn bubble_end(g: &StringGraph, vw: EdgeId) -> Option<VertexId> {
    // the far end of w when its branch collapses back into a single edge
    let w = g[vw].end();
    let w_edges = g[w].edges(g.trans_dir(vw));
    if w_edges.len() == 1 {
        Some(g[w_edges[0]].end())
    } else {
        None
    }
}

impl GraphVisitor for BubbleVisitor {
    fn previsit(&mut self, g: &mut StringGraph) {
        g.set_colors(Color::White);
        self.num_bubbles = 0;
        self.removed = 0;
    }

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        let mut bubble_found = false;
        for dir in EDGE_DIRECTIONS.iter() {
            let edges = g[v].edges(*dir).to_vec();
            if edges.len() < 2 {
                continue;
            }

            // overlapping bubble already resolved in this pass, leave it for the next one
            for e in edges.iter() {
                let w = g[*e].end();
                if g[w].color() == Color::Red {
                    log::debug!("bubble: skip {}, {} already marked", g[v].id(), g[w].id());
                    return false;
                }
                if let Some(x) = bubble_end(g, *e) {
                    if g[x].color() == Color::Red {
                        log::debug!("bubble: skip {}, {} already marked", g[v].id(), g[x].id());
                        return false;
                    }
                }
            }

            // mark
            for e in edges.iter() {
                let w = g[*e].end();
                if let Some(x) = bubble_end(g, *e) {
                    if g[x].color() == Color::Black {
                        // another branch reached x first, w is redundant
                        g.set_vertex_color(w, Color::Red);
                        bubble_found = true;
                    } else {
                        if g[x].color() == Color::Red || g[w].color() == Color::Red {
                            log::warn!("bubble: color stomp at {}", g[v].id());
                        }
                        g.set_vertex_color(x, Color::Black);
                        g.set_vertex_color(w, Color::Blue);
                    }
                }
            }

            // unmark
            for e in edges.iter() {
                let w = g[*e].end();
                if let Some(x) = bubble_end(g, *e) {
                    g.set_vertex_color(x, Color::White);
                }
                if g[w].color() == Color::Blue {
                    g.set_vertex_color(w, Color::White);
                }
            }

            if bubble_found {
                self.num_bubbles += 1;
            }
        }
        bubble_found
    }

    fn postvisit(&mut self, g: &mut StringGraph) {
        self.removed = g.sweep_vertices(Color::Red);
        log::info!("bubbles: {}", self.num_bubbles);
        assert!(
            g.check_colors(Color::White),
            "bubble popping left colored elements behind"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::EdgeDir;
    use crate::utils::test_utils::{
        add_layout_overlap, layout_graph, random_genome, random_reads, Read,
    };
    use crate::utils::trans_reduction::TransitiveReductionVisitor;

    fn diamond() -> StringGraph {
        // b and c sit at the same place and differ by one base
        let mut genome = random_genome(300, 5);
        let a = Read::fwd("a", 0, 100);
        let b = Read::fwd("b", 50, 100);
        let c = Read::fwd("c", 50, 100);
        let d = Read::fwd("d", 100, 100);
        let mut g = StringGraph::new();
        g.add_vertex(a.name, a.seq(&genome), 1).unwrap();
        g.add_vertex(b.name, b.seq(&genome), 1).unwrap();
        genome[120] = if genome[120] == b'A' { b'C' } else { b'A' };
        g.add_vertex(c.name, c.seq(&genome), 1).unwrap();
        g.add_vertex(d.name, d.seq(&genome), 1).unwrap();
        add_layout_overlap(&mut g, &a, &b);
        add_layout_overlap(&mut g, &a, &c);
        add_layout_overlap(&mut g, &b, &d);
        add_layout_overlap(&mut g, &c, &d);
        g
    }

    #[test]
    fn pops_diamond() {
        let mut g = diamond();
        let mut bubble = BubbleVisitor::default();
        assert!(g.visit(&mut bubble));
        assert_eq!(bubble.removed(), 1);
        assert_eq!(g.num_vertices(), 3);
        let survivors = ["b", "c"]
            .iter()
            .filter(|n| g.vertex_id(n).is_some())
            .count();
        assert_eq!(survivors, 1);

        let a = g.vertex_id("a").unwrap();
        let d = g.vertex_id("d").unwrap();
        assert_eq!(g[a].count_edges(EdgeDir::Sense), 1);
        assert_eq!(g[d].count_edges(EdgeDir::Antisense), 1);
        let mid = g[g[a].edges(EdgeDir::Sense)[0]].end();
        assert_eq!(g[g[mid].edges(EdgeDir::Sense)[0]].end(), d);
        g.validate().unwrap();

        // nothing left to pop
        assert!(!g.visit(&mut bubble));
        assert_eq!(bubble.removed(), 0);
    }

    #[test]
    fn linear_graph_is_untouched() {
        let reads = random_reads(20, 100, 25, 9);
        let mut g = layout_graph(&reads, 30);
        g.visit(&mut TransitiveReductionVisitor::default());
        let (n, m) = (g.num_vertices(), g.num_edges());
        let mut bubble = BubbleVisitor::default();
        assert!(!g.visit(&mut bubble));
        assert_eq!((g.num_vertices(), g.num_edges()), (n, m));
    }

    #[test]
    fn open_branches_are_not_bubbles() {
        // a splits into b and c which never rejoin
        let mut g = StringGraph::new();
        let genome = random_genome(400, 2);
        let a = Read::fwd("a", 0, 100);
        let b = Read::fwd("b", 50, 100);
        let c = Read::fwd("c", 60, 100);
        for r in [a, b, c].iter() {
            g.add_vertex(r.name, r.seq(&genome), 1).unwrap();
        }
        add_layout_overlap(&mut g, &a, &b);
        add_layout_overlap(&mut g, &a, &c);
        let mut bubble = BubbleVisitor::default();
        assert!(!g.visit(&mut bubble));
        assert_eq!(g.num_vertices(), 3);
    }
}
