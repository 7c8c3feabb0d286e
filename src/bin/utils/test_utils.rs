// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// graph builders for the unit tests: reads are placed on a random genome and the
// overlaps are computed from their positions
//

use super::graph::StringGraph;
use super::overlap::{reverse_complement, Match, Overlap, SeqCoord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::{max, min};

#[derive(Debug, Copy, Clone)]
pub struct Read {
    pub name: &'static str,
    pub pos: usize,
    pub len: usize,
    pub rc: bool,
}

impl Read {
    pub fn fwd(name: &'static str, pos: usize, len: usize) -> Self {
        Read {
            name,
            pos,
            len,
            rc: false,
        }
    }

    pub fn rev(name: &'static str, pos: usize, len: usize) -> Self {
        Read {
            name,
            pos,
            len,
            rc: true,
        }
    }

    pub fn seq(&self, genome: &[u8]) -> Vec<u8> {
        let s = &genome[self.pos..self.pos + self.len];
        if self.rc {
            reverse_complement(s)
        } else {
            s.to_vec()
        }
    }

    fn coord(&self, bgn: usize, end: usize) -> SeqCoord {
        let c = SeqCoord::new(
            (bgn - self.pos) as u32,
            (end - 1 - self.pos) as u32,
            self.len as u32,
        );
        if self.rc {
            c.flip()
        } else {
            c
        }
    }
}

pub fn random_genome(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0, 4)]).collect()
}

pub fn layout_match(a: &Read, b: &Read) -> Option<Match> {
    let bgn = max(a.pos, b.pos);
    let end = min(a.pos + a.len, b.pos + b.len);
    if end <= bgn {
        return None;
    }
    Some(Match::new(
        a.coord(bgn, end),
        b.coord(bgn, end),
        a.rc != b.rc,
        0,
    ))
}

pub fn add_layout_overlap(g: &mut StringGraph, a: &Read, b: &Read) {
    let m = layout_match(a, b).unwrap();
    g.add_overlap(&Overlap::new(a.name, b.name, m)).unwrap();
}

pub fn add_coord_overlap(
    g: &mut StringGraph,
    a: &str,
    b: &str,
    ca: (u32, u32),
    cb: (u32, u32),
    rc: bool,
) {
    let la = g[g.vertex_id(a).unwrap()].seq_len();
    let lb = g[g.vertex_id(b).unwrap()].seq_len();
    let m = Match::new(
        SeqCoord::new(ca.0, ca.1, la),
        SeqCoord::new(cb.0, cb.1, lb),
        rc,
        0,
    );
    g.add_overlap(&Overlap::new(a, b, m)).unwrap();
}

pub fn layout_graph_with(genome: &[u8], reads: &[Read], min_overlap: u32) -> StringGraph {
    //
    // all pairwise dovetail overlaps of at least min_overlap bases
    //
    let mut g = StringGraph::new();
    for r in reads {
        g.add_vertex(r.name, r.seq(genome), 1).unwrap();
    }
    for i in 0..reads.len() {
        for j in i + 1..reads.len() {
            if let Some(m) = layout_match(&reads[i], &reads[j]) {
                if m.coord[0].length() < min_overlap
                    || m.coord[0].is_contained()
                    || m.coord[1].is_contained()
                {
                    continue;
                }
                g.add_overlap(&Overlap::new(reads[i].name, reads[j].name, m))
                    .unwrap();
            }
        }
    }
    g
}

pub fn layout_graph(reads: &[Read], min_overlap: u32) -> StringGraph {
    let genome_len = reads.iter().map(|r| r.pos + r.len).max().unwrap_or(0);
    let genome = random_genome(genome_len, 42);
    layout_graph_with(&genome, reads, min_overlap)
}

pub fn random_reads(n: usize, read_len: usize, step: usize, seed: u64) -> Vec<Read> {
    //
    // evenly tiled reads with random strands and a little jitter, no containments
    //
    const NAMES: [&str; 64] = [
        "r00", "r01", "r02", "r03", "r04", "r05", "r06", "r07", "r08", "r09", "r10", "r11",
        "r12", "r13", "r14", "r15", "r16", "r17", "r18", "r19", "r20", "r21", "r22", "r23",
        "r24", "r25", "r26", "r27", "r28", "r29", "r30", "r31", "r32", "r33", "r34", "r35",
        "r36", "r37", "r38", "r39", "r40", "r41", "r42", "r43", "r44", "r45", "r46", "r47",
        "r48", "r49", "r50", "r51", "r52", "r53", "r54", "r55", "r56", "r57", "r58", "r59",
        "r60", "r61", "r62", "r63",
    ];
    assert!(n <= NAMES.len() && step > 2);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let pos = i * step + rng.gen_range(0, step / 2);
            if rng.gen::<bool>() {
                Read::rev(NAMES[i], pos, read_len)
            } else {
                Read::fwd(NAMES[i], pos, read_len)
            }
        })
        .collect()
}
