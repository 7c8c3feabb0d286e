// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

#![allow(dead_code)]

//
// overlap geometry between two reads: coordinates, composition and expansion
//

use std::cmp::{max, min};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeqCoord {
    // inclusive interval [start, end] on a sequence of length seq_len
    pub start: u32,
    pub end: u32,
    pub seq_len: u32,
}

impl SeqCoord {
    pub fn new(start: u32, end: u32, seq_len: u32) -> Self {
        SeqCoord {
            start,
            end,
            seq_len,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end && self.end < self.seq_len
    }

    pub fn length(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn unmatched_length(&self) -> u32 {
        self.seq_len - self.length()
    }

    pub fn is_left_extreme(&self) -> bool {
        self.start == 0
    }

    pub fn is_right_extreme(&self) -> bool {
        self.end + 1 == self.seq_len
    }

    pub fn is_extreme(&self) -> bool {
        self.is_left_extreme() || self.is_right_extreme()
    }

    pub fn is_contained(&self) -> bool {
        self.is_left_extreme() && self.is_right_extreme()
    }

    pub fn flip(&self) -> SeqCoord {
        // the same interval in the reverse complement frame
        SeqCoord {
            start: self.seq_len - 1 - self.end,
            end: self.seq_len - 1 - self.start,
            seq_len: self.seq_len,
        }
    }

    pub fn substring<'a>(&self, seq: &'a [u8]) -> &'a [u8] {
        let bgn = min(self.start as usize, seq.len());
        let end = min(self.end as usize + 1, seq.len());
        &seq[bgn..end]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Match {
    // coord[0] is on sequence 0, coord[1] on sequence 1; when is_reverse is set
    // coord[0].start pairs with coord[1].end
    pub coord: [SeqCoord; 2],
    pub is_reverse: bool,
    pub num_diff: u32,
}

impl Match {
    pub fn new(c0: SeqCoord, c1: SeqCoord, is_reverse: bool, num_diff: u32) -> Self {
        Match {
            coord: [c0, c1],
            is_reverse,
            num_diff,
        }
    }

    pub fn is_rc(&self) -> bool {
        self.is_reverse
    }

    pub fn swap(&self) -> Match {
        Match {
            coord: [self.coord[1], self.coord[0]],
            is_reverse: self.is_reverse,
            num_diff: self.num_diff,
        }
    }

    pub fn translate(&self, pos: i64) -> i64 {
        //
        // map a position on sequence 0 onto sequence 1
        //
        let offset = pos - self.coord[0].start as i64;
        if self.is_reverse {
            self.coord[1].end as i64 - offset
        } else {
            self.coord[1].start as i64 + offset
        }
    }

    pub fn translate_coord(&self, c: &SeqCoord) -> SeqCoord {
        let p0 = self.translate(c.start as i64);
        let p1 = self.translate(c.end as i64);
        let last = self.coord[1].seq_len as i64 - 1;
        let bgn = min(p0, p1).max(0).min(last);
        let end = max(p0, p1).max(0).min(last);
        SeqCoord::new(bgn as u32, end as u32, self.coord[1].seq_len)
    }

    pub fn infer(match_xy: &Match, match_xz: &Match) -> Option<Match> {
        //
        // infer the y-z match from the x-y and x-z matches, both seen from x
        //
        let bgn = max(match_xy.coord[0].start, match_xz.coord[0].start);
        let end = min(match_xy.coord[0].end, match_xz.coord[0].end);
        if bgn > end {
            return None;
        }
        let x_shared = SeqCoord::new(bgn, end, match_xy.coord[0].seq_len);
        let on_y = match_xy.translate_coord(&x_shared);
        let on_z = match_xz.translate_coord(&x_shared);
        Some(Match::new(
            on_y,
            on_z,
            match_xy.is_reverse != match_xz.is_reverse,
            0,
        ))
    }

    pub fn expand(&mut self) {
        //
        // grow the match so that one sequence is left terminal and the other is right terminal
        //
        let mut c0 = self.coord[0];
        let mut c1 = if self.is_reverse {
            self.coord[1].flip()
        } else {
            self.coord[1]
        };
        let left = min(c0.start, c1.start);
        c0.start -= left;
        c1.start -= left;
        let right = min(c0.seq_len - 1 - c0.end, c1.seq_len - 1 - c1.end);
        c0.end += right;
        c1.end += right;
        self.coord[0] = c0;
        self.coord[1] = if self.is_reverse { c1.flip() } else { c1 };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub id: [String; 2],
    pub matching: Match,
}

impl Overlap {
    pub fn new(id0: &str, id1: &str, matching: Match) -> Self {
        Overlap {
            id: [id0.to_string(), id1.to_string()],
            matching,
        }
    }

    pub fn contained_idx(&self) -> usize {
        // when both sides are contained (identical reads) the lexicographically smaller id survives
        let c = &self.matching.coord;
        if c[0].is_contained() && c[1].is_contained() {
            if self.id[0] < self.id[1] {
                1
            } else {
                0
            }
        } else if c[0].is_contained() {
            0
        } else {
            1
        }
    }
}

fn complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        _ => b'N',
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|b| complement(*b)).collect()
}

pub fn count_differences(s0: &[u8], s1: &[u8]) -> u32 {
    // position-wise mismatches, length difference counts as mismatches
    let n = min(s0.len(), s1.len());
    let mut diff = (max(s0.len(), s1.len()) - n) as u32;
    for i in 0..n {
        if !s0[i].eq_ignore_ascii_case(&s1[i]) {
            diff += 1;
        }
    }
    diff
}
