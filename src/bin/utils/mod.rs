// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

#![allow(dead_code)]

pub mod asqg;
pub mod bubble;
pub mod error_filter;
pub mod fasta;
pub mod graph;
pub mod graph_stats;
pub mod overlap;
pub mod simplify;
pub mod trans_reduction;
pub mod trim;
pub mod variant;
#[cfg(test)]
pub mod test_utils;
pub use libc::{getrusage, rusage, RUSAGE_SELF};

#[derive(Copy, Clone, Debug)]
pub struct Parameters {
    pub trim_rounds: u32,
    pub max_error_rate: f64,
    pub bubble: bool,
    pub variant: bool,
    pub validate: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            trim_rounds: 0,
            max_error_rate: 1.0,
            bubble: true,
            variant: true,
            validate: false,
        }
    }
}

pub fn new_rusage() -> rusage {
    // plain C struct, all zero is a valid value
    unsafe { std::mem::zeroed() }
}

pub fn log_resource(msg: &str, data: &mut rusage) -> (u64, u64, u64) {
    let _res = unsafe { getrusage(RUSAGE_SELF, data) };
    log::info!(
        "{} : (maxRSS, utime, stime): {} {} {}",
        msg,
        data.ru_maxrss,
        data.ru_utime.tv_sec,
        data.ru_stime.tv_sec
    );

    (
        data.ru_maxrss as u64,
        data.ru_utime.tv_sec as u64,
        data.ru_stime.tv_sec as u64,
    )
}
