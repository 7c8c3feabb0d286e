// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

const VERSION_STRING: &'static str = env!("VERSION_STRING");

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::clap_app;
use std::io::{self, ErrorKind};

mod utils;
use simple_logger::SimpleLogger;
use utils::asqg::load_graph;
use utils::simplify::SimplifyStep;

fn main() -> Result<(), std::io::Error> {
    let matches = clap_app!(sg_stats =>
        (version: VERSION_STRING)
        (author: "Jason Chin <jason@omnibio.ai>")
        (about: "
String graph simplification
sg_stats: load a graph and report the vertex shape counts
LICENSE: http://creativecommons.org/licenses/by-nc-sa/4.0/")
        (@arg ASQG: +required +multiple "ASQG graph files or glob patterns, .gz accepted")
        (@arg validate: --validate "Check the graph structure after loading")
        (@arg log: --log +takes_value "log level: DEBUG or INFO (default)")
    )
    .get_matches();

    let log_level = match matches.value_of("log").unwrap_or("INFO") {
        "DEBUG" => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };

    SimpleLogger::new()
        .with_level(log_level)
        .with_utc_timestamps()
        .init()
        .unwrap();

    let inputs = matches
        .values_of("ASQG")
        .unwrap()
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let mut g = load_graph(&inputs).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
    if matches.is_present("validate") {
        g.validate()
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
        log::info!("graph structure is consistent");
    }
    SimplifyStep::Stats.run(&mut g);
    Ok(())
}
