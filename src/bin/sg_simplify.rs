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
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind};

mod utils;
use simple_logger::SimpleLogger;
use utils::asqg::{load_graph, write_asqg};
use utils::fasta::FastaVisitor;
use utils::graph::GraphError;
use utils::simplify::simplify;
use utils::{log_resource, new_rusage, Parameters};

fn invalid_data(e: GraphError) -> io::Error {
    match e {
        GraphError::Io(e) => e,
        e => io::Error::new(ErrorKind::InvalidData, e),
    }
}

fn main() -> Result<(), std::io::Error> {
    let mut rdata = new_rusage();

    let matches = clap_app!(sg_simplify =>
        (version: VERSION_STRING)
        (author: "Jason Chin <jason@omnibio.ai>")
        (about: "
String graph simplification
sg_simplify: remove transitive edges, dead ends, bubbles, contained and error-prone reads
LICENSE: http://creativecommons.org/licenses/by-nc-sa/4.0/")
        (@arg ASQG: +required +multiple "ASQG graph files or glob patterns, .gz accepted")
        (@arg out_prefix: --out_prefix +required +takes_value "Prefix of the output .fa and .asqg files")
        (@arg trim_rounds: --trim_rounds +takes_value "Rounds of dead-end trimming [default: 0]")
        (@arg error_rate: --error_rate +takes_value "Remove reads with a larger overlap error rate [default: 1.0, no filter]")
        (@arg no_bubble: --no_bubble "Skip bubble popping")
        (@arg no_variant: --no_variant "Skip overlap inference between reads sharing a neighbor")
        (@arg validate: --validate "Check the graph structure after every pass")
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
    let out_prefix = matches.value_of("out_prefix").unwrap().to_string();

    let trim_rounds = matches
        .value_of("trim_rounds")
        .unwrap_or("0")
        .parse::<u32>()
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;
    let max_error_rate = matches
        .value_of("error_rate")
        .unwrap_or("1.0")
        .parse::<f64>()
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;

    let parameters = Parameters {
        trim_rounds,
        max_error_rate,
        bubble: !matches.is_present("no_bubble"),
        variant: !matches.is_present("no_variant"),
        validate: matches.is_present("validate"),
    };

    log::info!("sg_simplify: version {}", VERSION_STRING);
    log::info!("input: {}", inputs.join(" "));
    log::info!("output prefix: {}", out_prefix);
    log::info!("{:?}", parameters);

    log_resource("BGN: load graph", &mut rdata);
    let mut g = load_graph(&inputs).map_err(invalid_data)?;
    log_resource("END: load graph", &mut rdata);

    log_resource("BGN: simplify", &mut rdata);
    let summary = simplify(&mut g, &parameters).map_err(invalid_data)?;
    log_resource("END: simplify", &mut rdata);
    let changed = summary.passes.iter().filter(|p| p.changed).count();
    log::info!("{} of {} passes changed the graph", changed, summary.passes.len());

    let fasta_file = format!("{}.fa", out_prefix);
    log::info!("write reads to {}", fasta_file);
    let mut fasta = FastaVisitor::new(BufWriter::new(File::create(&fasta_file)?));
    g.visit(&mut fasta);
    fasta.finish()?;

    let asqg_file = format!("{}.asqg", out_prefix);
    log::info!("write graph to {}", asqg_file);
    write_asqg(&g, BufWriter::new(File::create(&asqg_file)?))?;

    log_resource("END: sg_simplify", &mut rdata);
    Ok(())
}
