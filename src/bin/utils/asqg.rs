// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

//
// read and write the graph as ASQG text records
//
// HT  <tags>
// VT  <id> <seq> [RC:i:<read count>]
// ED  <id0> <id1> <s0> <e0> <l0> <s1> <e1> <l1> <is_rc> <num_diff>
//

use super::graph::{GraphError, StringGraph};
use super::overlap::{Match, Overlap, SeqCoord};
use flate2::bufread::MultiGzDecoder;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum AsqgRecord {
    Header(String),
    Vertex {
        id: String,
        seq: Vec<u8>,
        read_count: u32,
    },
    Edge(Overlap),
}

pub fn parse_line(line: &str, lineno: usize) -> Result<Option<AsqgRecord>, GraphError> {
    let line = line.trim_end();
    if line.is_empty() {
        return Ok(None);
    }
    let err = |msg: String| GraphError::Parse { line: lineno, msg };
    let fields = line.split('\t').collect::<Vec<&str>>();
    match fields[0] {
        "HT" => Ok(Some(AsqgRecord::Header(fields[1..].join("\t")))),
        "VT" => {
            if fields.len() < 3 {
                return Err(err("vertex record needs an id and a sequence".to_string()));
            }
            let mut read_count = 1_u32;
            for tag in fields[3..].iter() {
                if let Some(v) = tag.strip_prefix("RC:i:") {
                    read_count = v
                        .parse()
                        .map_err(|_| err(format!("bad read count tag {}", tag)))?;
                }
            }
            Ok(Some(AsqgRecord::Vertex {
                id: fields[1].to_string(),
                seq: fields[2].as_bytes().to_vec(),
                read_count,
            }))
        }
        "ED" => {
            let f = fields
                .get(1)
                .map(|s| s.split_whitespace().collect::<Vec<&str>>())
                .unwrap_or_default();
            if f.len() < 10 {
                return Err(err(format!("edge record has {} of 10 fields", f.len())));
            }
            let mut n = [0_u32; 6];
            for (k, s) in f[2..8].iter().enumerate() {
                n[k] = s
                    .parse()
                    .map_err(|_| err(format!("bad coordinate {}", s)))?;
            }
            let is_rc = match f[8] {
                "0" => false,
                "1" => true,
                s => return Err(err(format!("bad strand flag {}", s))),
            };
            let num_diff = f[9]
                .parse()
                .map_err(|_| err(format!("bad difference count {}", f[9])))?;
            let m = Match::new(
                SeqCoord::new(n[0], n[1], n[2]),
                SeqCoord::new(n[3], n[4], n[5]),
                is_rc,
                num_diff,
            );
            Ok(Some(AsqgRecord::Edge(Overlap::new(f[0], f[1], m))))
        }
        tag => Err(err(format!("unknown record type {}", tag))),
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead + Send>, GraphError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut magic = Vec::<u8>::new();
    reader.by_ref().take(2).read_to_end(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    if magic == [0x1F_u8, 0x8B_u8] {
        log::info!("input file: {} detected as gz-compressed file", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

pub fn read_records(path: &Path) -> Result<Vec<AsqgRecord>, GraphError> {
    let reader = open_input(path)?;
    let mut records = Vec::<AsqgRecord>::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line, i + 1) {
            Ok(Some(rec)) => records.push(rec),
            Ok(None) => (),
            Err(GraphError::Parse { line, msg }) => {
                return Err(GraphError::Parse {
                    line,
                    msg: format!("{}: {}", path.display(), msg),
                })
            }
            Err(e) => return Err(e),
        }
    }
    log::debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, GraphError> {
    let mut paths = Vec::<PathBuf>::new();
    for ptn in patterns {
        let entries = glob::glob(ptn).map_err(|_| GraphError::NoInput(ptn.clone()))?;
        let mut found = 0_usize;
        for entry in entries {
            paths.push(entry.map_err(|e| GraphError::Io(e.into_error()))?);
            found += 1;
        }
        if found == 0 {
            return Err(GraphError::NoInput(ptn.clone()));
        }
    }
    Ok(paths)
}

pub fn load_graph(patterns: &[String]) -> Result<StringGraph, GraphError> {
    //
    // parse the chunk files in parallel, then insert every vertex before any edge
    //
    let paths = expand_inputs(patterns)?;
    for p in paths.iter() {
        log::info!("input file: {}", p.display());
    }
    let chunks = paths
        .par_iter()
        .map(|p| read_records(p))
        .collect::<Result<Vec<Vec<AsqgRecord>>, GraphError>>()?;

    let mut g = StringGraph::new();
    let mut overlaps = Vec::<Overlap>::new();
    for rec in chunks.into_iter().flatten() {
        match rec {
            AsqgRecord::Header(_) => (),
            AsqgRecord::Vertex {
                id,
                seq,
                read_count,
            } => {
                g.add_vertex(&id, seq, read_count)?;
            }
            AsqgRecord::Edge(ovlp) => overlaps.push(ovlp),
        }
    }

    let mut num_contained = 0_usize;
    for ovlp in overlaps.iter() {
        match g.add_overlap(ovlp) {
            Ok(_) => (),
            Err(GraphError::ContainedOverlap(contained, container)) => {
                log::debug!("skip containment {} in {}", contained, container);
                num_contained += 1;
            }
            Err(e) => return Err(e),
        }
    }
    if num_contained > 0 {
        log::info!("{} containment records skipped", num_contained);
    }
    log::info!("loaded graph: {}", g);
    Ok(g)
}

pub fn write_asqg<W: Write>(g: &StringGraph, mut out: W) -> io::Result<()> {
    writeln!(out, "HT\tVN:i:1")?;
    for v in g.vertex_ids() {
        let vertex = &g[v];
        write!(out, "VT\t{}\t", vertex.id())?;
        out.write_all(vertex.seq())?;
        writeln!(out, "\tRC:i:{}", vertex.read_count())?;
    }
    for e in g.edge_ids() {
        let edge = &g[e];
        // one record per twin pair
        if edge.twin() < e {
            continue;
        }
        let m = edge.matching();
        writeln!(
            out,
            "ED\t{} {} {} {} {} {} {} {} {} {}",
            g[edge.start()].id(),
            g[edge.end()].id(),
            m.coord[0].start,
            m.coord[0].end,
            m.coord[0].seq_len,
            m.coord[1].start,
            m.coord[1].end,
            m.coord[1].seq_len,
            m.is_rc() as u8,
            m.num_diff
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::{EdgeComp, EdgeDir};
    use crate::utils::test_utils::{layout_graph, Read};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;

    fn sample() -> StringGraph {
        layout_graph(
            &[
                Read::fwd("a", 0, 100),
                Read::rev("b", 40, 100),
                Read::fwd("c", 80, 100),
            ],
            20,
        )
    }

    fn path_str(p: &Path) -> String {
        p.to_string_lossy().to_string()
    }

    #[test]
    fn parses_records() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(
            parse_line("HT\tVN:i:1", 1).unwrap(),
            Some(AsqgRecord::Header("VN:i:1".to_string()))
        );
        assert_eq!(
            parse_line("VT\tr1\tACGT\tSS:i:0\tRC:i:3", 2).unwrap(),
            Some(AsqgRecord::Vertex {
                id: "r1".to_string(),
                seq: b"ACGT".to_vec(),
                read_count: 3
            })
        );
        let rec = parse_line("ED\tr1 r2 60 99 100 0 39 100 1 2", 3)
            .unwrap()
            .unwrap();
        match rec {
            AsqgRecord::Edge(ovlp) => {
                assert_eq!(ovlp.id, ["r1".to_string(), "r2".to_string()]);
                assert_eq!(ovlp.matching.coord[0], SeqCoord::new(60, 99, 100));
                assert_eq!(ovlp.matching.coord[1], SeqCoord::new(0, 39, 100));
                assert!(ovlp.matching.is_rc());
                assert_eq!(ovlp.matching.num_diff, 2);
            }
            _ => panic!("expected an edge record"),
        }
    }

    #[test]
    fn parse_errors_carry_the_line() {
        match parse_line("ED\tr1 r2 60 x 100 0 39 100 0 0", 7) {
            Err(GraphError::Parse { line, .. }) => assert_eq!(line, 7),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parse_line("ED\tr1 r2 60 99 100 0 39 100 2 0", 8),
            Err(GraphError::Parse { line: 8, .. })
        ));
        assert!(matches!(
            parse_line("XX\tfoo", 9),
            Err(GraphError::Parse { line: 9, .. })
        ));
        assert!(matches!(
            parse_line("VT\tr1", 10),
            Err(GraphError::Parse { line: 10, .. })
        ));
    }

    #[test]
    fn write_then_load() {
        let g = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.asqg");
        write_asqg(&g, fs::File::create(&path).unwrap()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("ED")).count(), 3);

        let h = load_graph(&[path_str(&path)]).unwrap();
        assert_eq!(h.num_vertices(), 3);
        assert_eq!(h.num_edges(), 6);
        h.validate().unwrap();
        for name in ["a", "b", "c"].iter() {
            let (u, v) = (g.vertex_id(name).unwrap(), h.vertex_id(name).unwrap());
            assert_eq!(g[u].seq(), h[v].seq());
            for dir in [EdgeDir::Sense, EdgeDir::Antisense].iter() {
                assert_eq!(g[u].count_edges(*dir), h[v].count_edges(*dir));
            }
        }
        let a = h.vertex_id("a").unwrap();
        let reverse = h[a]
            .all_edges()
            .filter(|e| h[**e].comp() == EdgeComp::Reverse)
            .count();
        assert_eq!(reverse, 1);
    }

    #[test]
    fn loads_compressed_chunks_by_pattern() {
        // vertices and edges split across chunks, one of them compressed
        let g = sample();
        let mut buf = Vec::<u8>::new();
        write_asqg(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let (verts, edges): (Vec<&str>, Vec<&str>) =
            text.lines().partition(|l| !l.starts_with("ED"));

        let dir = tempfile::tempdir().unwrap();
        let mut enc = GzEncoder::new(
            fs::File::create(dir.path().join("chunk_0.asqg.gz")).unwrap(),
            Compression::default(),
        );
        writeln!(enc, "{}", edges.join("\n")).unwrap();
        enc.finish().unwrap();
        fs::write(dir.path().join("chunk_1.asqg"), verts.join("\n")).unwrap();

        let ptn = path_str(&dir.path().join("chunk_*"));
        let h = load_graph(&[ptn]).unwrap();
        assert_eq!(h.num_vertices(), 3);
        assert_eq!(h.num_edges(), 6);
        h.validate().unwrap();
    }

    #[test]
    fn skips_containments_and_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contained.asqg");
        fs::write(
            &path,
            "HT\tVN:i:1\nVT\tr1\tACGTACGTAC\nVT\tr2\tCGTA\nED\tr1 r2 1 4 10 0 3 4 0 0\n",
        )
        .unwrap();
        let g = load_graph(&[path_str(&path)]).unwrap();
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.num_edges(), 0);

        let missing = path_str(&dir.path().join("none_*.asqg"));
        assert!(matches!(
            load_graph(&[missing]),
            Err(GraphError::NoInput(_))
        ));
    }

    #[test]
    fn rejects_overlaps_joining_the_wrong_ends() {
        // both right ends on the same strand
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strand.asqg");
        fs::write(
            &path,
            "HT\tVN:i:1\nVT\tr1\tACGTACGTAC\nVT\tr2\tTTGCACGTAC\nED\tr1 r2 6 9 10 6 9 10 0 0\n",
        )
        .unwrap();
        assert!(matches!(
            load_graph(&[path_str(&path)]),
            Err(GraphError::InconsistentStrand(_, _))
        ));
    }

    #[test]
    fn reports_file_and_line_of_bad_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.asqg");
        fs::write(&path, "HT\tVN:i:1\nVT\tr1\tACGT\nED\tr1 r2\n").unwrap();
        match load_graph(&[path_str(&path)]) {
            Err(GraphError::Parse { line, msg }) => {
                assert_eq!(line, 3);
                assert!(msg.contains("bad.asqg"));
            }
            other => panic!("unexpected {:?}", other.map(|g| g.num_vertices())),
        }
    }
}
