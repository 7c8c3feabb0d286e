// Peregrine Assembler and SHIMMER Genome Assembly Toolkit
// 2019, 2020, 2021- (c) by Jason, Chen-Shan, Chin
//
// This Source Code Form is subject to the terms of the
// Creative Commons Attribution-NonCommercial-ShareAlike 4.0 International License.
//
// You should have received a copy of the license along with this
// work. If not, see <http://creativecommons.org/licenses/by-nc-sa/4.0/>.

use super::graph::{GraphVisitor, StringGraph, VertexId};
use std::io::{self, Write};

/// Writes every vertex as `>{id} {length} {read_count}` followed by its sequence.
pub struct FastaVisitor<W: Write> {
    out: W,
    written: usize,
    err: Option<io::Error>,
}

impl<W: Write> FastaVisitor<W> {
    pub fn new(out: W) -> Self {
        FastaVisitor {
            out,
            written: 0,
            err: None,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.err.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_record(&mut self, g: &StringGraph, v: VertexId) -> io::Result<()> {
        let vertex = &g[v];
        writeln!(
            self.out,
            ">{} {} {}",
            vertex.id(),
            vertex.seq_len(),
            vertex.read_count()
        )?;
        self.out.write_all(vertex.seq())?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> GraphVisitor for FastaVisitor<W> {
    fn previsit(&mut self, _g: &mut StringGraph) {}

    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool {
        if self.err.is_none() {
            match self.write_record(g, v) {
                Ok(()) => self.written += 1,
                Err(e) => self.err = Some(e),
            }
        }
        false
    }

    fn postvisit(&mut self, _g: &mut StringGraph) {
        log::info!("fasta: {} records written", self.written);
    }
}
