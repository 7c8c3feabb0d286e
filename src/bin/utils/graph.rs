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
// the string graph: reads as vertices, twin edge pairs as overlaps, color scratch
// state and the mark-and-sweep primitives used by the simplification passes
//

use super::overlap::{Match, Overlap, SeqCoord};
use rustc_hash::FxHashMap;
use std::fmt;
use std::io;
use std::ops::Index;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Color {
    White,
    Gray,
    Black,
    Red,
    Blue,
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum EdgeDir {
    Sense,
    Antisense,
}

impl EdgeDir {
    pub fn complement(self) -> EdgeDir {
        match self {
            EdgeDir::Sense => EdgeDir::Antisense,
            EdgeDir::Antisense => EdgeDir::Sense,
        }
    }

    fn idx(self) -> usize {
        match self {
            EdgeDir::Sense => 0,
            EdgeDir::Antisense => 1,
        }
    }

    fn of_coord(c: &SeqCoord) -> EdgeDir {
        // an overlap on the left end of a read extends it to the left
        if c.is_left_extreme() {
            EdgeDir::Antisense
        } else {
            EdgeDir::Sense
        }
    }
}

pub const EDGE_DIRECTIONS: [EdgeDir; 2] = [EdgeDir::Sense, EdgeDir::Antisense];

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum EdgeComp {
    Same,
    Reverse,
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct VertexId(pub u32);

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EdgeId(pub u32);

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct EdgeDesc {
    pub end: VertexId,
    pub dir: EdgeDir,
    pub comp: EdgeComp,
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("duplicate vertex id {0}")]
    DuplicateVertex(String),
    #[error("unknown vertex id {0}")]
    UnknownVertex(String),
    #[error("self overlap on {0}")]
    SelfOverlap(String),
    #[error("invalid coordinate {start}-{end} (length {seq_len}) on {id}")]
    InvalidCoord {
        id: String,
        start: u32,
        end: u32,
        seq_len: u32,
    },
    #[error("{0} is contained in {1}, containments are not edges")]
    ContainedOverlap(String, String),
    #[error("overlap between {0} and {1} does not reach a read end")]
    NotDovetail(String, String),
    #[error("overlap between {0} and {1} uses read ends that do not match its strand")]
    InconsistentStrand(String, String),
    #[error("duplicate edge {0} -> {1}")]
    DuplicateEdge(String, String),
    #[error("edge {0:?} has a broken twin")]
    TwinMismatch(EdgeId),
    #[error("edge {0:?} is not reachable from its start vertex")]
    DanglingEdge(EdgeId),
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
    #[error("no input matches {0}")]
    NoInput(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct Vertex {
    id: String,
    seq: Vec<u8>,
    read_count: u32,
    color: Color,
    edges: [Vec<EdgeId>; 2],
}

impl Vertex {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn seq_len(&self) -> u32 {
        self.seq.len() as u32
    }

    pub fn read_count(&self) -> u32 {
        self.read_count
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn edges(&self, dir: EdgeDir) -> &[EdgeId] {
        &self.edges[dir.idx()]
    }

    pub fn count_edges(&self, dir: EdgeDir) -> usize {
        self.edges[dir.idx()].len()
    }

    pub fn total_edges(&self) -> usize {
        self.edges[0].len() + self.edges[1].len()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges[0].iter().chain(self.edges[1].iter())
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    start: VertexId,
    end: VertexId,
    dir: EdgeDir,
    comp: EdgeComp,
    twin: EdgeId,
    color: Color,
    matching: Match,
}

impl Edge {
    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn end(&self) -> VertexId {
        self.end
    }

    pub fn dir(&self) -> EdgeDir {
        self.dir
    }

    pub fn comp(&self) -> EdgeComp {
        self.comp
    }

    pub fn twin(&self) -> EdgeId {
        self.twin
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The overlap seen from the start vertex: `coord[0]` is on `start`, `coord[1]` on `end`.
    pub fn matching(&self) -> &Match {
        &self.matching
    }

    /// Number of bases of the end read not covered by the overlap. This is the
    /// edge length of the string graph and the key the adjacency lists are sorted on.
    pub fn seq_len(&self) -> u32 {
        self.matching.coord[1].unmatched_length()
    }

    pub fn match_length(&self) -> u32 {
        self.matching.coord[0].length()
    }

    pub fn num_diff(&self) -> u32 {
        self.matching.num_diff
    }

    pub fn desc(&self) -> EdgeDesc {
        EdgeDesc {
            end: self.end,
            dir: self.dir,
            comp: self.comp,
        }
    }
}

/// A pass over the graph. `previsit` resets the scratch colors, `visit` marks
/// around one vertex and `postvisit` sweeps what was marked. Outside of a pass
/// every vertex and edge is `Color::White`.
pub trait GraphVisitor {
    fn previsit(&mut self, g: &mut StringGraph);
    fn visit(&mut self, g: &mut StringGraph, v: VertexId) -> bool;
    fn postvisit(&mut self, g: &mut StringGraph);
}

#[derive(Debug, Clone, Default)]
pub struct StringGraph {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    name2vid: FxHashMap<String, VertexId>,
    num_vertices: usize,
    num_edges: usize,
}

impl Index<VertexId> for StringGraph {
    type Output = Vertex;
    fn index(&self, v: VertexId) -> &Vertex {
        match self.vertices.get(v.0 as usize) {
            Some(Some(vertex)) => vertex,
            _ => panic!("stale vertex handle {:?}", v),
        }
    }
}

impl Index<EdgeId> for StringGraph {
    type Output = Edge;
    fn index(&self, e: EdgeId) -> &Edge {
        match self.edges.get(e.0 as usize) {
            Some(Some(edge)) => edge,
            _ => panic!("stale edge handle {:?}", e),
        }
    }
}

impl fmt::Display for StringGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vertices: {} edges: {}",
            self.num_vertices, self.num_edges
        )
    }
}

impl StringGraph {
    pub fn new() -> Self {
        StringGraph::default()
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.0 as usize).and_then(|x| x.as_ref())
    }

    pub fn edge(&self, e: EdgeId) -> Option<&Edge> {
        self.edges.get(e.0 as usize).and_then(|x| x.as_ref())
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.name2vid.get(name).copied()
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some())
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| EdgeId(i as u32))
            .collect()
    }

    /// Direction to follow from the end of `e` to keep moving away from its start.
    pub fn trans_dir(&self, e: EdgeId) -> EdgeDir {
        self[self[e].twin].dir.complement()
    }

    pub fn has_edge(&self, v: VertexId, desc: &EdgeDesc) -> bool {
        self[v].edges(desc.dir).iter().any(|e| self[*e].desc() == *desc)
    }

    pub fn add_vertex(
        &mut self,
        id: &str,
        seq: Vec<u8>,
        read_count: u32,
    ) -> Result<VertexId, GraphError> {
        if self.name2vid.contains_key(id) {
            return Err(GraphError::DuplicateVertex(id.to_string()));
        }
        let vid = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex {
            id: id.to_string(),
            seq,
            read_count,
            color: Color::White,
            edges: [vec![], vec![]],
        }));
        self.name2vid.insert(id.to_string(), vid);
        self.num_vertices += 1;
        Ok(vid)
    }

    pub fn add_overlap(&mut self, ovlp: &Overlap) -> Result<(EdgeId, EdgeId), GraphError> {
        //
        // create the edge pair for a dovetail overlap, checking the overlap record first
        //
        let mut vids = [VertexId(0); 2];
        for idx in 0..2 {
            vids[idx] = self
                .vertex_id(&ovlp.id[idx])
                .ok_or_else(|| GraphError::UnknownVertex(ovlp.id[idx].clone()))?;
        }
        if vids[0] == vids[1] {
            return Err(GraphError::SelfOverlap(ovlp.id[0].clone()));
        }
        let m = ovlp.matching;
        for idx in 0..2 {
            let c = &m.coord[idx];
            if !c.is_valid() || c.seq_len != self[vids[idx]].seq_len() {
                return Err(GraphError::InvalidCoord {
                    id: ovlp.id[idx].clone(),
                    start: c.start,
                    end: c.end,
                    seq_len: c.seq_len,
                });
            }
        }
        for idx in 0..2 {
            if m.coord[idx].is_contained() {
                return Err(GraphError::ContainedOverlap(
                    ovlp.id[idx].clone(),
                    ovlp.id[1 - idx].clone(),
                ));
            }
        }
        for idx in 0..2 {
            if !m.coord[idx].is_extreme() {
                return Err(GraphError::NotDovetail(
                    ovlp.id[0].clone(),
                    ovlp.id[1].clone(),
                ));
            }
        }

        let dirs = [EdgeDir::of_coord(&m.coord[0]), EdgeDir::of_coord(&m.coord[1])];
        // same strand joins opposite ends, reverse complement joins the same end
        if (dirs[0] == dirs[1]) != m.is_rc() {
            return Err(GraphError::InconsistentStrand(
                ovlp.id[0].clone(),
                ovlp.id[1].clone(),
            ));
        }
        let comp = if m.is_rc() {
            EdgeComp::Reverse
        } else {
            EdgeComp::Same
        };
        let desc = EdgeDesc {
            end: vids[1],
            dir: dirs[0],
            comp,
        };
        if self.has_edge(vids[0], &desc) {
            return Err(GraphError::DuplicateEdge(
                ovlp.id[0].clone(),
                ovlp.id[1].clone(),
            ));
        }

        let e0 = EdgeId(self.edges.len() as u32);
        let e1 = EdgeId(e0.0 + 1);
        self.edges.push(Some(Edge {
            start: vids[0],
            end: vids[1],
            dir: dirs[0],
            comp,
            twin: e1,
            color: Color::White,
            matching: m,
        }));
        self.edges.push(Some(Edge {
            start: vids[1],
            end: vids[0],
            dir: dirs[1],
            comp,
            twin: e0,
            color: Color::White,
            matching: m.swap(),
        }));
        for (idx, e) in [e0, e1].iter().enumerate() {
            if let Some(Some(v)) = self.vertices.get_mut(vids[idx].0 as usize) {
                v.edges[dirs[idx].idx()].push(*e);
            }
        }
        self.num_edges += 2;
        Ok((e0, e1))
    }

    pub fn set_vertex_color(&mut self, v: VertexId, c: Color) {
        if let Some(Some(vertex)) = self.vertices.get_mut(v.0 as usize) {
            vertex.color = c;
        }
    }

    pub fn set_edge_color(&mut self, e: EdgeId, c: Color) {
        if let Some(Some(edge)) = self.edges.get_mut(e.0 as usize) {
            edge.color = c;
        }
    }

    pub fn set_colors(&mut self, c: Color) {
        for v in self.vertices.iter_mut().flatten() {
            v.color = c;
        }
        for e in self.edges.iter_mut().flatten() {
            e.color = c;
        }
    }

    pub fn check_colors(&self, c: Color) -> bool {
        for v in self.vertices.iter().flatten() {
            if v.color != c {
                log::warn!("vertex {} has color {:?}, expected {:?}", v.id, v.color, c);
                return false;
            }
        }
        for e in self.edges.iter().flatten() {
            if e.color != c {
                log::warn!(
                    "edge {} -> {} has color {:?}, expected {:?}",
                    self[e.start].id,
                    self[e.end].id,
                    e.color,
                    c
                );
                return false;
            }
        }
        true
    }

    pub fn sort_adjacency_by_len(&mut self) {
        let edges = &self.edges;
        for v in self.vertices.iter_mut().flatten() {
            for list in v.edges.iter_mut() {
                list.sort_by_key(|e| match &edges[e.0 as usize] {
                    Some(edge) => (edge.seq_len(), e.0),
                    None => (u32::MAX, e.0),
                });
            }
        }
    }

    fn remove_edge_pair(&mut self, e: EdgeId) -> usize {
        let mut removed = 0_usize;
        let twin = match self.edge(e) {
            Some(edge) => edge.twin,
            None => return 0,
        };
        for eid in [e, twin].iter() {
            if let Some(edge) = self.edges[eid.0 as usize].take() {
                if let Some(Some(v)) = self.vertices.get_mut(edge.start.0 as usize) {
                    v.edges[edge.dir.idx()].retain(|x| x != eid);
                }
                removed += 1;
            }
        }
        self.num_edges -= removed;
        removed
    }

    /// Remove every edge with color `c` together with its twin. Returns the number of edges removed.
    pub fn sweep_edges(&mut self, c: Color) -> usize {
        let marked = self
            .edge_ids()
            .into_iter()
            .filter(|e| self[*e].color == c)
            .collect::<Vec<EdgeId>>();
        let mut removed = 0_usize;
        for e in marked {
            removed += self.remove_edge_pair(e);
        }
        removed
    }

    /// Remove every vertex with color `c`, detaching its edges and their twins first.
    /// Returns the number of vertices removed.
    pub fn sweep_vertices(&mut self, c: Color) -> usize {
        let marked = self
            .vertex_ids()
            .into_iter()
            .filter(|v| self[*v].color == c)
            .collect::<Vec<VertexId>>();
        for v in marked.iter() {
            let incident = self[*v].all_edges().copied().collect::<Vec<EdgeId>>();
            for e in incident {
                self.remove_edge_pair(e);
            }
            if let Some(vertex) = self.vertices[v.0 as usize].take() {
                self.name2vid.remove(&vertex.id);
                self.num_vertices -= 1;
            }
        }
        marked.len()
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        //
        // check twin symmetry and adjacency membership of every live edge
        //
        for (i, slot) in self.edges.iter().enumerate() {
            let edge = match slot {
                Some(edge) => edge,
                None => continue,
            };
            let eid = EdgeId(i as u32);
            let twin = self
                .edge(edge.twin)
                .ok_or(GraphError::TwinMismatch(eid))?;
            if twin.twin != eid
                || twin.start != edge.end
                || twin.end != edge.start
                || twin.comp != edge.comp
            {
                return Err(GraphError::TwinMismatch(eid));
            }
            let start = self
                .vertex(edge.start)
                .ok_or(GraphError::DanglingEdge(eid))?;
            if !start.edges(edge.dir).contains(&eid) || self.vertex(edge.end).is_none() {
                return Err(GraphError::DanglingEdge(eid));
            }
        }
        let mut linked = 0_usize;
        for v in self.vertices.iter().flatten() {
            for e in v.all_edges() {
                if self.edge(*e).is_none() {
                    return Err(GraphError::DanglingEdge(*e));
                }
                linked += 1;
            }
        }
        if linked != self.num_edges {
            log::warn!("{} edges linked, {} recorded", linked, self.num_edges);
            return Err(GraphError::DanglingEdge(EdgeId(u32::MAX)));
        }
        Ok(())
    }

    pub fn visit<V: GraphVisitor + ?Sized>(&mut self, visitor: &mut V) -> bool {
        visitor.previsit(self);
        let mut modified = false;
        for v in self.vertex_ids() {
            // visits only color, but skip any slot swept since the snapshot
            if self.vertex(v).is_some() && visitor.visit(self, v) {
                modified = true;
            }
        }
        visitor.postvisit(self);
        modified
    }
}
