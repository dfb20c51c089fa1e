//! Box-drawing layout graph.
//!
//! A tiny undirected planar graph whose edges are all axis-aligned. Vertices
//! decide their own glyph from the compass directions of their incident
//! edges (corners, tees, crosses); edges fill the straight run strictly
//! between their endpoints. Between them every cell of a border is painted
//! exactly once.

use ratatui::buffer::Buffer;
use std::fmt;
use thiserror::Error;

/// Glyph per neighbour code, bits ordered up, right, down, left.
const GLYPHS: [char; 16] = [
    ' ', // 0000
    '═', // 0001
    '║', // 0010
    '╗', // 0011
    '═', // 0100
    '═', // 0101
    '╔', // 0110
    '╦', // 0111
    '║', // 1000
    '╝', // 1001
    '║', // 1010
    '╣', // 1011
    '╚', // 1100
    '╩', // 1101
    '╠', // 1110
    '╬', // 1111
];

const UP: u8 = 0b1000;
const RIGHT: u8 = 0b0100;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0001;

/// Looks up the glyph for a 4-bit neighbour code.
pub fn glyph_for(code: u8) -> char {
    GLYPHS[usize::from(code & 0b1111)]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edges must be horizontal or vertical: ({0}, {1}) -> ({2}, {3})")]
    Diagonal(u16, u16, u16, u16),

    #[error("self-edges are not allowed: ({0}, {1})")]
    SelfEdge(u16, u16),

    #[error("unknown vertex {0}")]
    UnknownVertex(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(usize);

/// A grid point and the edges touching it.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub x: u16,
    pub y: u16,
    edges: Vec<EdgeId>,
}

impl Vertex {
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    fn point(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A horizontal or vertical segment; `begin` is the endpoint with the
/// smaller `(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub begin: VertexId,
    pub end: VertexId,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, x: u16, y: u16) -> VertexId {
        self.vertices.push(Vertex {
            x,
            y,
            edges: Vec::new(),
        });
        VertexId(self.vertices.len() - 1)
    }

    /// Joins two vertices, recording the edge on both of them.
    pub fn connect(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, GraphError> {
        let pa = self.vertex(a)?.point();
        let pb = self.vertex(b)?.point();
        let (begin, end) = if pa <= pb { (a, b) } else { (b, a) };
        let ((bx, by), (ex, ey)) = if pa <= pb { (pa, pb) } else { (pb, pa) };

        if bx == ex && by == ey {
            return Err(GraphError::SelfEdge(bx, by));
        }
        if bx != ex && by != ey {
            return Err(GraphError::Diagonal(bx, by, ex, ey));
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { begin, end });
        self.vertices[begin.0].edges.push(id);
        self.vertices[end.0].edges.push(id);
        Ok(id)
    }

    /// Connects consecutive vertices of a path.
    pub fn connect_path(&mut self, path: &[VertexId]) -> Result<(), GraphError> {
        for pair in path.windows(2) {
            self.connect(pair[0], pair[1])?;
        }
        Ok(())
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.vertices.get(id.0).ok_or(GraphError::UnknownVertex(id.0))
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Vertices at the other end of each incident edge.
    pub fn neighbors(&self, id: VertexId) -> Vec<&Vertex> {
        let Some(vertex) = self.vertices.get(id.0) else {
            return Vec::new();
        };
        vertex
            .edges
            .iter()
            .map(|edge| {
                let edge = &self.edges[edge.0];
                let other = if edge.begin == id { edge.end } else { edge.begin };
                &self.vertices[other.0]
            })
            .collect()
    }

    pub fn has_up_edge(&self, id: VertexId) -> bool {
        self.any_neighbor(id, |v, n| n.x == v.x && n.y < v.y)
    }

    pub fn has_right_edge(&self, id: VertexId) -> bool {
        self.any_neighbor(id, |v, n| n.y == v.y && v.x < n.x)
    }

    pub fn has_down_edge(&self, id: VertexId) -> bool {
        self.any_neighbor(id, |v, n| n.x == v.x && v.y < n.y)
    }

    pub fn has_left_edge(&self, id: VertexId) -> bool {
        self.any_neighbor(id, |v, n| n.y == v.y && n.x < v.x)
    }

    fn any_neighbor(&self, id: VertexId, test: impl Fn(&Vertex, &Vertex) -> bool) -> bool {
        let Some(vertex) = self.vertices.get(id.0) else {
            return false;
        };
        self.neighbors(id).into_iter().any(|n| test(vertex, n))
    }

    /// The 4-bit neighbour code (up, right, down, left) of a vertex.
    pub fn code(&self, id: VertexId) -> u8 {
        let mut code = 0;
        if self.has_up_edge(id) {
            code |= UP;
        }
        if self.has_right_edge(id) {
            code |= RIGHT;
        }
        if self.has_down_edge(id) {
            code |= DOWN;
        }
        if self.has_left_edge(id) {
            code |= LEFT;
        }
        code
    }

    pub fn glyph(&self, id: VertexId) -> char {
        glyph_for(self.code(id))
    }

    /// Paints vertices, then the straight fill of every edge. Cells outside
    /// the buffer are skipped.
    pub fn draw(&self, buf: &mut Buffer) {
        for (index, vertex) in self.vertices.iter().enumerate() {
            put(buf, vertex.x, vertex.y, self.glyph(VertexId(index)));
        }
        for edge in &self.edges {
            let begin = &self.vertices[edge.begin.0];
            let end = &self.vertices[edge.end.0];
            if begin.y == end.y {
                for x in begin.x + 1..end.x {
                    put(buf, x, begin.y, '═');
                }
            } else {
                for y in begin.y + 1..end.y {
                    put(buf, begin.x, y, '║');
                }
            }
        }
    }
}

fn put(buf: &mut Buffer, x: u16, y: u16, glyph: char) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(glyph);
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{} -> {}",
                self.vertices[edge.begin.0], self.vertices[edge.end.0]
            )?;
        }
        Ok(())
    }
}
