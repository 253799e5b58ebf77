use bytemuck::{Pod, Zeroable};

/// Vertex with a per-vertex display (sRGB) color, for flat-colored meshes.
///
/// Backends apply the 0.8 shade and convert to linear in the vertex stage.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Vertex for lit, textured meshes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LitVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Reasons a mesh cannot be drawn with an indexed triangle list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no vertices or no indices")]
    Empty,
    #[error("index count {0} is not a multiple of 3")]
    NotTriangles(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u16,
        vertex_count: usize,
    },
    #[error("mesh has {0} vertices, more than a u16 index buffer can address")]
    TooManyVertices(usize),
}

/// Vertex buffer plus 16-bit index buffer describing a triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u16>,
}

impl<V> IndexedMesh<V> {
    pub fn new(vertices: Vec<V>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the index buffer only references existing vertices and
    /// describes whole triangles.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if self.vertices.len() > u16::MAX as usize + 1 {
            return Err(MeshError::TooManyVertices(self.vertices.len()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(self.indices.len()));
        }
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= self.vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }
}

/// A mesh of either vertex flavour.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshData {
    Colored(IndexedMesh<ColorVertex>),
    Lit(IndexedMesh<LitVertex>),
}

impl MeshData {
    pub fn validate(&self) -> Result<(), MeshError> {
        match self {
            MeshData::Colored(m) => m.validate(),
            MeshData::Lit(m) => m.validate(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            MeshData::Colored(m) => m.vertex_count(),
            MeshData::Lit(m) => m.vertex_count(),
        }
    }

    pub fn index_count(&self) -> usize {
        match self {
            MeshData::Colored(m) => m.index_count(),
            MeshData::Lit(m) => m.index_count(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MeshData::Colored(_) => "colored",
            MeshData::Lit(_) => "lit",
        }
    }
}
