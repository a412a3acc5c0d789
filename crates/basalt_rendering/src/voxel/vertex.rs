//! # Vertex Format & Mesh Buffers
//!
//! The GPU-ready vertex layout handed to the renderer, and the growable
//! vertex/index buffers a chunk mesh accumulates into.

use bytemuck::{Pod, Zeroable};

/// Vertex for chunk geometry.
///
/// Matches the pipeline's vertex stage: position, normal, atlas texture
/// coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in chunk-local space (the per-chunk translation is applied
    /// by the consumer).
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Texture coordinates inside the shared atlas.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Vertex attribute layout.
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32x3,  // normal
        2 => Float32x2,  // tex_coord
    ];

    /// Vertex buffer layout descriptor for pipeline creation.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One of a chunk's two geometry buffers (land or water).
///
/// Rebuilt wholesale whenever the chunk's terrain changes; there is no
/// partial remesh.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    /// Vertex buffer data.
    pub vertices: Vec<Vertex>,
    /// Index buffer data.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Returns true when the mesh holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of indices to draw.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one face quad: 4 vertices and the two CCW triangles
    /// 0-1-2, 2-3-0.
    pub fn push_quad(&mut self, corners: [Vertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Drops all geometry, keeping allocations for the next rebuild.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
