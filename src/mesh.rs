//! CPU-side mesh data and vertex layouts.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::driver::AttributeBinding;

/// Vertex with position only. Shader input: `layout (location = 0)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: Vec3,
}

impl PositionVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Self>() as u32,
            attributes: vec![AttributeBinding {
                location: 0,
                components: 3,
                offset: 0,
            }],
        }
    }
}

/// Vertex with interleaved position and color. Shader inputs:
/// `layout (location = 0)` position, `layout (location = 1)` color.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl ColorVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Self>() as u32,
            attributes: vec![
                AttributeBinding {
                    location: 0,
                    components: 3,
                    offset: 0,
                },
                AttributeBinding {
                    location: 1,
                    components: 3,
                    offset: 12,
                },
            ],
        }
    }
}

/// Byte layout of one interleaved vertex: the stride and the attribute
/// slots it feeds. The stride always equals the sum of the attribute
/// widths for the vertex format in use.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    pub stride: u32,
    pub attributes: Vec<AttributeBinding>,
}

/// A mesh with raw interleaved vertex data, its layout, and optional
/// 32-bit indices. An empty index list means the mesh is drawn non-indexed.
#[derive(Debug, Clone)]
pub struct MeshData {
    vertex_data: Vec<u8>,
    vertex_count: u32,
    layout: VertexLayout,
    indices: Vec<u32>,
}

impl MeshData {
    pub fn from_vertices<V: Pod>(layout: VertexLayout, vertices: &[V], indices: Vec<u32>) -> Self {
        Self {
            vertex_data: bytemuck::cast_slice(vertices).to_vec(),
            vertex_count: vertices.len() as u32,
            layout,
            indices,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn has_indices(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertex_data
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Unit quad in the XY plane: 4 corner vertices, two triangles sharing
    /// the diagonal through indices `{0,1,2, 0,2,3}`.
    pub fn quad() -> Self {
        let vertices = [
            PositionVertex {
                position: Vec3::new(0.5, 0.5, 0.0),
            },
            PositionVertex {
                position: Vec3::new(0.5, -0.5, 0.0),
            },
            PositionVertex {
                position: Vec3::new(-0.5, -0.5, 0.0),
            },
            PositionVertex {
                position: Vec3::new(-0.5, 0.5, 0.0),
            },
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self::from_vertices(PositionVertex::layout(), &vertices, indices)
    }

    /// Unit cube centered at the origin, 36 non-indexed vertices with one
    /// flat color per face.
    pub fn colored_cube() -> Self {
        let face_colors = [
            Vec3::new(0.85, 0.25, 0.25), // front
            Vec3::new(0.25, 0.85, 0.25), // back
            Vec3::new(0.25, 0.25, 0.85), // right
            Vec3::new(0.85, 0.85, 0.25), // left
            Vec3::new(0.25, 0.85, 0.85), // top
            Vec3::new(0.85, 0.25, 0.85), // bottom
        ];

        // Four corners per face, split into two triangles below.
        let face_corners = [
            // Front (+Z)
            [
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
            ],
            // Back (-Z)
            [
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
            ],
            // Right (+X)
            [
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, 0.5),
            ],
            // Left (-X)
            [
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(-0.5, 0.5, -0.5),
            ],
            // Top (+Y)
            [
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(-0.5, 0.5, -0.5),
            ],
            // Bottom (-Y)
            [
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(-0.5, -0.5, 0.5),
            ],
        ];

        let mut vertices = Vec::with_capacity(36);
        for (corners, &color) in face_corners.iter().zip(&face_colors) {
            for &index in &[0usize, 1, 2, 0, 2, 3] {
                vertices.push(ColorVertex {
                    position: corners[index],
                    color,
                });
            }
        }

        Self::from_vertices(ColorVertex::layout(), &vertices, Vec::new())
    }
}
