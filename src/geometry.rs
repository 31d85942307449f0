//! GPU-resident geometry.
//!
//! A [`GeometryBuffer`] is uploaded once before the frame loop starts and
//! reused unchanged for every frame; there is no streaming or update path.

use crate::driver::{BufferHandle, DriverResult, GpuDriver, VertexArrayHandle};
use crate::mesh::MeshData;

/// One draw call issued per instance each frame.
///
/// Several `Indexed` draws may address disjoint sub-ranges of the same
/// index buffer, so one upload can back multiple independent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    /// Indexed draw: `count` indices starting `byte_offset` bytes into the
    /// index buffer.
    Indexed { count: u32, byte_offset: u32 },
    /// Non-indexed draw over the raw vertex range.
    Arrays { first: u32, count: u32 },
}

impl Draw {
    /// The draw list covering a whole mesh in a single call.
    pub fn whole_mesh(mesh: &MeshData) -> Vec<Draw> {
        if mesh.has_indices() {
            vec![Draw::Indexed {
                count: mesh.index_count(),
                byte_offset: 0,
            }]
        } else {
            vec![Draw::Arrays {
                first: 0,
                count: mesh.vertex_count(),
            }]
        }
    }
}

/// Owning wrapper over the uploaded vertex/index buffers and their vertex
/// array. Deleted exactly once via [`GeometryBuffer::destroy`]; dropping a
/// live buffer only logs, since deletion needs the driver.
pub struct GeometryBuffer {
    vertex_buffer: BufferHandle,
    index_buffer: Option<BufferHandle>,
    vertex_array: VertexArrayHandle,
    draws: Vec<Draw>,
    live: bool,
}

impl GeometryBuffer {
    /// Upload a mesh as a single immutable allocation and declare its
    /// attribute layout.
    pub fn upload<D: GpuDriver>(
        driver: &mut D,
        mesh: &MeshData,
        draws: Vec<Draw>,
    ) -> DriverResult<Self> {
        let vertex_buffer = driver.create_vertex_buffer(mesh.vertex_bytes())?;
        let index_buffer = if mesh.has_indices() {
            Some(driver.create_index_buffer(mesh.index_bytes())?)
        } else {
            None
        };
        let layout = mesh.layout();
        let vertex_array = driver.create_vertex_array(
            vertex_buffer,
            index_buffer,
            layout.stride,
            &layout.attributes,
        )?;

        log::debug!(
            "uploaded geometry: {} vertices, {} indices, {} draw(s)",
            mesh.vertex_count(),
            mesh.index_count(),
            draws.len()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_array,
            draws,
            live: true,
        })
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    /// Release the vertex array and both buffers.
    pub fn destroy<D: GpuDriver>(mut self, driver: &mut D) {
        driver.delete_vertex_array(self.vertex_array);
        driver.delete_buffer(self.vertex_buffer);
        if let Some(index_buffer) = self.index_buffer {
            driver.delete_buffer(index_buffer);
        }
        self.live = false;
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        if self.live {
            log::warn!("geometry buffer dropped without destroy; GPU buffers leak");
        }
    }
}
