/// CubeMesh - the 2x2x2 cube as a vertex buffer + vertex array pair
///
/// Positions are uploaded once; attribute 0 reads three floats per vertex.
/// Like shaders and programs, the backend objects must be released
/// explicitly through the context that created them.

use std::marker::PhantomData;
use crate::error::{Error, Result};
use crate::graphics_device::{BufferHandle, VertexArrayHandle};
use crate::render_context::{RenderContext, RenderContextId};
use crate::{engine_bail, engine_debug, engine_warn};

/// Number of vertices in [`CUBE_POSITIONS`]
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Attribute index the vertex shader reads positions from
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Twelve triangles of a cube centered on the origin, one triangle per row
#[rustfmt::skip]
pub const CUBE_POSITIONS: [f32; 108] = [
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0, -1.0,
     1.0, -1.0,  1.0,   1.0,  1.0,  1.0,   1.0,  1.0, -1.0,
     1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0,  1.0,
    -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,
];

pub struct CubeMesh {
    vertex_array: VertexArrayHandle,
    buffer: BufferHandle,
    context: RenderContextId,
    released: bool,
    _not_send: PhantomData<*const ()>,
}

impl CubeMesh {
    /// Create the vertex array and buffer and upload [`CUBE_POSITIONS`]
    ///
    /// # Errors
    ///
    /// `BackendResourceExhausted` if either object cannot be allocated.
    pub fn upload(context: &mut RenderContext) -> Result<Self> {
        let owner = context.id();
        let device = context.device_mut();

        let vertex_array = match device.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(error) => engine_bail!("cube3d::CubeMesh", error),
        };
        let buffer = match device.create_buffer() {
            Ok(buffer) => buffer,
            Err(error) => {
                device.delete_vertex_array(vertex_array);
                engine_bail!("cube3d::CubeMesh", error);
            }
        };

        device.bind_vertex_array(Some(vertex_array));
        device.upload_vertex_buffer(buffer, bytemuck::cast_slice(&CUBE_POSITIONS));
        device.vertex_attribute_f32(buffer, POSITION_ATTRIBUTE, 3);
        device.bind_vertex_array(None);

        engine_debug!("cube3d::CubeMesh", "Uploaded {} cube vertices ({} bytes)",
            CUBE_VERTEX_COUNT, std::mem::size_of_val(&CUBE_POSITIONS));

        Ok(Self {
            vertex_array,
            buffer,
            context: owner,
            released: false,
            _not_send: PhantomData,
        })
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn context_id(&self) -> RenderContextId {
        self.context
    }

    /// Bind the vertex array and draw all triangles
    pub fn draw(&self, context: &mut RenderContext) -> Result<()> {
        if self.released {
            engine_bail!("cube3d::CubeMesh", Error::AlreadyReleased);
        }
        context.ensure_owner(self.context, "cube3d::CubeMesh")?;
        let device = context.device_mut();
        device.bind_vertex_array(Some(self.vertex_array));
        device.draw_triangles(0, CUBE_VERTEX_COUNT);
        Ok(())
    }

    /// Delete the buffer and vertex array
    pub fn release(&mut self, context: &mut RenderContext) -> Result<()> {
        if self.released {
            engine_bail!("cube3d::CubeMesh", Error::AlreadyReleased);
        }
        context.ensure_owner(self.context, "cube3d::CubeMesh")?;
        let device = context.device_mut();
        device.bind_vertex_array(None);
        device.delete_buffer(self.buffer);
        device.delete_vertex_array(self.vertex_array);
        self.released = true;
        Ok(())
    }
}

impl Drop for CubeMesh {
    fn drop(&mut self) {
        if !self.released {
            engine_warn!("cube3d::CubeMesh",
                "Cube mesh (vertex array {}) dropped without release", self.vertex_array.0);
        }
    }
}
