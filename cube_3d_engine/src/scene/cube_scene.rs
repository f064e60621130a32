/// CubeScene - the render host drawing one (optionally rotating) cube
///
/// At init the scene builds a vertex + fragment program and uploads the cube.
/// Each frame it binds the program, writes `mv_matrix` and `proj_matrix`,
/// clears and draws the 36 cube vertices with depth testing.

use glam::{Mat4, Vec3};

use crate::error::{Error, Result};
use crate::render_context::RenderContext;
use crate::scene::camera::{perspective_for_viewport, Camera};
use crate::scene::cube_mesh::CubeMesh;
use crate::scene::render_host::RenderHost;
use crate::shader::{Program, ShaderSource, ShaderStageKind, SourceOrigin};
use crate::{engine_bail, engine_debug, engine_warn};

/// Name of the model-view matrix uniform
pub const MV_MATRIX_UNIFORM: &str = "mv_matrix";

/// Name of the projection matrix uniform
pub const PROJ_MATRIX_UNIFORM: &str = "proj_matrix";

/// Scene parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSceneDesc {
    pub vertex_shader: SourceOrigin,
    pub fragment_shader: SourceOrigin,
    pub camera_position: Vec3,
    pub cube_position: Vec3,
    /// Radians per second around Y; 0 keeps the cube static
    pub rotation_speed: f32,
    pub clear_color: [f32; 4],
}

impl Default for CubeSceneDesc {
    fn default() -> Self {
        Self {
            vertex_shader: SourceOrigin::Resource("shaders/simple_vertex.glsl".to_string()),
            fragment_shader: SourceOrigin::Resource("shaders/simple_fragment.glsl".to_string()),
            camera_position: Vec3::new(0.0, 0.0, 8.0),
            cube_position: Vec3::new(0.0, -2.0, 0.0),
            rotation_speed: 0.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub struct CubeScene {
    desc: CubeSceneDesc,
    sources: ShaderSource,
    camera: Camera,
    program: Option<Program>,
    mesh: Option<CubeMesh>,
    elapsed: f32,
}

impl CubeScene {
    pub fn new(desc: CubeSceneDesc, sources: ShaderSource) -> Self {
        let camera = Camera::new(desc.camera_position);
        Self {
            desc,
            sources,
            camera,
            program: None,
            mesh: None,
            elapsed: 0.0,
        }
    }

    // ===== ACCESSORS =====

    pub fn desc(&self) -> &CubeSceneDesc {
        &self.desc
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Linked program, between init and shutdown
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    pub fn mesh(&self) -> Option<&CubeMesh> {
        self.mesh.as_ref()
    }

    /// Seconds of animation time accumulated with `advance`
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance the animation clock
    pub fn advance(&mut self, seconds: f32) {
        self.elapsed += seconds;
    }

    // ===== TRANSFORMS =====

    /// Cube translation combined with its rotation around Y
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.desc.cube_position)
            * Mat4::from_rotation_y(self.desc.rotation_speed * self.elapsed)
    }

    /// View * model, as written to `mv_matrix`
    pub fn model_view_matrix(&self) -> Mat4 {
        *self.camera.view_matrix() * self.model_matrix()
    }

    fn build_program(&self, context: &mut RenderContext, program: &mut Program) -> Result<()> {
        program
            .stage(context, ShaderStageKind::Vertex)?
            .load_source(&self.sources, &self.desc.vertex_shader)?;
        program
            .stage(context, ShaderStageKind::Fragment)?
            .load_source(&self.sources, &self.desc.fragment_shader)?;
        program.compile(context)
    }
}

/// Release a half-built program; the original error wins over release errors
fn discard_program(context: &mut RenderContext, mut program: Program) {
    if let Err(error) = program.release(context) {
        engine_warn!("cube3d::CubeScene", "Releasing the unfinished program failed: {}", error);
    }
}

impl RenderHost for CubeScene {
    fn on_init(&mut self, context: &mut RenderContext) -> Result<()> {
        if self.program.is_some() {
            engine_bail!("cube3d::CubeScene",
                Error::HostState("cube scene is already initialized".to_string()));
        }

        let mut program = Program::create(context)?;
        if let Err(error) = self.build_program(context, &mut program) {
            discard_program(context, program);
            return Err(error);
        }

        let mesh = match CubeMesh::upload(context) {
            Ok(mesh) => mesh,
            Err(error) => {
                discard_program(context, program);
                return Err(error);
            }
        };

        engine_debug!("cube3d::CubeScene", "Cube scene ready: camera at {}, cube at {}",
            self.desc.camera_position, self.desc.cube_position);

        self.program = Some(program);
        self.mesh = Some(mesh);
        Ok(())
    }

    fn on_resize(&mut self, context: &mut RenderContext, width: u32, height: u32) -> Result<()> {
        self.camera.set_projection(perspective_for_viewport(width, height));
        self.camera.set_viewport(width, height);
        context.device_mut().set_viewport(width, height);
        Ok(())
    }

    fn on_frame(&mut self, context: &mut RenderContext) -> Result<()> {
        let model_view = self.model_view_matrix();
        let projection = *self.camera.projection_matrix();

        let (Some(program), Some(mesh)) = (self.program.as_mut(), self.mesh.as_ref()) else {
            engine_bail!("cube3d::CubeScene",
                Error::HostState("frame requested before the cube scene was initialized".to_string()));
        };

        program.use_program(context)?;
        program.set_uniform_mat4(context, MV_MATRIX_UNIFORM, &model_view)?;
        program.set_uniform_mat4(context, PROJ_MATRIX_UNIFORM, &projection)?;

        let device = context.device_mut();
        device.clear(self.desc.clear_color);
        device.set_depth_test(true);
        mesh.draw(context)
    }

    fn on_shutdown(&mut self, context: &mut RenderContext) -> Result<()> {
        // Objects of another context stay owned so the right context can still release them
        if let Some(program) = &self.program {
            context.ensure_owner(program.context_id(), "cube3d::CubeScene")?;
        }
        if let Some(mesh) = &self.mesh {
            context.ensure_owner(mesh.context_id(), "cube3d::CubeScene")?;
        }

        let mut first_error = None;

        if let Some(mut program) = self.program.take() {
            if let Err(error) = program.release(context) {
                first_error.get_or_insert(error);
            }
        }
        if let Some(mut mesh) = self.mesh.take() {
            if let Err(error) = mesh.release(context) {
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "cube_scene_tests.rs"]
mod tests;
