//! Scene module - the render host seam and the cube scene built on it.
//!
//! `RenderHost` is what a windowing layer drives; `FrameDriver` guards the
//! call order; `CubeScene` is the host that draws the cube.

pub mod camera;
pub mod cube_mesh;
mod render_host;
mod cube_scene;

pub use camera::Camera;
pub use cube_mesh::{CubeMesh, CUBE_POSITIONS, CUBE_VERTEX_COUNT};
pub use render_host::{FrameDriver, HostPhase, RenderHost};
pub use cube_scene::{CubeScene, CubeSceneDesc, MV_MATRIX_UNIFORM, PROJ_MATRIX_UNIFORM};
