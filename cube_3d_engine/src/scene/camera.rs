/// Camera - passive view/projection container for the cube scene
///
/// The camera stores matrices and the viewport size; the free functions
/// below build the matrices the scene hands to it.

use glam::{Mat4, Vec3};

/// Vertical field of view, in degrees
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;

/// Near clip plane distance
pub const NEAR_PLANE: f32 = 0.1;

/// Far clip plane distance
pub const FAR_PLANE: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    viewport: (u32, u32),
}

impl Camera {
    /// Camera at `position` looking down -Z, with an identity projection
    /// until the first resize
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            view_matrix: view_from_position(position),
            projection_matrix: Mat4::IDENTITY,
            viewport: (0, 0),
        }
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View matrix (inverse of the camera translation)
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Last viewport size as `(width, height)`
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    // ===== SETTERS =====

    /// Move the camera; the view matrix follows
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_matrix = view_from_position(position);
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

/// View matrix of a camera at `position` with no rotation
pub fn view_from_position(position: Vec3) -> Mat4 {
    Mat4::from_translation(-position)
}

/// Aspect ratio of a viewport; a zero width or height counts as 1
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// OpenGL perspective projection for a `width` x `height` viewport
pub fn perspective_for_viewport(width: u32, height: u32) -> Mat4 {
    Mat4::perspective_rh_gl(
        FIELD_OF_VIEW_DEGREES.to_radians(),
        aspect_ratio(width, height),
        NEAR_PLANE,
        FAR_PLANE,
    )
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
