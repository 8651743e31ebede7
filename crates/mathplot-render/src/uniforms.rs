//! GPU uniform blocks.
//!
//! Layouts must match the WGSL structs exactly; WGSL `vec3<f32>` has
//! 16-byte alignment, hence the explicit padding fields.

use glam::{Mat4, Vec3};

/// Per-frame uniforms: projection, lights and the cylindrical camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Projection matrix (identity in cylindrical mode).
    pub p_matrix: [[f32; 4]; 4],
    /// Light colour.
    pub light_colour: [f32; 3],
    /// Ambient intensity.
    pub ambient_intensity: f32,
    /// Diffuse light position (world).
    pub diffuse_position: [f32; 3],
    /// Diffuse intensity.
    pub diffuse_intensity: f32,
    /// Cylindrical camera position (world).
    pub cyl_cam_pos: [f32; 3],
    /// Cylindrical screen radius.
    pub cyl_radius: f32,
    /// Cylindrical screen height.
    pub cyl_height: f32,
    pub _pad: [f32; 3],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            p_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            light_colour: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
            diffuse_position: [5.0, 5.0, 15.0],
            diffuse_intensity: 0.0,
            cyl_cam_pos: [0.0, 0.0, 0.0],
            cyl_radius: 0.005,
            cyl_height: 0.01,
            _pad: [0.0; 3],
        }
    }
}

impl FrameUniforms {
    /// Sets the projection matrix.
    pub fn set_projection(&mut self, p: Mat4) {
        self.p_matrix = p.to_cols_array_2d();
    }

    /// Sets the light parameters.
    pub fn set_lights(
        &mut self,
        colour: Vec3,
        ambient_intensity: f32,
        diffuse_position: Vec3,
        diffuse_intensity: f32,
    ) {
        self.light_colour = colour.to_array();
        self.ambient_intensity = ambient_intensity;
        self.diffuse_position = diffuse_position.to_array();
        self.diffuse_intensity = diffuse_intensity;
    }
}

/// Per-model uniforms: scene view, model placement and opacity.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Scene view matrix assigned to this model for the frame.
    pub v_matrix: [[f32; 4]; 4],
    /// The model's world placement.
    pub m_matrix: [[f32; 4]; 4],
    /// Model-wide opacity.
    pub alpha: f32,
    pub _pad: [f32; 3],
}

impl Default for ModelUniforms {
    fn default() -> Self {
        Self {
            v_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            m_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            alpha: 1.0,
            _pad: [0.0; 3],
        }
    }
}

impl ModelUniforms {
    /// Builds from matrices and opacity.
    #[must_use]
    pub fn new(view: Mat4, model: Mat4, alpha: f32) -> Self {
        Self {
            v_matrix: view.to_cols_array_2d(),
            m_matrix: model.to_cols_array_2d(),
            alpha,
            _pad: [0.0; 3],
        }
    }
}

/// Per-text uniforms: matrices plus the text colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextUniforms {
    /// View matrix for this text model (independent of the parent model).
    pub v_matrix: [[f32; 4]; 4],
    /// The text model's world placement.
    pub m_matrix: [[f32; 4]; 4],
    /// Text colour.
    pub clr_text: [f32; 3],
    pub _pad: f32,
}

impl Default for TextUniforms {
    fn default() -> Self {
        Self {
            v_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            m_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            clr_text: [0.0, 0.0, 0.0],
            _pad: 0.0,
        }
    }
}

impl TextUniforms {
    /// Builds from matrices and colour.
    #[must_use]
    pub fn new(view: Mat4, model: Mat4, colour: Vec3) -> Self {
        Self {
            v_matrix: view.to_cols_array_2d(),
            m_matrix: model.to_cols_array_2d(),
            clr_text: colour.to_array(),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<ModelUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<TextUniforms>() % 16, 0);
    }
}
