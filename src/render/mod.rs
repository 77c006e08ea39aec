//! Renderer boundary.
//!
//! Each frame the renderer receives the position and color buffers from
//! [`FrameBuffers`](crate::frame::FrameBuffers) and draws every trail vertex as
//! an additively blended, camera-facing point sprite. The shader and uniform
//! layout live here so they can be validated without a GPU; the wgpu renderer
//! itself is behind the `viewer` feature.

mod camera;
#[cfg(feature = "viewer")]
mod gpu;

pub use camera::OrbitCamera;
#[cfg(feature = "viewer")]
pub use gpu::Renderer;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Point-sprite shader.
///
/// Vertex buffer 0 holds per-instance positions, buffer 1 per-instance
/// colors (both `Float32x3`). Each instance is a 6-vertex quad.
pub const SHADER_SOURCE: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    point_size: f32,
    aspect: f32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index % 6u];

    var out: VertexOutput;
    let clip = uniforms.view_proj * vec4<f32>(position, 1.0);
    let offset = vec2<f32>(corner.x / uniforms.aspect, corner.y) * uniforms.point_size;
    out.clip_position = clip + vec4<f32>(offset, 0.0, 0.0);
    out.color = color;
    out.uv = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.uv);
    if d > 1.0 {
        discard;
    }
    let falloff = (1.0 - d) * (1.0 - d);
    return vec4<f32>(in.color * falloff, falloff);
}
"#;

/// Vertices per sprite quad.
pub const VERTICES_PER_SPRITE: u32 = 6;

/// Uniform block matching `Uniforms` in [`SHADER_SOURCE`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RenderUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Sprite half-size in clip units at unit depth.
    pub point_size: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub _pad: [f32; 2],
}

impl RenderUniforms {
    pub fn new(view_proj: Mat4, point_size: f32, aspect: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            point_size,
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<RenderUniforms>(), 80);
        assert_eq!(std::mem::size_of::<RenderUniforms>() % 16, 0);
    }

    #[test]
    fn test_zero_aspect_is_guarded() {
        let u = RenderUniforms::new(Mat4::IDENTITY, 0.02, 0.0);
        assert_eq!(u.aspect, 1.0);
    }

    #[test]
    fn test_shader_has_entry_points() {
        assert!(SHADER_SOURCE.contains("fn vs_main"));
        assert!(SHADER_SOURCE.contains("fn fs_main"));
    }
}
