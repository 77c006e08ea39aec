//! Error types for morphe.
//!
//! Nothing here is fatal to a running scene: stroke and config errors leave the
//! previous state in place, and the viewer errors only stop the window.

use thiserror::Error;

/// A drawing that cannot be turned into a point cloud.
///
/// The caller keeps its previous custom shape (or cancels) when it sees one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrokeError {
    /// The drawing has no strokes.
    #[error("drawing has no strokes")]
    EmptyDrawing,
    /// Fewer than two points across all strokes.
    #[error("drawing has {0} point(s), at least 2 are needed")]
    TooFewPoints(usize),
    /// Every stroke collapses to a single location.
    #[error("drawing has zero total length")]
    ZeroLength,
    /// A cloud of zero points was requested.
    #[error("target point count is zero")]
    ZeroTarget,
    /// Canvas dimensions that cannot be normalized.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A value outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// An identifier that names no built-in shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shape: {0}")]
pub struct UnknownShape(pub String);

/// Errors that can occur during GPU initialization.
#[cfg(feature = "viewer")]
#[derive(Error, Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a GPU with Vulkan/Metal/DX12 support is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the viewer window.
#[cfg(feature = "viewer")]
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_error_messages() {
        assert_eq!(StrokeError::TooFewPoints(1).to_string(), "drawing has 1 point(s), at least 2 are needed");
        assert_eq!(
            StrokeError::InvalidCanvas { width: 0.0, height: 10.0 }.to_string(),
            "invalid canvas size 0x10"
        );
    }

    #[test]
    fn test_config_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
