//! Error types for the visualizer.
//!
//! The geometry engine is total over its input domain and never returns
//! these. They only surface at the host boundary (window, GPU) and for
//! wiring mistakes such as an unknown parameter name.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("failed to create render surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    AdapterUnavailable,

    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("render surface is out of memory")]
    OutOfMemory,

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("scene has already been disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, VizError>;
