pub mod camera;
pub mod gpu;
pub mod overlay;

pub use camera::{OrbitControls, OrthographicCamera};
pub use gpu::GpuState;
pub use overlay::{Overlay, OverlayFrame};
