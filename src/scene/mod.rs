pub mod diagrams;
pub mod graph;
pub mod lifecycle;
pub mod params;
pub mod resize;
pub mod surface;
pub mod update;
pub mod visualization;

pub use diagrams::{DIAGRAMS, Diagram, DiagramKind};
pub use graph::{NodeId, NodeRole, SceneGraph};
pub use lifecycle::{FrameSchedule, LifecycleState, SceneLifecycle, TickStatus};
pub use params::{ParameterEdit, ParameterSpec, ParameterStore};
pub use resize::ResizeNotifier;
pub use surface::{HeadlessSurface, RenderSurface, SurfaceSize, Viewport};
pub use update::UpdateCycle;
pub use visualization::Visualization;
