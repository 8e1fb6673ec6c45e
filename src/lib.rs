//! Interactive diagrams of Cartesian, cylindrical and spherical coordinates.
//!
//! [`math`] turns a coordinate mapping and parameter ranges into element
//! meshes and smooth boundary curves. [`scene`] keeps those in sync with
//! editable parameters and owns the render loop. [`renderer`] draws a scene
//! with wgpu.

pub mod config;
pub mod error;
pub mod math;
pub mod renderer;
pub mod scene;

pub use config::{MeshConfig, SceneConfig};
pub use error::{Result, VizError};
