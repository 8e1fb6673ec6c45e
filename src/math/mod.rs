pub mod edges;
pub mod element;
pub mod mapping;
pub mod mesh;
pub mod primitives;
pub mod spline;

pub use edges::{EdgeCurve, EdgeCurveExtractor, EdgeCurveSet};
pub use element::{ElementShape, ElementSpec, Face, Range};
pub use mapping::{Axis, CoordinateMapping};
pub use mesh::{ElementMesh, ElementMeshBuilder, TriangleMesh};
pub use spline::CatmullRomCurve;
