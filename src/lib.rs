//! Planar mesh slicing for fused-filament printing.
//!
//! A closed triangle mesh is cut by horizontal planes; each cut is stitched
//! into closed contours, nested into regions with holes, and turned into
//! role-tagged toolpaths (walls, sparse infill, solid top and bottom fill).
//!
//! ```
//! use lamina::geometry::Mesh;
//! use lamina::math::Point3;
//! use lamina::slicer::{SliceMesh, SliceOptions};
//!
//! let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
//! // A single tetrahedron.
//! let mesh = Mesh::from_triangles(&[
//!     [p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(0.0, 4.0, 0.0)],
//!     [p(0.0, 0.0, 0.0), p(0.0, 4.0, 0.0), p(0.0, 0.0, 4.0)],
//!     [p(0.0, 0.0, 0.0), p(0.0, 0.0, 4.0), p(4.0, 0.0, 0.0)],
//!     [p(4.0, 0.0, 0.0), p(0.0, 0.0, 4.0), p(0.0, 4.0, 0.0)],
//! ]);
//! let options = SliceOptions::default().with_layer_height(1.0);
//! let output = SliceMesh::new(&mesh, &options).execute();
//! assert_eq!(output.layers.len(), 4);
//! ```

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod slicer;
pub mod toolpath;

pub use error::{Result, SliceError};
pub use slicer::{SliceMesh, SliceOptions, SliceOutput};
pub use toolpath::{PathGroup, PathPoint, Role};
