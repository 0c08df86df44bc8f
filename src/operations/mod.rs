pub mod contour;
pub mod infill;
pub mod nesting;
pub mod offset;
pub mod section;
pub mod shell;

pub use contour::{BuildContours, ContourBuild};
pub use infill::{GenerateInfill, InfillPattern, InfillSettings};
pub use nesting::{ContourId, NestRegions};
pub use offset::MiterOffset2D;
pub use section::PlaneSection;
pub use shell::GenerateShells;
