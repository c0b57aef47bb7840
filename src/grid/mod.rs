mod bump;
mod core;
mod export;
mod lattice;
mod weighted;

pub use bump::{BumpDiagnostics, BumpError, BumpOptions};
pub use core::{Point3, Vec3, WeightedPoint};
pub use export::{DEFAULT_FILE_NAME, ExportDiagnostics, ExportError};
pub use lattice::{Axis, BoundingFrame, GenerateDiagnostics, Grid, GridError};
pub use weighted::{DEFAULT_WEIGHT, WeightError, WeightedGrid};

#[cfg(test)]
mod tests;
