//! Rectangular control-point lattice generation.
//!
//! A [`Grid`] subdivides a fixed bounding frame into `(size_u+1) × (size_v+1)`
//! evenly spaced control points, arranged row-major (u varies per row, v per
//! column). The lattice is the seed geometry consumed by surface fitting and
//! visualization; this module owns its generation, regeneration and reset
//! semantics. Elevation perturbation lives in [`Grid::bumps`], file output
//! in [`Grid::save_to`].

use super::core::Point3;
use super::export::{self, ExportDiagnostics, ExportError};

/// Direction label used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    U,
    V,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U => f.write_str("u"),
            Self::V => f.write_str("v"),
        }
    }
}

/// Errors raised by grid construction, generation and translation.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("frame dimension along {axis} must be positive and finite, got {value}")]
    FrameNotPositive { axis: Axis, value: f64 },
    #[error("subdivision count along {axis} is not a finite number")]
    SizeNotFinite { axis: Axis },
    #[error("subdivision count along {axis} must be at least 1, got {value}")]
    SizeTooSmall { axis: Axis, value: i64 },
    #[error("translation target must be finite")]
    TranslationNotFinite,
    #[error("grid has not been generated yet")]
    NotGenerated,
}

/// The fixed rectangular extent a lattice spans, plus its anchor point.
///
/// Dimensions are set at construction and survive `reset`; the origin is
/// `(0,0,0)` until a translation moves it and `reset` restores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingFrame {
    dim_u: f64,
    dim_v: f64,
    origin: Point3,
}

impl BoundingFrame {
    fn new(dim_u: f64, dim_v: f64) -> Result<Self, GridError> {
        if !dim_u.is_finite() || dim_u <= 0.0 {
            return Err(GridError::FrameNotPositive {
                axis: Axis::U,
                value: dim_u,
            });
        }
        if !dim_v.is_finite() || dim_v <= 0.0 {
            return Err(GridError::FrameNotPositive {
                axis: Axis::V,
                value: dim_v,
            });
        }
        Ok(Self {
            dim_u,
            dim_v,
            origin: Point3::ORIGIN,
        })
    }

    /// Extent along u.
    #[must_use]
    pub fn dim_u(&self) -> f64 {
        self.dim_u
    }

    /// Extent along v.
    #[must_use]
    pub fn dim_v(&self) -> f64 {
        self.dim_v
    }

    /// Anchor point of the lattice; point `(0,0)` sits here.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        self.origin
    }
}

/// Diagnostics returned by a successful [`Grid::generate`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerateDiagnostics {
    /// Subdivision count along u actually used (after any truncation).
    pub size_u: usize,
    /// Subdivision count along v actually used (after any truncation).
    pub size_v: usize,
    /// Total number of lattice points produced.
    pub point_count: usize,
    /// Soft warnings (e.g. fractional inputs that were truncated).
    pub warnings: Vec<String>,
}

impl GenerateDiagnostics {
    /// Returns `true` if any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Generator of rectangular control-point lattices.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    frame: BoundingFrame,
    size_u: usize,
    size_v: usize,
    points: Vec<Vec<Point3>>,
}

impl Grid {
    /// Creates an empty grid spanning `dim_u × dim_v`.
    ///
    /// The lattice starts empty; call [`Grid::generate`] to populate it.
    pub fn new(dim_u: f64, dim_v: f64) -> Result<Self, GridError> {
        Ok(Self {
            frame: BoundingFrame::new(dim_u, dim_v)?,
            size_u: 0,
            size_v: 0,
            points: Vec::new(),
        })
    }

    /// The bounding frame this grid subdivides.
    #[must_use]
    pub fn frame(&self) -> &BoundingFrame {
        &self.frame
    }

    /// Subdivision count along u (`0` before generation).
    #[must_use]
    pub fn size_u(&self) -> usize {
        self.size_u
    }

    /// Subdivision count along v (`0` before generation).
    #[must_use]
    pub fn size_v(&self) -> usize {
        self.size_v
    }

    /// Whether a lattice has been generated.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        !self.points.is_empty()
    }

    /// The current lattice as rows of points; empty before generation.
    #[must_use]
    pub fn grid(&self) -> &[Vec<Point3>] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<Vec<Point3>> {
        &mut self.points
    }

    /// (Re)generates the lattice with `size_u × size_v` subdivisions.
    ///
    /// Fractional counts are truncated with a warning; counts below 1 (and
    /// non-finite inputs) fail without touching the existing lattice. A
    /// successful call replaces any previous lattice entirely.
    pub fn generate(
        &mut self,
        size_u: f64,
        size_v: f64,
    ) -> Result<GenerateDiagnostics, GridError> {
        let mut warnings = Vec::new();
        let su = coerce_size(size_u, Axis::U, &mut warnings)?;
        let sv = coerce_size(size_v, Axis::V, &mut warnings)?;

        let spacing_u = self.frame.dim_u / su as f64;
        let spacing_v = self.frame.dim_v / sv as f64;
        let origin = self.frame.origin;

        let mut points = Vec::with_capacity(su + 1);
        for iu in 0..=su {
            let mut row = Vec::with_capacity(sv + 1);
            for iv in 0..=sv {
                row.push(Point3::new(
                    origin.x + iu as f64 * spacing_u,
                    origin.y + iv as f64 * spacing_v,
                    origin.z,
                ));
            }
            points.push(row);
        }

        self.points = points;
        self.size_u = su;
        self.size_v = sv;

        log::debug!(
            "generated {}x{} lattice ({} points)",
            su + 1,
            sv + 1,
            (su + 1) * (sv + 1)
        );

        Ok(GenerateDiagnostics {
            size_u: su,
            size_v: sv,
            point_count: (su + 1) * (sv + 1),
            warnings,
        })
    }

    /// Clears the lattice, the subdivision counts and the origin.
    ///
    /// The frame dimensions survive. Idempotent.
    pub fn reset(&mut self) {
        self.points.clear();
        self.size_u = 0;
        self.size_v = 0;
        self.frame.origin = Point3::ORIGIN;
    }

    /// Moves the lattice so that its origin lands on `position`.
    ///
    /// Requires a generated lattice; shape and spacing are preserved.
    pub fn translate(&mut self, position: Point3) -> Result<(), GridError> {
        if !self.is_generated() {
            return Err(GridError::NotGenerated);
        }
        if !position.is_finite() {
            return Err(GridError::TranslationNotFinite);
        }

        let delta = position - self.frame.origin;
        for row in &mut self.points {
            for point in row {
                *point = *point + delta;
            }
        }
        self.frame.origin = position;
        Ok(())
    }

    /// Saves the lattice under the default file name (`grid.txt`).
    pub fn save(&self) -> Result<ExportDiagnostics, ExportError> {
        self.save_to(export::DEFAULT_FILE_NAME)
    }

    /// Saves the lattice to `file_name`, one row per line.
    ///
    /// Fails with a lifecycle error before the first successful
    /// [`Grid::generate`]. A blank name is substituted with the default name
    /// under a warning, and a write failure under a caller-supplied name is
    /// retried once under the default name before becoming fatal.
    pub fn save_to(&self, file_name: &str) -> Result<ExportDiagnostics, ExportError> {
        if !self.is_generated() {
            return Err(ExportError::NotGenerated);
        }
        let snapshot: Vec<Vec<[f64; 3]>> = self
            .points
            .iter()
            .map(|row| row.iter().map(|p| p.to_array()).collect())
            .collect();
        export::write_lattice(&snapshot, file_name)
    }
}

fn coerce_size(value: f64, axis: Axis, warnings: &mut Vec<String>) -> Result<usize, GridError> {
    if !value.is_finite() {
        return Err(GridError::SizeNotFinite { axis });
    }
    let truncated = value.trunc();
    if truncated != value {
        let message = format!(
            "subdivision count along {axis} truncated from {value} to {truncated}"
        );
        log::warn!("{message}");
        warnings.push(message);
    }
    if truncated < 1.0 {
        return Err(GridError::SizeTooSmall {
            axis,
            value: truncated as i64,
        });
    }
    Ok(truncated as usize)
}
