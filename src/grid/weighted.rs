//! Weighted control-point lattices for rational surface fitting.
//!
//! [`WeightedGrid`] wraps the plain [`Grid`] and presents every control point
//! with a uniform rational weight appended as 4th component. The expanded
//! point list is memoized behind an explicit validity flag: reading it twice
//! costs one expansion, and every mutation of either the weight or the
//! underlying lattice clears the cache so a stale expansion can never be
//! observed.

use super::bump::{BumpDiagnostics, BumpError, BumpOptions};
use super::core::{Point3, WeightedPoint};
use super::export::{self, ExportDiagnostics, ExportError};
use super::lattice::{BoundingFrame, GenerateDiagnostics, Grid, GridError};

/// Weight carried by a freshly constructed (or reset) weighted grid.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Errors raised by weight assignment.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("weight must be a finite number, got {value}")]
    NotFinite { value: f64 },
    #[error("weight must be strictly positive, got {value}")]
    NotPositive { value: f64 },
}

/// A control-point grid whose points carry a shared rational weight.
#[derive(Debug, Clone)]
pub struct WeightedGrid {
    base: Grid,
    weight: f64,
    cache: Option<Vec<Vec<WeightedPoint>>>,
}

impl WeightedGrid {
    /// Creates an empty weighted grid spanning `dim_u × dim_v`.
    pub fn new(dim_u: f64, dim_v: f64) -> Result<Self, GridError> {
        Ok(Self {
            base: Grid::new(dim_u, dim_v)?,
            weight: DEFAULT_WEIGHT,
            cache: None,
        })
    }

    /// The bounding frame this grid subdivides.
    #[must_use]
    pub fn frame(&self) -> &BoundingFrame {
        self.base.frame()
    }

    /// Subdivision count along u (`0` before generation).
    #[must_use]
    pub fn size_u(&self) -> usize {
        self.base.size_u()
    }

    /// Subdivision count along v (`0` before generation).
    #[must_use]
    pub fn size_v(&self) -> usize {
        self.base.size_v()
    }

    /// Whether a lattice has been generated.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.base.is_generated()
    }

    /// The weight shared by all points.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Replaces the shared weight and invalidates the expanded point list.
    ///
    /// The weight must be finite and strictly positive; the lattice itself
    /// is not regenerated.
    pub fn set_weight(&mut self, weight: f64) -> Result<(), WeightError> {
        if !weight.is_finite() {
            return Err(WeightError::NotFinite { value: weight });
        }
        if weight <= 0.0 {
            return Err(WeightError::NotPositive { value: weight });
        }
        self.weight = weight;
        self.cache = None;
        Ok(())
    }

    /// The weighted lattice as rows of 4-component points.
    ///
    /// Expanded lazily from the base lattice and memoized until the next
    /// mutation; empty before generation.
    pub fn grid(&mut self) -> &[Vec<WeightedPoint>] {
        if self.cache.is_none() {
            let weight = self.weight;
            let expanded = self
                .base
                .grid()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&p| WeightedPoint::from_point(p, weight))
                        .collect()
                })
                .collect();
            self.cache = Some(expanded);
        }
        self.cache.as_deref().unwrap_or_default()
    }

    /// (Re)generates the underlying lattice; see [`Grid::generate`].
    ///
    /// The weight value survives regeneration, the cached expansion does not.
    pub fn generate(
        &mut self,
        size_u: f64,
        size_v: f64,
    ) -> Result<GenerateDiagnostics, GridError> {
        let diagnostics = self.base.generate(size_u, size_v)?;
        self.cache = None;
        Ok(diagnostics)
    }

    /// Clears the lattice and restores the weight to [`DEFAULT_WEIGHT`].
    pub fn reset(&mut self) {
        self.base.reset();
        self.weight = DEFAULT_WEIGHT;
        self.cache = None;
    }

    /// Places bumps on the underlying lattice; see [`Grid::bumps`].
    pub fn bumps(
        &mut self,
        num_bumps: f64,
        options: &BumpOptions,
    ) -> Result<BumpDiagnostics, BumpError> {
        let diagnostics = self.base.bumps(num_bumps, options)?;
        self.cache = None;
        Ok(diagnostics)
    }

    /// Moves the underlying lattice; see [`Grid::translate`].
    pub fn translate(&mut self, position: Point3) -> Result<(), GridError> {
        self.base.translate(position)?;
        self.cache = None;
        Ok(())
    }

    /// Saves the weighted lattice under the default file name.
    pub fn save(&self) -> Result<ExportDiagnostics, ExportError> {
        self.save_to(export::DEFAULT_FILE_NAME)
    }

    /// Saves the weighted lattice to `file_name`, 4 components per point.
    pub fn save_to(&self, file_name: &str) -> Result<ExportDiagnostics, ExportError> {
        if !self.base.is_generated() {
            return Err(ExportError::NotGenerated);
        }
        let snapshot: Vec<Vec<[f64; 4]>> = self
            .base
            .grid()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|p| WeightedPoint::from_point(*p, self.weight).to_array())
                    .collect()
            })
            .collect();
        export::write_lattice(&snapshot, file_name)
    }
}
