//! Randomized bump perturbation of a generated lattice.
//!
//! A bump is a localized elevation change: one interior lattice point gets
//! its z set to exactly the requested height (with a random sign unless the
//! all-positive flag is set) and the square neighborhood around it receives a
//! linearly decaying fraction of that height. Bump centers are sited
//! uniformly at random inside the region where the footprint cannot cross
//! the lattice boundary, and footprints of one call never overlap; siting
//! retries under a bounded attempt budget and fails the whole call when the
//! grid cannot hold the requested count. Elevation is only applied after
//! every center has been accepted, so a failed call leaves the lattice
//! untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::lattice::Grid;

/// Tunables for [`Grid::bumps`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpOptions {
    /// When set, every bump raises the surface; otherwise each bump's sign
    /// is chosen uniformly at random.
    pub all_positive: bool,
    /// Elevation assigned to each bump's center point. Must be non-negative.
    pub bump_height: f64,
    /// Half-width of the square neighborhood a bump affects, in grid-index
    /// units.
    pub base_extent: i64,
    /// Extra clearance added to (or, when negative, removed from) the
    /// footprint used for overlap checking between bumps.
    pub base_adjust: i64,
    /// Seed for reproducible placement; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for BumpOptions {
    fn default() -> Self {
        Self {
            all_positive: false,
            bump_height: 5.0,
            base_extent: 2,
            base_adjust: 0,
            seed: None,
        }
    }
}

/// Errors raised by [`Grid::bumps`].
#[derive(Debug, thiserror::Error)]
pub enum BumpError {
    #[error("grid has not been generated yet")]
    NotGenerated,
    #[error("bump height must be non-negative and finite, got {value}")]
    HeightInvalid { value: f64 },
    #[error("base extent must be at least 1, got {value}")]
    ExtentTooSmall { value: i64 },
    #[error("base extent {value} does not fit a {size_u}x{size_v} grid")]
    ExtentTooLarge {
        value: i64,
        size_u: usize,
        size_v: usize,
    },
    #[error(
        "base adjust {value} leaves no room between bumps on a {size_u}x{size_v} grid"
    )]
    ClearanceInvalid {
        value: i64,
        size_u: usize,
        size_v: usize,
    },
    #[error("could only place {placed} of {requested} bumps without overlap")]
    Placement { placed: usize, requested: usize },
}

/// Diagnostics returned by a successful [`Grid::bumps`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BumpDiagnostics {
    /// Bump count after truncation of the raw input.
    pub requested: usize,
    /// Bumps actually placed (equals `requested` on success).
    pub placed: usize,
    /// Total siting attempts spent, accepted candidates included.
    pub attempts: usize,
    /// Soft warnings (fractional or non-positive counts).
    pub warnings: Vec<String>,
}

impl BumpDiagnostics {
    /// Returns `true` if any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Grid {
    /// Places `num_bumps` non-overlapping bumps on the generated lattice.
    ///
    /// Fractional counts are truncated with a warning, and counts at or
    /// below zero degrade to a warned no-op. Validation failures and
    /// placement infeasibility leave the lattice exactly as it was; bumps
    /// from earlier successful calls persist.
    pub fn bumps(
        &mut self,
        num_bumps: f64,
        options: &BumpOptions,
    ) -> Result<BumpDiagnostics, BumpError> {
        if !self.is_generated() {
            return Err(BumpError::NotGenerated);
        }

        let mut warnings = Vec::new();
        let Some(requested) = coerce_bump_count(num_bumps, &mut warnings) else {
            return Ok(BumpDiagnostics {
                warnings,
                ..BumpDiagnostics::default()
            });
        };

        if !options.bump_height.is_finite() || options.bump_height < 0.0 {
            return Err(BumpError::HeightInvalid {
                value: options.bump_height,
            });
        }

        let size_u = self.size_u();
        let size_v = self.size_v();
        let span = size_u.min(size_v);

        if options.base_extent < 1 {
            return Err(BumpError::ExtentTooSmall {
                value: options.base_extent,
            });
        }
        let extent = options.base_extent as usize;
        if 2 * extent > span {
            return Err(BumpError::ExtentTooLarge {
                value: options.base_extent,
                size_u,
                size_v,
            });
        }

        // A positive adjust widens the spacing between bumps; reject it when
        // the widened spacing cannot fit the candidate region at all. The
        // extent alone is allowed to saturate the grid (a single bump still
        // fits); overcrowding then surfaces as a placement failure.
        let clearance = options.base_extent + options.base_adjust;
        if clearance < 0
            || (options.base_adjust > 0 && 2 * clearance > (span - 2 * extent) as i64)
        {
            return Err(BumpError::ClearanceInvalid {
                value: options.base_adjust,
                size_u,
                size_v,
            });
        }

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (centers, attempts) =
            place_centers(size_u, size_v, extent, clearance, requested, &mut rng)?;
        apply_bumps(
            self.points_mut(),
            &centers,
            extent,
            options.bump_height,
            options.all_positive,
            &mut rng,
        );

        log::debug!(
            "placed {requested} bumps on a {size_u}x{size_v} grid in {attempts} attempts"
        );

        Ok(BumpDiagnostics {
            requested,
            placed: centers.len(),
            attempts,
            warnings,
        })
    }
}

fn coerce_bump_count(value: f64, warnings: &mut Vec<String>) -> Option<usize> {
    if !value.is_finite() {
        let message = format!("bump count {value} is not usable, leaving the lattice unchanged");
        log::warn!("{message}");
        warnings.push(message);
        return None;
    }
    let truncated = value.trunc();
    if truncated != value {
        let message = format!("bump count truncated from {value} to {truncated}");
        log::warn!("{message}");
        warnings.push(message);
    }
    if truncated < 1.0 {
        let message = "no bumps requested, leaving the lattice unchanged".to_string();
        log::warn!("{message}");
        warnings.push(message);
        return None;
    }
    Some(truncated as usize)
}

/// Picks `count` centers inside the boundary-safe region, rejecting any
/// candidate whose clearance footprint overlaps an accepted one.
fn place_centers(
    size_u: usize,
    size_v: usize,
    extent: usize,
    clearance: i64,
    count: usize,
    rng: &mut StdRng,
) -> Result<(Vec<(usize, usize)>, usize), BumpError> {
    let lo_u = extent;
    let hi_u = size_u - extent;
    let lo_v = extent;
    let hi_v = size_v - extent;

    let candidate_count = (hi_u - lo_u + 1) * (hi_v - lo_v + 1);
    let budget_per_bump = candidate_count.saturating_mul(10).max(10);

    let mut centers: Vec<(usize, usize)> = Vec::with_capacity(count);
    let mut total_attempts = 0usize;

    for _ in 0..count {
        let mut accepted = false;
        for _ in 0..budget_per_bump {
            total_attempts += 1;
            let candidate = (
                rng.random_range(lo_u..=hi_u),
                rng.random_range(lo_v..=hi_v),
            );
            if centers
                .iter()
                .all(|&placed| !footprints_overlap(candidate, placed, clearance))
            {
                centers.push(candidate);
                accepted = true;
                break;
            }
        }
        if !accepted {
            return Err(BumpError::Placement {
                placed: centers.len(),
                requested: count,
            });
        }
    }

    Ok((centers, total_attempts))
}

fn footprints_overlap(a: (usize, usize), b: (usize, usize), clearance: i64) -> bool {
    let du = (a.0 as i64 - b.0 as i64).abs();
    let dv = (a.1 as i64 - b.1 as i64).abs();
    du <= 2 * clearance && dv <= 2 * clearance
}

/// Writes the elevation profile of every accepted bump into the lattice.
///
/// Points at Chebyshev distance `d` from a center are assigned
/// `delta * (1 - d / (extent + 1))`: exactly `delta` at the center, decaying
/// linearly to the footprint edge without ever changing sign.
fn apply_bumps(
    points: &mut [Vec<super::core::Point3>],
    centers: &[(usize, usize)],
    extent: usize,
    height: f64,
    all_positive: bool,
    rng: &mut StdRng,
) {
    for &(cu, cv) in centers {
        let delta = if all_positive || rng.random_bool(0.5) {
            height
        } else {
            -height
        };
        for iu in (cu - extent)..=(cu + extent) {
            for iv in (cv - extent)..=(cv + extent) {
                let du = (iu as i64 - cu as i64).unsigned_abs() as usize;
                let dv = (iv as i64 - cv as i64).unsigned_abs() as usize;
                let distance = du.max(dv);
                let falloff = 1.0 - distance as f64 / (extent + 1) as f64;
                points[iu][iv].z = delta * falloff;
            }
        }
    }
}
