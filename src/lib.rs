//! Deterministic generator of rectangular control-point grids used as seed
//! geometry for surface fitting and visualization.
//!
//! The [`grid`] module holds the lattice builder, its weighted variant, the
//! bump perturbation engine and the flat-text exporter.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
