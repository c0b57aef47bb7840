//! Flat-text export of control-point lattices.
//!
//! The file format is the toolkit's grid convention: one lattice row per
//! line, points separated by `;`, components by `,`, no header. Components
//! are printed with Rust's shortest round-trip float formatting, so a saved
//! file re-parses into the exact lattice that produced it.
//!
//! Writing takes a deep snapshot of the lattice before the file is opened
//! and performs a single scoped write; the handle is released on every exit
//! path. A blank file name is substituted with [`DEFAULT_FILE_NAME`] under a
//! warning, and a write failure under a caller-supplied name degrades to one
//! retry under the default name before the error becomes fatal.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used when the caller supplies none (or a blank one).
pub const DEFAULT_FILE_NAME: &str = "grid.txt";

/// Errors raised while saving a lattice.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("grid has not been generated yet")]
    NotGenerated,
    #[error("failed to write grid file: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostics returned by a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDiagnostics {
    /// The path actually written, after any name substitution.
    pub path: PathBuf,
    /// Size of the written content in bytes.
    pub byte_count: usize,
    /// Soft warnings (blank name substituted, fallback name used).
    pub warnings: Vec<String>,
}

impl ExportDiagnostics {
    /// Returns `true` if any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Writes lattice rows to `file_name`, applying the fallback-name rules.
///
/// `rows` is the caller's snapshot; each point is any slice of components
/// (3 for plain grids, 4 for weighted ones).
pub(crate) fn write_lattice<R: AsRef<[f64]>>(
    rows: &[Vec<R>],
    file_name: &str,
) -> Result<ExportDiagnostics, ExportError> {
    let mut warnings = Vec::new();

    let trimmed = file_name.trim();
    let mut path = if trimmed.is_empty() {
        let message =
            format!("blank grid file name, substituting default `{DEFAULT_FILE_NAME}`");
        log::warn!("{message}");
        warnings.push(message);
        PathBuf::from(DEFAULT_FILE_NAME)
    } else {
        PathBuf::from(trimmed)
    };

    let content = render_rows(rows);

    if let Err(err) = write_snapshot(&path, &content) {
        if path == Path::new(DEFAULT_FILE_NAME) {
            return Err(err.into());
        }
        let message = format!(
            "could not write `{}` ({err}), falling back to `{DEFAULT_FILE_NAME}`",
            path.display()
        );
        log::warn!("{message}");
        warnings.push(message);
        path = PathBuf::from(DEFAULT_FILE_NAME);
        write_snapshot(&path, &content)?;
    }

    log::debug!("saved {} lattice rows to {}", rows.len(), path.display());

    Ok(ExportDiagnostics {
        path,
        byte_count: content.len(),
        warnings,
    })
}

fn render_rows<R: AsRef<[f64]>>(rows: &[Vec<R>]) -> String {
    let mut out = String::new();
    for row in rows {
        let mut first_point = true;
        for point in row {
            if !first_point {
                out.push(';');
            }
            first_point = false;
            let mut first_component = true;
            for component in point.as_ref() {
                if !first_component {
                    out.push(',');
                }
                first_component = false;
                let _ = write!(out, "{component}");
            }
        }
        out.push('\n');
    }
    out
}

fn write_snapshot(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
