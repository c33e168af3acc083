//! Batch QR code generation.
//!
//! The generator turns a roster into one SVG per unique row. Row failures are
//! logged and skipped; only an unreadable roster or output directory aborts
//! the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::payload::payload_url;
use crate::qr::{QrRenderer, QR_FILE_EXTENSION};
use crate::registrant::Registrant;
use crate::roster::Roster;

/// Outcome of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Data rows read, duplicates included.
    pub total_rows: usize,
    /// Rows left after dropping duplicates.
    pub unique_rows: usize,
    /// Rows dropped as duplicates.
    pub dropped_duplicates: usize,
    /// QR files written.
    pub written: usize,
    /// Rows skipped because of an error.
    pub failed: usize,
    /// QR files found in the output directory afterwards.
    pub files_on_disk: usize,
}

impl GenerationReport {
    /// Check that the output directory holds one QR file per unique row.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.files_on_disk == self.unique_rows
    }
}

/// Generates QR codes for a roster.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    renderer: QrRenderer,
}

impl Generator {
    /// Create a generator from configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let renderer = QrRenderer::new(config.error_correction, config.min_dimension);
        Self { config, renderer }
    }

    /// Load the configured roster and generate its QR codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be read or the output directory
    /// cannot be listed. Per-row failures are logged and counted instead.
    pub fn run(&self) -> Result<GenerationReport> {
        info!(
            "Generating QR codes from {} into {}",
            self.config.file_path.display(),
            self.config.qr_code_dir.display()
        );
        let roster = Roster::from_path(&self.config.file_path)?;
        self.run_roster(&roster)
    }

    /// Generate QR codes for an already loaded roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be listed.
    pub fn run_roster(&self, roster: &Roster) -> Result<GenerationReport> {
        let mut report = GenerationReport {
            total_rows: roster.total_rows(),
            unique_rows: roster.len(),
            dropped_duplicates: roster.dropped_duplicates(),
            ..GenerationReport::default()
        };

        if report.dropped_duplicates > 0 {
            warn!(
                "Roster {} contained {} duplicate rows, these were dropped",
                self.config.file_path.display(),
                report.dropped_duplicates
            );
        }

        for (idx, registrant) in roster.registrants() {
            match registrant.and_then(|r| self.generate_one(&r)) {
                Ok(path) => {
                    debug!("Saved QR code for row {} in {}", idx, path.display());
                    report.written += 1;
                }
                Err(e) => {
                    error!("QR code not generated for row {}: {}", idx, e);
                    report.failed += 1;
                }
            }
        }

        report.files_on_disk = count_qr_files(&self.config.qr_code_dir)?;
        if report.is_consistent() {
            info!(
                "Generated {} QR codes, matching {} unique registrants",
                report.files_on_disk, report.unique_rows
            );
        } else {
            warn!(
                "Found {} QR codes in {} but roster has {} unique registrants",
                report.files_on_disk,
                self.config.qr_code_dir.display(),
                report.unique_rows
            );
        }

        Ok(report)
    }

    /// Render and write the QR code for one registrant.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn generate_one(&self, registrant: &Registrant) -> Result<PathBuf> {
        let url = payload_url(&self.config.lambda_url, registrant);
        debug!("Payload URL: {}", url);

        let slug = registrant.slug();
        if slug.is_empty() {
            return Err(Error::EmptySlug {
                identity: registrant.identity(),
            });
        }

        let svg = self.renderer.render_svg(&url)?;

        let dir = &self.config.qr_code_dir;
        fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(format!("{slug}.{QR_FILE_EXTENSION}"));
        fs::write(&path, svg).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Count the QR files in `dir`. A missing directory holds none.
fn count_qr_files(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == QR_FILE_EXTENSION) {
            count += 1;
        }
    }
    Ok(count)
}
