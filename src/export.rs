//! Export of analysed samples.
//!
//! One CSV per quantity, every sample contributing a column pair:
//!
//! ```csv
//! Energy (eV),Sample filmA,Energy (eV),Sample filmB
//! 1.127,0.298,1.127,0.401
//! 1.129,0.297,1.129,
//! ```
//!
//! Undefined points (see [`PointValue::Invalid`]) are written as empty
//! cells, as are rows past the end of a shorter sample. A `summary.json`
//! lists the invalid points per sample.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::absorption::PointValue;
use crate::analysis::{AnalysisReport, SampleResult};
use crate::config::Axis;
use crate::data::model::Thickness;

/// `E [eV] = PLANCK_NM_EV / λ [nm]`.
pub const PLANCK_NM_EV: f64 = 1240.0;

/// Photon energy of a wavelength in nm, or `None` for `λ ≤ 0`.
pub fn photon_energy_ev(wavelength_nm: f64) -> Option<f64> {
    (wavelength_nm > 0.0).then(|| PLANCK_NM_EV / wavelength_nm)
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::Wavelength => "Wavelength (nm)",
            Axis::Energy => "Energy (eV)",
        }
    }

    fn convert(self, x: f64) -> Option<f64> {
        match self {
            Axis::Wavelength => Some(x),
            Axis::Energy => photon_energy_ev(x),
        }
    }
}

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// A derived quantity that gets its own output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Absorptance,
    Absorbance,
    AbsorptionCoefficient,
}

impl Quantity {
    pub fn file_name(self) -> &'static str {
        match self {
            Quantity::Absorptance => "absorptance.csv",
            Quantity::Absorbance => "absorbance.csv",
            Quantity::AbsorptionCoefficient => "alpha.csv",
        }
    }

    /// Quantities available for a report; the coefficient needs a thickness.
    pub fn for_report(report: &AnalysisReport) -> Vec<Quantity> {
        let mut quantities = vec![Quantity::Absorptance, Quantity::Absorbance];
        if report.has_absorption_coefficient() {
            quantities.push(Quantity::AbsorptionCoefficient);
        }
        quantities
    }

    /// Value of this quantity at grid index `i`, `None` when undefined.
    fn value_at(self, sample: &SampleResult, i: usize) -> Option<f64> {
        let series = &sample.series;
        match self {
            Quantity::Absorptance => series.absorptance.get(i).copied(),
            Quantity::Absorbance => series.absorbance.get(i).and_then(|p| p.value()),
            Quantity::AbsorptionCoefficient => series
                .absorption_coefficient
                .as_ref()
                .and_then(|alpha| alpha.get(i))
                .and_then(|p: &PointValue| p.value()),
        }
    }
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write one quantity for all samples to `path`.
pub fn export_quantity_csv(
    report: &AnalysisReport,
    quantity: Quantity,
    axis: Axis,
    path: &Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let header: Vec<String> = report
        .samples
        .iter()
        .flat_map(|s| [axis.label().to_string(), format!("Sample {}", s.record.name())])
        .collect();
    writer.write_record(&header).context("writing CSV header")?;

    let n_rows = report.samples.iter().map(|s| s.record.len()).max().unwrap_or(0);
    for i in 0..n_rows {
        let row: Vec<String> = report
            .samples
            .iter()
            .flat_map(|s| {
                let x = s.record.grid().get(i).and_then(|&x| axis.convert(x));
                [fmt_cell(x), fmt_cell(quantity.value_at(s, i))]
            })
            .collect();
        writer
            .write_record(&row)
            .with_context(|| format!("writing row {i} of {}", path.display()))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SampleSummary<'a> {
    name: &'a str,
    points: usize,
    invalid_points: usize,
    invalid_indices: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    thickness_cm: Option<Thickness>,
    samples: Vec<SampleSummary<'a>>,
}

fn summary(report: &AnalysisReport) -> RunSummary<'_> {
    RunSummary {
        thickness_cm: report.thickness,
        samples: report
            .samples
            .iter()
            .map(|s| SampleSummary {
                name: s.record.name(),
                points: s.series.len(),
                invalid_points: s.series.invalid_count(),
                invalid_indices: s.series.invalid_indices(),
            })
            .collect(),
    }
}

/// Write every quantity file plus `summary.json` into `dir`, creating it
/// if needed. Returns the paths written.
pub fn export_report(report: &AnalysisReport, axis: Axis, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::new();

    if report.is_empty() {
        log::warn!("no samples to export, writing summary only");
    } else {
        for quantity in Quantity::for_report(report) {
            let path = dir.join(quantity.file_name());
            export_quantity_csv(report, quantity, axis, &path)?;
            log::debug!("wrote {}", path.display());
            written.push(path);
        }
    }

    let summary_path = dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary(report)).context("serialising summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    written.push(summary_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_conversion() {
        assert_eq!(photon_energy_ev(1240.0), Some(1.0));
        assert_eq!(photon_energy_ev(620.0), Some(2.0));
        assert_eq!(photon_energy_ev(0.0), None);
        assert_eq!(photon_energy_ev(-5.0), None);
    }

    #[test]
    fn cells_use_three_decimals() {
        assert_eq!(fmt_cell(Some(0.35667494)), "0.357");
        assert_eq!(fmt_cell(Some(1783.3747)), "1783.375");
        assert_eq!(fmt_cell(None), "");
    }

    #[test]
    fn axis_labels() {
        assert_eq!(Axis::Energy.label(), "Energy (eV)");
        assert_eq!(Axis::Wavelength.convert(500.0), Some(500.0));
    }
}
