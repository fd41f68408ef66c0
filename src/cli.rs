use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::analysis::{analyse, AnalysisReport};
use crate::config::{Axis, RunConfig, ValueScale};
use crate::data::loader::{load_csv, LoadOptions};
use crate::export::export_report;

/// Absorptance, absorbance and absorption coefficient of thin films from
/// transmittance/reflectance spectra.
#[derive(Debug, Parser)]
#[command(name = "film-absorption", version)]
pub struct Cli {
    /// CSV file containing all T and R measurements
    #[arg(short = 'd', long, value_name = "FILE")]
    pub data_path: Option<PathBuf>,

    /// Film thickness in cm, shared by all samples. Without it no
    /// absorption coefficient is calculated.
    #[arg(short, long, value_name = "CM", allow_negative_numbers = true)]
    pub thickness: Option<f64>,

    /// Output directory [default: <data dir>/processed]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Axis written to the exported files
    #[arg(long, value_enum)]
    pub axis: Option<Axis>,

    /// Scale of the measured values in the input
    #[arg(long, value_enum)]
    pub value_scale: Option<ValueScale>,

    /// Keep columns whose sample name contains "Baseline"
    #[arg(long)]
    pub keep_baseline: bool,

    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge the optional config file with the command-line flags.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        if self.data_path.is_some() {
            cfg.data_path = self.data_path;
        }
        if self.thickness.is_some() {
            cfg.thickness_cm = self.thickness;
        }
        if self.output_dir.is_some() {
            cfg.output_dir = self.output_dir;
        }
        if let Some(axis) = self.axis {
            cfg.axis = axis;
        }
        if let Some(scale) = self.value_scale {
            cfg.value_scale = scale;
        }
        if self.keep_baseline {
            cfg.skip_baseline = false;
        }
        Ok(cfg)
    }
}

/// Load, analyse and export according to `cfg`.
pub fn run(cfg: &RunConfig) -> Result<AnalysisReport> {
    let data_path = cfg
        .data_path
        .as_deref()
        .context("no input file given (use --data-path or set data_path in the config)")?;
    let output_dir = cfg
        .resolved_output_dir()
        .context("cannot determine output directory")?;

    let rows = load_csv(data_path, &LoadOptions::from(cfg))?;
    let report = analyse(&rows, cfg.thickness_cm).context("analysis aborted, nothing written")?;

    let written = export_report(&report, cfg.axis, &output_dir)?;
    log::info!(
        "analysed samples: {}",
        report.sample_names().join(", ")
    );
    log::info!("wrote {} files to {}", written.len(), output_dir.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbsorptionError;
    use tempfile::TempDir;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "film-absorption",
            "-d",
            "in.csv",
            "--thickness",
            "2e-5",
            "--axis",
            "wavelength",
            "--keep-baseline",
        ])
        .unwrap();
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.data_path, Some(PathBuf::from("in.csv")));
        assert_eq!(cfg.thickness_cm, Some(2e-5));
        assert_eq!(cfg.axis, Axis::Wavelength);
        assert_eq!(cfg.value_scale, ValueScale::Percent);
        assert!(!cfg.skip_baseline);
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = run(&RunConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no input file"));
    }

    #[test]
    fn negative_thickness_reaches_the_thickness_check() {
        let temp = TempDir::new().expect("tempdir should be created");
        let data_path = temp.path().join("in.csv");
        std::fs::write(&data_path, "filmA,,filmA,\nnm,%T,nm,%R\n500,60,500,10\n")
            .expect("input should be written");

        let cli = Cli::try_parse_from([
            "film-absorption",
            "-d",
            data_path.to_str().unwrap(),
            "-t",
            "-1",
        ])
        .unwrap();
        assert_eq!(cli.thickness, Some(-1.0));

        let err = run(&cli.into_config().unwrap()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AbsorptionError>(),
            Some(&AbsorptionError::InvalidThickness(-1.0))
        );
        assert!(!temp.path().join("processed").exists());
    }
}
