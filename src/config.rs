use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerated options
// ---------------------------------------------------------------------------

/// How the instrument wrote the T/R values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    /// Percent (0–100); divided by 100 on load.
    #[default]
    Percent,
    /// Already a fraction (0–1).
    Fraction,
}

impl ValueScale {
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            ValueScale::Percent => value / 100.0,
            ValueScale::Fraction => value,
        }
    }
}

/// Independent-variable axis written to exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Wavelength in nm, as measured.
    Wavelength,
    /// Photon energy in eV, `1240 / λ`.
    #[default]
    Energy,
}

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Settings of one run. Every field has a default so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Input table.
    pub data_path: Option<PathBuf>,
    /// Film thickness in centimetres, shared by all samples.
    pub thickness_cm: Option<f64>,
    /// Output directory; `<data dir>/processed` when unset.
    pub output_dir: Option<PathBuf>,
    pub value_scale: ValueScale,
    pub axis: Axis,
    /// Drop columns whose sample name contains "Baseline".
    pub skip_baseline: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            thickness_cm: None,
            output_dir: None,
            value_scale: ValueScale::Percent,
            axis: Axis::Energy,
            skip_baseline: true,
        }
    }
}

impl RunConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Where results go: the configured directory, or `processed/` next to
    /// the input file.
    pub fn resolved_output_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Some(dir.clone());
        }
        let data = self.data_path.as_ref()?;
        let parent = data.parent().unwrap_or_else(|| Path::new(""));
        Some(parent.join("processed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: RunConfig = serde_json::from_str(r#"{ "thickness_cm": 2e-5, "axis": "wavelength" }"#)
            .unwrap();
        assert_eq!(cfg.thickness_cm, Some(2e-5));
        assert_eq!(cfg.axis, Axis::Wavelength);
        assert_eq!(cfg.value_scale, ValueScale::Percent);
        assert!(cfg.skip_baseline);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<RunConfig>(r#"{ "thickness": 1.0 }"#).is_err());
    }

    #[test]
    fn output_dir_defaults_next_to_input() {
        let cfg = RunConfig {
            data_path: Some(PathBuf::from("/data/run1/tr.csv")),
            ..Default::default()
        };
        assert_eq!(
            cfg.resolved_output_dir(),
            Some(PathBuf::from("/data/run1/processed"))
        );
        assert_eq!(RunConfig::default().resolved_output_dir(), None);
    }

    #[test]
    fn percent_values_are_scaled() {
        assert_eq!(ValueScale::Percent.to_fraction(60.0), 0.6);
        assert_eq!(ValueScale::Fraction.to_fraction(0.6), 0.6);
    }
}
