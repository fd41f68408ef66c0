use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AbsorptionError, Result};

// ---------------------------------------------------------------------------
// MeasurementKind – which quantity a row holds
// ---------------------------------------------------------------------------

/// The two measurement kinds recorded for every film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementKind {
    Transmittance,
    Reflectance,
}

impl MeasurementKind {
    /// Parse the trailing letter of an instrument column label (`%T`, `%R`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().chars().last()? {
            'T' => Some(MeasurementKind::Transmittance),
            'R' => Some(MeasurementKind::Reflectance),
            _ => None,
        }
    }

    /// Short symbol used in labels and log output.
    pub fn symbol(self) -> &'static str {
        match self {
            MeasurementKind::Transmittance => "T",
            MeasurementKind::Reflectance => "R",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Transmittance => write!(f, "transmittance"),
            MeasurementKind::Reflectance => write!(f, "reflectance"),
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementRow – one column pair of the input table
// ---------------------------------------------------------------------------

/// A single measurement: a sample name, a kind and its ordered
/// `(independent variable, value)` pairs.
///
/// Values are fractions nominally in `[0, 1]`, but out-of-range readings are
/// kept as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub name: String,
    pub kind: MeasurementKind,
    pub points: Vec<(f64, f64)>,
}

impl MeasurementRow {
    pub fn new(name: impl Into<String>, kind: MeasurementKind, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            kind,
            points,
        }
    }

    /// The independent-variable axis (e.g. wavelength in nm).
    pub fn grid(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| x).collect()
    }

    /// The measured values, in grid order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Thickness – validated film thickness
// ---------------------------------------------------------------------------

/// Film thickness in centimetres. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(into = "f64")]
pub struct Thickness(f64);

impl Thickness {
    pub fn from_cm(cm: f64) -> Result<Self> {
        if cm.is_finite() && cm > 0.0 {
            Ok(Thickness(cm))
        } else {
            Err(AbsorptionError::InvalidThickness(cm))
        }
    }

    pub fn cm(self) -> f64 {
        self.0
    }
}

impl From<Thickness> for f64 {
    fn from(t: Thickness) -> f64 {
        t.0
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cm", self.0)
    }
}

// ---------------------------------------------------------------------------
// SampleRecord – matched T/R pair of one film
// ---------------------------------------------------------------------------

/// A film with its transmittance and reflectance aligned on one grid.
///
/// `grid`, `transmittance` and `reflectance` always have the same length.
/// The fields are private so that only the matcher and [`SampleRecord::new`]
/// can build one, and both check the alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    name: String,
    grid: Vec<f64>,
    transmittance: Vec<f64>,
    reflectance: Vec<f64>,
    thickness: Option<Thickness>,
}

impl SampleRecord {
    /// Build a record from already-separated series. Fails with
    /// [`AbsorptionError::GridMismatch`] unless all three have one length.
    pub fn new(
        name: impl Into<String>,
        grid: Vec<f64>,
        transmittance: Vec<f64>,
        reflectance: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if transmittance.len() != grid.len() || reflectance.len() != grid.len() {
            return Err(AbsorptionError::GridMismatch {
                detail: format!(
                    "grid has {} points, T has {}, R has {}",
                    grid.len(),
                    transmittance.len(),
                    reflectance.len()
                ),
                name,
            });
        }
        Ok(Self {
            name,
            grid,
            transmittance,
            reflectance,
            thickness: None,
        })
    }

    /// Caller has checked that both rows share one grid.
    pub(crate) fn from_pair(
        name: String,
        transmittance: &MeasurementRow,
        reflectance: &MeasurementRow,
    ) -> Self {
        Self {
            name,
            grid: transmittance.grid(),
            transmittance: transmittance.values(),
            reflectance: reflectance.values(),
            thickness: None,
        }
    }

    /// Return the record with the given thickness attached.
    pub fn with_thickness(mut self, thickness: Option<Thickness>) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn transmittance(&self) -> &[f64] {
        &self.transmittance
    }

    pub fn reflectance(&self) -> &[f64] {
        &self.reflectance
    }

    /// Absent unless the run was given a thickness.
    pub fn thickness(&self) -> Option<Thickness> {
        self.thickness
    }

    /// `(x, T, R)` per grid point.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid
            .iter()
            .zip(&self.transmittance)
            .zip(&self.reflectance)
            .map(|((&x, &t), &r)| (x, t, r))
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
