use thiserror::Error;

use crate::data::model::MeasurementKind;

/// Fatal errors of a run. Any of these stops the analysis before a single
/// result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbsorptionError {
    /// Two rows share the same sample name and kind.
    #[error("sample '{name}' has more than one {kind} measurement")]
    DuplicateName { name: String, kind: MeasurementKind },

    /// A sample has only one of the two measurement kinds.
    #[error("sample '{name}' has no {missing} measurement")]
    IncompleteSample {
        name: String,
        missing: MeasurementKind,
    },

    /// The T and R rows of a sample were not sampled on the same grid.
    #[error("sample '{name}': transmittance and reflectance grids differ ({detail})")]
    GridMismatch { name: String, detail: String },

    /// Film thickness must be a positive, finite number of centimetres.
    #[error("invalid film thickness {0} cm: must be a positive number")]
    InvalidThickness(f64),
}

pub type Result<T> = std::result::Result<T, AbsorptionError>;
