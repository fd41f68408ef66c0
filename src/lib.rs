//! Optical absorption of thin films from transmittance (T) and
//! reflectance (R) spectra.
//!
//! ```text
//!  CSV ──loader──► MeasurementRow ──matcher──► SampleRecord ──absorption──► ResultSeries
//! ```
//!
//! [`analysis::analyse`] is the entry-point for already-loaded rows; the
//! `film-absorption` binary adds loading and export around it.

pub mod absorption;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;

pub use absorption::{DomainViolation, PointValue, ResultSeries};
pub use analysis::{analyse, AnalysisReport, SampleResult};
pub use data::model::{MeasurementKind, MeasurementRow, SampleRecord, Thickness};
pub use error::AbsorptionError;
