use crate::absorption::{compute_series, ResultSeries};
use crate::data::matcher::match_samples;
use crate::data::model::{MeasurementRow, SampleRecord, Thickness};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Analysis report
// ---------------------------------------------------------------------------

/// One analysed film: its matched input and the derived series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub record: SampleRecord,
    pub series: ResultSeries,
}

/// Complete, consistent result of one run. Only built when every sample
/// matched and the configuration was valid.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Results in first-seen order of sample names.
    pub samples: Vec<SampleResult>,
    pub thickness: Option<Thickness>,
}

impl AnalysisReport {
    pub fn sample_names(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.record.name()).collect()
    }

    pub fn total_invalid_points(&self) -> usize {
        self.samples.iter().map(|s| s.series.invalid_count()).sum()
    }

    pub fn has_absorption_coefficient(&self) -> bool {
        self.thickness.is_some()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Run the full pipeline over already-loaded rows.
///
/// The thickness is checked before any row is looked at, then all rows are
/// matched, and only then is anything computed: an `Err` means no sample
/// was processed.
pub fn analyse(rows: &[MeasurementRow], thickness_cm: Option<f64>) -> Result<AnalysisReport> {
    let thickness = thickness_cm.map(Thickness::from_cm).transpose()?;

    let records = match_samples(rows)?;
    log::info!(
        "matched {} samples from {} measurements",
        records.len(),
        rows.len()
    );

    let samples = records
        .into_iter()
        .map(|record| {
            let record = record.with_thickness(thickness);
            let series = compute_series(&record);
            SampleResult { record, series }
        })
        .collect();

    Ok(AnalysisReport { samples, thickness })
}
