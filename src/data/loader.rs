use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{MeasurementKind, MeasurementRow};
use crate::config::{RunConfig, ValueScale};

/// Options controlling how the fixed layout is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub value_scale: ValueScale,
    pub skip_baseline: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            value_scale: ValueScale::Percent,
            skip_baseline: true,
        }
    }
}

impl From<&RunConfig> for LoadOptions {
    fn from(cfg: &RunConfig) -> Self {
        Self {
            value_scale: cfg.value_scale,
            skip_baseline: cfg.skip_baseline,
        }
    }
}

/// Column pairs whose name contains this marker are instrument reference
/// scans, not films.
const BASELINE_MARKER: &str = "Baseline";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load all T/R measurements from a spectrophotometer CSV export.
pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<Vec<MeasurementRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let rows = parse_csv(file, options)
        .with_context(|| format!("reading CSV {}", path.display()))?;
    log::info!(
        "loaded {} measurements from {}",
        rows.len(),
        path.display()
    );
    Ok(rows)
}

/// CSV layout, one column pair per measurement:
///
/// ```text
/// filmA,,filmA,,Baseline 100%T,
/// Wavelength (nm),%T,Wavelength (nm),%R,Wavelength (nm),%T
/// 1100.0,61.2,1100.0,9.8,1100.0,100.0
/// 1098.0,61.0,1098.0,9.9,1098.0,100.0
/// ```
///
/// * row 0: sample name in the first cell of each pair
/// * row 1: the second label of each pair ends in `T` or `R`
/// * rows 2…: `(x, value)` numbers; a pair with both cells blank is skipped
///   so measurements may have different lengths
pub fn parse_csv<R: Read>(input: R, options: &LoadOptions) -> Result<Vec<MeasurementRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.records();

    let names = records
        .next()
        .context("CSV is empty")?
        .context("reading sample-name row")?;
    let labels = records
        .next()
        .context("CSV missing the T/R label row")?
        .context("reading label row")?;

    // (pair index, name, kind) for every measurement to keep.
    let mut columns: Vec<(usize, String, MeasurementKind)> = Vec::new();
    for (pair, name) in names.iter().step_by(2).enumerate() {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let label = labels.get(2 * pair + 1).unwrap_or("");
        let Some(kind) = MeasurementKind::from_label(label) else {
            bail!(
                "column {}: label '{label}' for '{name}' does not end in T or R",
                2 * pair + 1
            );
        };
        if options.skip_baseline && name.contains(BASELINE_MARKER) {
            log::debug!("skipping baseline column '{name}'");
            continue;
        }
        columns.push((pair, name.to_string(), kind));
    }

    let mut points: Vec<Vec<(f64, f64)>> = vec![Vec::new(); columns.len()];

    for (offset, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV data record {}", offset + 1))?;
        // Blank lines are skipped by the reader, so take the line from the record.
        let line = record.position().map_or(offset as u64 + 3, |p| p.line());

        for (slot, (pair, name, _)) in columns.iter().enumerate() {
            let x_col = 2 * pair;
            let x = record.get(x_col).unwrap_or("").trim();
            let y = record.get(x_col + 1).unwrap_or("").trim();

            match (x.is_empty(), y.is_empty()) {
                (true, true) => continue,
                (false, false) => {}
                _ => bail!("line {line}, '{name}': incomplete (x, value) pair"),
            }

            let x = parse_number(x, line, x_col)?;
            if !x.is_finite() {
                bail!("line {line}, column {x_col}: grid value '{x}' is not a finite number");
            }
            let y = parse_number(y, line, x_col + 1)?;
            points[slot].push((x, options.value_scale.to_fraction(y)));
        }
    }

    let rows: Vec<MeasurementRow> = columns
        .into_iter()
        .zip(points)
        .map(|((_, name, kind), pts)| {
            if pts.is_empty() {
                log::warn!("measurement '{name}' ({}) has no data points", kind.symbol());
            }
            MeasurementRow::new(name, kind, pts)
        })
        .collect();

    Ok(rows)
}

fn parse_number(tok: &str, line: u64, col: usize) -> Result<f64> {
    tok.parse::<f64>()
        .with_context(|| format!("line {line}, column {col}: '{tok}' is not a number"))
}
