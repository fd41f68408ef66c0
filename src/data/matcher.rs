use std::collections::BTreeMap;

use super::model::{MeasurementKind, MeasurementRow, SampleRecord};
use crate::error::{AbsorptionError, Result};

// ---------------------------------------------------------------------------
// Pairing state per sample name
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Pair<'a> {
    transmittance: Option<&'a MeasurementRow>,
    reflectance: Option<&'a MeasurementRow>,
}

impl<'a> Pair<'a> {
    fn slot(&mut self, kind: MeasurementKind) -> &mut Option<&'a MeasurementRow> {
        match kind {
            MeasurementKind::Transmittance => &mut self.transmittance,
            MeasurementKind::Reflectance => &mut self.reflectance,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Pair every transmittance row with the reflectance row of the same sample.
///
/// Records come out in the order in which sample names first appear in
/// `rows`. Fails when:
/// * a (name, kind) pair occurs twice → [`AbsorptionError::DuplicateName`]
/// * a name lacks one of the two kinds → [`AbsorptionError::IncompleteSample`]
/// * the two grids of a name differ → [`AbsorptionError::GridMismatch`]
pub fn match_samples(rows: &[MeasurementRow]) -> Result<Vec<SampleRecord>> {
    let mut order: Vec<&str> = Vec::new();
    let mut pairs: BTreeMap<&str, Pair<'_>> = BTreeMap::new();

    for row in rows {
        let pair = pairs.entry(row.name.as_str()).or_insert_with(|| {
            order.push(row.name.as_str());
            Pair::default()
        });
        let slot = pair.slot(row.kind);
        if slot.is_some() {
            return Err(AbsorptionError::DuplicateName {
                name: row.name.clone(),
                kind: row.kind,
            });
        }
        *slot = Some(row);
    }

    let mut records = Vec::with_capacity(order.len());
    for name in order {
        let pair = &pairs[name];
        let (t, r) = match (pair.transmittance, pair.reflectance) {
            (Some(t), Some(r)) => (t, r),
            (None, _) => {
                return Err(AbsorptionError::IncompleteSample {
                    name: name.to_string(),
                    missing: MeasurementKind::Transmittance,
                })
            }
            (_, None) => {
                return Err(AbsorptionError::IncompleteSample {
                    name: name.to_string(),
                    missing: MeasurementKind::Reflectance,
                })
            }
        };

        if let Some(detail) = grid_difference(t, r) {
            return Err(AbsorptionError::GridMismatch {
                name: name.to_string(),
                detail,
            });
        }

        log::debug!("matched sample '{name}' on {} grid points", t.len());
        records.push(SampleRecord::from_pair(name.to_string(), t, r));
    }

    Ok(records)
}

/// Describe how two grids differ, or `None` when they are identical.
///
/// Grids come from one instrument sweep, so exact equality is required;
/// partially overlapping ranges count as a mismatch.
fn grid_difference(t: &MeasurementRow, r: &MeasurementRow) -> Option<String> {
    if t.len() != r.len() {
        return Some(format!(
            "T has {} points but R has {}",
            t.len(),
            r.len()
        ));
    }
    t.points
        .iter()
        .zip(&r.points)
        .enumerate()
        .find(|(_, (pt, pr))| pt.0 != pr.0)
        .map(|(i, (pt, pr))| format!("point {i}: T at {}, R at {}", pt.0, pr.0))
}
