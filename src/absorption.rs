use crate::data::model::SampleRecord;

// ---------------------------------------------------------------------------
// PointValue – per-point validity
// ---------------------------------------------------------------------------

/// Why a logarithmic quantity could not be computed at a grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainViolation {
    /// `T + R ≤ 0`, so `ln(T + R)` is undefined.
    NonPositiveSum { sum: f64 },
    /// `T + R` is NaN.
    NotFinite,
}

/// A derived value at one grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointValue {
    Valid(f64),
    Invalid(DomainViolation),
}

impl PointValue {
    pub fn value(self) -> Option<f64> {
        match self {
            PointValue::Valid(v) => Some(v),
            PointValue::Invalid(_) => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, PointValue::Valid(_))
    }

    /// Apply `f` to a valid value; invalid points stay invalid.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> PointValue {
        match self {
            PointValue::Valid(v) => PointValue::Valid(f(v)),
            invalid => invalid,
        }
    }
}

// ---------------------------------------------------------------------------
// Point formulas
// ---------------------------------------------------------------------------

/// Absorptance `1 − T − R`. Not clamped: values outside `[0, 1]` point at
/// light lost outside the collection geometry and are reported as such.
pub fn absorptance(t: f64, r: f64) -> f64 {
    1.0 - t - r
}

/// Absorbance `−ln(T + R)`, defined only for `T + R > 0`.
pub fn absorbance(t: f64, r: f64) -> PointValue {
    let sum = t + r;
    if sum.is_nan() {
        PointValue::Invalid(DomainViolation::NotFinite)
    } else if sum <= 0.0 {
        PointValue::Invalid(DomainViolation::NonPositiveSum { sum })
    } else {
        PointValue::Valid(-sum.ln())
    }
}

// ---------------------------------------------------------------------------
// ResultSeries – derived quantities for one sample
// ---------------------------------------------------------------------------

/// Parallel series of derived quantities, one entry per grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSeries {
    pub absorptance: Vec<f64>,
    pub absorbance: Vec<PointValue>,
    /// Present only when the sample carries a thickness (cm⁻¹).
    pub absorption_coefficient: Option<Vec<PointValue>>,
}

impl ResultSeries {
    pub fn len(&self) -> usize {
        self.absorptance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.absorptance.is_empty()
    }

    /// Whether the logarithmic quantities are defined at point `i`.
    pub fn is_valid(&self, i: usize) -> bool {
        self.absorbance.get(i).is_some_and(|p| p.is_valid())
    }

    pub fn invalid_indices(&self) -> Vec<usize> {
        self.absorbance
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_valid())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn invalid_count(&self) -> usize {
        self.absorbance.iter().filter(|p| !p.is_valid()).count()
    }
}

/// Compute every derived quantity of one sample.
///
/// Domain violations are recorded point by point and never abort the
/// sample; absorptance is always computed.
pub fn compute_series(record: &SampleRecord) -> ResultSeries {
    let absorptance: Vec<f64> = record.points().map(|(_, t, r)| absorptance(t, r)).collect();
    let absorbance: Vec<PointValue> = record
        .points()
        .map(|(x, t, r)| {
            let point = absorbance(t, r);
            if let PointValue::Invalid(reason) = point {
                log::debug!(
                    "sample '{}': absorbance undefined at {x} ({reason:?})",
                    record.name()
                );
            }
            point
        })
        .collect();

    let absorption_coefficient = record.thickness().map(|d| {
        let d = d.cm();
        absorbance.iter().map(|ab| ab.map(|v| v / d)).collect()
    });

    let series = ResultSeries {
        absorptance,
        absorbance,
        absorption_coefficient,
    };

    let invalid = series.invalid_count();
    if invalid > 0 {
        log::warn!(
            "sample '{}': {invalid} of {} points have T + R ≤ 0, absorbance left undefined there",
            record.name(),
            series.len()
        );
    }

    series
}
