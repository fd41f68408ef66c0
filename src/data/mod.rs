/// Data layer: core types, loading, and matching.
///
/// Architecture:
/// ```text
///   T/R table (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<MeasurementRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ matcher   │  pair T and R per sample name → Vec<SampleRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SampleRecord  │  name, shared grid, T, R, thickness
///   └──────────────┘
/// ```

pub mod loader;
pub mod matcher;
pub mod model;
