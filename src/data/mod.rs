/// Data layer: expression file types, reading, and synthetic samples.
///
/// Architecture:
/// ```text
///  exprfile (tab separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header row, then one ExpressionRow per line
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   compare     │  lockstep row pairs → |a - b| → BandList
///   └──────────────┘
///
///   synth ──► ExpressionMatrix ──► write_matrix (sample fixtures)
/// ```

pub mod loader;
pub mod model;
pub mod synth;
