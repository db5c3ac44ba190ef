use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::bands::Band;
use crate::compare::Tally;

/// Share of `total` that `count` represents, in percent. Zero when `total`
/// is zero.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Plain-text report:
///
/// ```text
/// Total number of expression values: 4
///
/// delta             = 0               1 (25.00%)
/// delta          <= 0.5               1 (25.00%)
/// ```
pub struct TextReport<'a>(pub &'a Tally);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tally = self.0;
        writeln!(f, "Total number of expression values: {}", tally.total_values)?;
        writeln!(f)?;
        for band in &tally.bands {
            writeln!(
                f,
                "delta {:>15} {:>15} ({:04.2}%)",
                band,
                band.count(),
                percent(band.count(), tally.total_values)
            )?;
        }
        Ok(())
    }
}

pub fn render_text(tally: &Tally) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(out, "{}", TextReport(tally));
    out
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct JsonBand {
    pub relation: &'static str,
    pub upper_bound: Option<f64>,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub total_values: u64,
    pub rows: usize,
    pub data_columns: usize,
    pub bands: Vec<JsonBand>,
}

impl JsonReport {
    pub fn from_tally(tally: &Tally) -> Self {
        let bands = tally
            .bands
            .iter()
            .map(|b: &Band| JsonBand {
                relation: b.relation().name(),
                upper_bound: b.upper_bound(),
                count: b.count(),
                percent: percent(b.count(), tally.total_values),
            })
            .collect();

        JsonReport {
            total_values: tally.total_values,
            rows: tally.rows,
            data_columns: tally.data_columns,
            bands,
        }
    }
}

pub fn render_json(tally: &Tally) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from_tally(tally))
}
