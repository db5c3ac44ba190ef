use std::io::Write;

use anyhow::{Context, Result};

use super::model::{ExpressionHeader, ExpressionMatrix, ExpressionRow};

// ---------------------------------------------------------------------------
// Generator parameters
// ---------------------------------------------------------------------------

/// Shape and noise of a synthetic matrix pair.
#[derive(Debug, Clone)]
pub struct SynthParams {
    pub probes: usize,
    pub chips: usize,
    /// Mean log2 intensity of the first matrix.
    pub mean: f64,
    /// Spread of log2 intensities across probes.
    pub spread: f64,
    /// Standard deviation of the perturbation applied to the second matrix.
    pub noise: f64,
    /// Fraction of cells copied unchanged into the second matrix.
    pub identical_fraction: f64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            probes: 2000,
            chips: 6,
            mean: 8.0,
            spread: 2.0,
            noise: 0.4,
            identical_fraction: 0.1,
        }
    }
}

/// Seeded noise source: splitmix64 for uniforms, Marsaglia's polar method
/// for normals. The spare normal from each polar draw is kept.
struct NoiseSource {
    state: u64,
    spare: Option<f64>,
}

impl NoiseSource {
    fn new(seed: u64) -> Self {
        NoiseSource {
            state: seed,
            spare: None,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return mean + std_dev * z;
        }
        loop {
            let u = 2.0 * self.uniform() - 1.0;
            let v = 2.0 * self.uniform() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * scale);
                return mean + std_dev * u * scale;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

fn header(chips: usize, prefix: &str) -> ExpressionHeader {
    ExpressionHeader {
        id_heading: "probeset".to_string(),
        chips: (1..=chips).map(|i| format!("{prefix}_chip{i}")).collect(),
    }
}

/// Build two matrices of identical shape. The second is the first with
/// Gaussian noise added to all but `identical_fraction` of its cells.
pub fn generate_pair(params: &SynthParams, seed: u64) -> (ExpressionMatrix, ExpressionMatrix) {
    let mut rng = NoiseSource::new(seed);
    let mut rows_a = Vec::with_capacity(params.probes);
    let mut rows_b = Vec::with_capacity(params.probes);

    for p in 0..params.probes {
        let probe = format!("{}_at", 1000 + p);
        // Line 1 is the header.
        let line = p as u64 + 2;
        let level = rng.normal(params.mean, params.spread);

        let a: Vec<f64> = (0..params.chips)
            .map(|_| rng.normal(level, params.spread * 0.1))
            .collect();
        let b: Vec<f64> = a
            .iter()
            .map(|&v| {
                if rng.uniform() < params.identical_fraction {
                    v
                } else {
                    v + rng.normal(0.0, params.noise)
                }
            })
            .collect();

        rows_a.push(ExpressionRow {
            line,
            probe: probe.clone(),
            values: a,
        });
        rows_b.push(ExpressionRow {
            line,
            probe,
            values: b,
        });
    }

    (
        ExpressionMatrix {
            header: header(params.chips, "a"),
            rows: rows_a,
        },
        ExpressionMatrix {
            header: header(params.chips, "b"),
            rows: rows_b,
        },
    )
}

/// Write `matrix` as tab-separated text with a header row.
pub fn write_matrix<W: Write>(matrix: &ExpressionMatrix, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out);

    let mut header = vec![matrix.header.id_heading.clone()];
    header.extend(matrix.header.chips.iter().cloned());
    writer.write_record(&header).context("writing header row")?;

    for row in &matrix.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.probe.clone());
        record.extend(row.values.iter().map(|v| format!("{v:.6}")));
        writer
            .write_record(&record)
            .with_context(|| format!("writing probe {}", row.probe))?;
    }

    writer.flush().context("flushing expression matrix")?;
    Ok(())
}
