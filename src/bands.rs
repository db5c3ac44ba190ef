use std::fmt;

use crate::error::{DeltaError, Result};

// ---------------------------------------------------------------------------
// Relation – how a band accepts a value
// ---------------------------------------------------------------------------

/// The rule a band applies to a difference value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation {
    /// Accepts exactly `0`.
    Equal,
    /// Accepts `v <= bound`.
    LessOrEqual(f64),
    /// Accepts anything. Always the last band.
    Remainder,
}

impl Relation {
    /// Name used in the JSON report.
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Equal => "equal",
            Relation::LessOrEqual(_) => "less_or_equal",
            Relation::Remainder => "remainder",
        }
    }
}

/// Render a bound the way Python's `str(float)` does: plain decimals with a
/// trailing `.0` for whole numbers, exponent form (`1e-07`, `1.5e+20`)
/// outside `1e-4 <= |v| < 1e16`.
pub fn format_bound(v: f64) -> String {
    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if v == 0.0 || !v.is_finite() || (-4..16).contains(&exp) {
        let plain = v.to_string();
        if v.is_finite() && !plain.contains('.') {
            return format!("{plain}.0");
        }
        return plain;
    }

    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

// ---------------------------------------------------------------------------
// Band – one classification bin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    relation: Relation,
    count: u64,
}

impl Band {
    fn new(relation: Relation) -> Self {
        Band { relation, count: 0 }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Threshold of the band. `None` for the zero and remainder bands.
    pub fn upper_bound(&self) -> Option<f64> {
        match self.relation {
            Relation::LessOrEqual(bound) => Some(bound),
            Relation::Equal | Relation::Remainder => None,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_remainder(&self) -> bool {
        self.relation == Relation::Remainder
    }

    /// Whether `v` satisfies this band's rule. NaN only satisfies the
    /// remainder band.
    pub fn accepts(&self, v: f64) -> bool {
        match self.relation {
            Relation::Equal => v == 0.0,
            Relation::LessOrEqual(bound) => v <= bound,
            Relation::Remainder => true,
        }
    }
}

/// Band descriptor as printed in reports: `= 0`, `<= 0.5`, `Remainder`.
impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            Relation::Equal => f.pad("= 0"),
            Relation::LessOrEqual(bound) => f.pad(&format!("<= {}", format_bound(bound))),
            Relation::Remainder => f.pad("Remainder"),
        }
    }
}

// ---------------------------------------------------------------------------
// BandList – ordered bins with first-match-wins classification
// ---------------------------------------------------------------------------

/// `[zero, <= t1, <= t2, ..., <= tk, remainder]`.
///
/// Classification scans the bands in this order and increments the first
/// one that accepts the value. The order is part of the semantics and must
/// not be rearranged.
#[derive(Debug, Clone, PartialEq)]
pub struct BandList {
    bands: Vec<Band>,
}

impl BandList {
    /// Build the band list from thresholds, which must be non-empty,
    /// positive, finite and strictly ascending.
    pub fn new(thresholds: &[f64]) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(DeltaError::EmptyThresholds);
        }

        let mut previous: Option<f64> = None;
        for (i, &value) in thresholds.iter().enumerate() {
            let position = i + 1;
            if !value.is_finite() || value <= 0.0 {
                return Err(DeltaError::ThresholdNotPositive { position, value });
            }
            if let Some(previous) = previous {
                if value <= previous {
                    return Err(DeltaError::ThresholdNotAscending {
                        position,
                        value,
                        previous,
                    });
                }
            }
            previous = Some(value);
        }

        let mut bands = Vec::with_capacity(thresholds.len() + 2);
        bands.push(Band::new(Relation::Equal));
        bands.extend(thresholds.iter().map(|&t| Band::new(Relation::LessOrEqual(t))));
        bands.push(Band::new(Relation::Remainder));

        Ok(BandList { bands })
    }

    /// Parse a comma-separated threshold list (`"0.5,1,2"`) and build the
    /// band list from it.
    pub fn parse(list: &str) -> Result<Self> {
        Self::new(&parse_thresholds(list)?)
    }

    /// Count `v` in the first band that accepts it and return that band's
    /// index. `v` is an absolute difference and must not be negative.
    pub fn classify(&mut self, v: f64) -> usize {
        debug_assert!(v >= 0.0 || v.is_nan(), "negative difference {v}");

        // The remainder band is last and accepts everything, so the scan
        // always finds a band.
        let idx = self
            .bands
            .iter()
            .position(|b| b.accepts(v))
            .unwrap_or(self.bands.len() - 1);
        self.bands[idx].count += 1;
        idx
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Band> {
        self.bands.iter()
    }

    /// Number of bands, including the zero and remainder bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false: a band list holds at least the zero, one threshold and
    /// the remainder band.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Sum of all band counts.
    pub fn total(&self) -> u64 {
        self.bands.iter().map(|b| b.count).sum()
    }
}

impl<'a> IntoIterator for &'a BandList {
    type Item = &'a Band;
    type IntoIter = std::slice::Iter<'a, Band>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.iter()
    }
}

/// Split `"d1,d2,..."` into numbers. Validation of the values themselves is
/// left to [`BandList::new`].
pub fn parse_thresholds(list: &str) -> Result<Vec<f64>> {
    if list.trim().is_empty() {
        return Err(DeltaError::EmptyThresholds);
    }
    list.split(',')
        .enumerate()
        .map(|(i, tok)| {
            tok.trim()
                .parse::<f64>()
                .map_err(|_| DeltaError::ThresholdSyntax {
                    position: i + 1,
                    text: tok.to_string(),
                })
        })
        .collect()
}
