use std::io::Read;
use std::path::Path;

use crate::bands::BandList;
use crate::data::loader::ExpressionReader;
use crate::error::{DeltaError, Result};

// ---------------------------------------------------------------------------
// Tally – final state of a comparison
// ---------------------------------------------------------------------------

/// Band counts plus the shape of the compared matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub bands: BandList,
    /// Number of classified values: `rows * data_columns`.
    pub total_values: u64,
    /// Data rows compared (header excluded).
    pub rows: usize,
    pub data_columns: usize,
}

// ---------------------------------------------------------------------------
// BandedDiffCounter – accumulates |a - b| per cell into bands
// ---------------------------------------------------------------------------

/// Owns the band list for the duration of one comparison.
#[derive(Debug, Clone)]
pub struct BandedDiffCounter {
    bands: BandList,
    data_columns: usize,
    total_values: u64,
    rows: usize,
}

impl BandedDiffCounter {
    /// Start counting rows of `data_columns` values each. Existing counts in
    /// `bands` are kept.
    pub fn new(bands: BandList, data_columns: usize) -> Self {
        BandedDiffCounter {
            bands,
            data_columns,
            total_values: 0,
            rows: 0,
        }
    }

    /// Classify the absolute difference of each cell pair. Both slices must
    /// hold `data_columns` values; otherwise nothing is counted.
    pub fn add_row_pair(&mut self, a: &[f64], b: &[f64]) -> Result<()> {
        if a.len() != self.data_columns || b.len() != self.data_columns {
            return Err(DeltaError::RowWidth {
                expected: self.data_columns,
                found_a: a.len(),
                found_b: b.len(),
            });
        }

        for (x, y) in a.iter().zip(b) {
            self.bands.classify((x - y).abs());
        }
        self.total_values += self.data_columns as u64;
        self.rows += 1;
        Ok(())
    }

    pub fn bands(&self) -> &BandList {
        &self.bands
    }

    pub fn total_values(&self) -> u64 {
        self.total_values
    }

    /// Finish counting. Fails if nothing was classified, since percentages
    /// of a zero total are undefined.
    pub fn finish(self) -> Result<Tally> {
        if self.total_values == 0 {
            return Err(DeltaError::NoExpressionValues);
        }
        Ok(Tally {
            bands: self.bands,
            total_values: self.total_values,
            rows: self.rows,
            data_columns: self.data_columns,
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compare two expression files cell by cell.
///
/// Both files are closed before this returns, on success and on error.
pub fn compare_files(first: &Path, second: &Path, bands: BandList) -> Result<Tally> {
    let a = ExpressionReader::open(first)?;
    let b = ExpressionReader::open(second)?;
    compare_readers(a, b, bands)
}

/// Compare two row suppliers in lockstep.
///
/// The header of `a` fixes the number of data columns; `b` must agree, and
/// both must have the same number of data rows.
pub fn compare_readers<A: Read, B: Read>(
    mut a: ExpressionReader<A>,
    mut b: ExpressionReader<B>,
    bands: BandList,
) -> Result<Tally> {
    let data_columns = a.read_header()?.data_columns();
    if data_columns == 0 {
        return Err(DeltaError::NoDataColumns {
            file: a.name().to_string(),
        });
    }

    let found = b.read_header()?.data_columns();
    if found != data_columns {
        return Err(DeltaError::ColumnMismatch {
            first: a.name().to_string(),
            second: b.name().to_string(),
            expected: data_columns,
            found,
        });
    }
    log::debug!("{} data columns per row", data_columns);

    let mut counter = BandedDiffCounter::new(bands, data_columns);
    // Both sides advance before either row is parsed, so a row-count
    // mismatch is reported ahead of any defect in the unmatched row.
    loop {
        match (a.advance()?, b.advance()?) {
            (Some(line_a), Some(line_b)) => {
                let row_a = a.parse_record(line_a, data_columns)?;
                let row_b = b.parse_record(line_b, data_columns)?;
                counter.add_row_pair(&row_a.values, &row_b.values)?;
            }
            (None, None) => break,
            (Some(_), None) => {
                return Err(DeltaError::RowMismatch {
                    longer: a.name().to_string(),
                    shorter: b.name().to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(DeltaError::RowMismatch {
                    longer: b.name().to_string(),
                    shorter: a.name().to_string(),
                })
            }
        }
    }

    log::info!(
        "Compared {} rows x {} columns ({} values)",
        counter.rows,
        data_columns,
        counter.total_values
    );
    counter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::Band;
    use std::io::Cursor;

    fn reader(name: &str, text: &str) -> ExpressionReader<Cursor<Vec<u8>>> {
        ExpressionReader::from_reader(name, Cursor::new(text.as_bytes().to_vec()))
    }

    fn run(deltas: &str, a: &str, b: &str) -> Result<Tally> {
        compare_readers(reader("a.txt", a), reader("b.txt", b), BandList::parse(deltas)?)
    }

    fn counts(tally: &Tally) -> Vec<u64> {
        tally.bands.iter().map(Band::count).collect()
    }

    #[test]
    fn single_row_two_columns() {
        let tally = run(
            "1.0",
            "probe\tc1\tc2\np1\t1.0\t2.0\n",
            "probe\tc1\tc2\np1\t1.5\t2.0\n",
        )
        .unwrap();
        assert_eq!(counts(&tally), vec![1, 1, 0]);
        assert_eq!(tally.total_values, 2);
        assert_eq!(tally.rows, 1);
        assert_eq!(tally.data_columns, 2);
    }

    #[test]
    fn one_value_per_band() {
        let tally = run(
            "0.5,1.0",
            "probe\tc1\tc2\np1\t1.0\t1.0\np2\t1.0\t2.0\n",
            "probe\tc1\tc2\np1\t1.3\t1.7\np2\t2.5\t2.0\n",
        )
        .unwrap();
        assert_eq!(counts(&tally), vec![1, 1, 1, 1]);
        assert_eq!(tally.total_values, 4);
    }

    #[test]
    fn difference_is_symmetric() {
        let a = "probe\tc1\np1\t3.0\np2\t0.25\n";
        let b = "probe\tc1\np1\t1.0\np2\t0.75\n";
        assert_eq!(
            counts(&run("0.5,1.0", a, b).unwrap()),
            counts(&run("0.5,1.0", b, a).unwrap())
        );
    }

    #[test]
    fn column_count_mismatch() {
        let err = run(
            "1.0",
            "probe\tc1\tc2\tc3\np1\t1\t2\t3\n",
            "probe\tc1\tc2\np1\t1\t2\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DeltaError::ColumnMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
        assert!(err.to_string().starts_with("column dimensions do not match"));
    }

    #[test]
    fn first_file_longer() {
        let err = run(
            "1.0",
            "probe\tc1\np1\t1\np2\t2\n",
            "probe\tc1\np1\t1\n",
        )
        .unwrap_err();
        match err {
            DeltaError::RowMismatch { longer, shorter } => {
                assert_eq!(longer, "a.txt");
                assert_eq!(shorter, "b.txt");
            }
            other => panic!("expected RowMismatch, got {other:?}"),
        }
    }

    #[test]
    fn second_file_longer() {
        let err = run(
            "1.0",
            "probe\tc1\np1\t1\n",
            "probe\tc1\np1\t1\np2\t2\n",
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::RowMismatch { ref longer, .. } if longer == "b.txt"));
    }

    #[test]
    fn no_tabs_means_no_data_columns() {
        let err = run("1.0", "probe c1 c2\np1 1 2\n", "probe c1 c2\np1 1 2\n").unwrap_err();
        assert!(matches!(err, DeltaError::NoDataColumns { ref file } if file == "a.txt"));
    }

    #[test]
    fn empty_second_file_is_column_mismatch() {
        let err = run("1.0", "probe\tc1\np1\t1\n", "").unwrap_err();
        assert!(matches!(err, DeltaError::ColumnMismatch { found: 0, .. }));
    }

    #[test]
    fn header_only_has_nothing_to_report() {
        let err = run("1.0", "probe\tc1\n", "probe\tc1\n").unwrap_err();
        assert!(matches!(err, DeltaError::NoExpressionValues));
    }

    #[test]
    fn ragged_row_in_second_file() {
        let err = run(
            "1.0",
            "probe\tc1\tc2\np1\t1\t2\n",
            "probe\tc1\tc2\np1\t1\n",
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::RaggedRow { ref file, .. } if file == "b.txt"));
    }

    #[test]
    fn counter_totals_match_band_sums() {
        let mut counter = BandedDiffCounter::new(BandList::new(&[0.1, 1.0]).unwrap(), 3);
        counter.add_row_pair(&[1.0, 2.0, 3.0], &[1.0, 2.05, 5.0]).unwrap();
        counter.add_row_pair(&[0.0, 0.0, 0.0], &[0.5, 0.0, -0.5]).unwrap();
        assert_eq!(counter.total_values(), 6);
        assert_eq!(counter.bands().total(), 6);

        let tally = counter.finish().unwrap();
        assert_eq!(counts(&tally), vec![2, 1, 2, 1]);
        assert_eq!(tally.rows, 2);
    }

    #[test]
    fn short_row_pair_is_rejected_and_not_counted() {
        let mut counter = BandedDiffCounter::new(BandList::new(&[1.0]).unwrap(), 3);
        let err = counter.add_row_pair(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            DeltaError::RowWidth {
                expected: 3,
                found_a: 1,
                found_b: 1,
            }
        ));
        assert!(counter.add_row_pair(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
        assert_eq!(counter.total_values(), 0);
        assert_eq!(counter.bands().total(), 0);

        counter.add_row_pair(&[1.0, 2.0, 3.0], &[1.0, 2.5, 9.0]).unwrap();
        assert_eq!(counter.total_values(), 3);
        assert_eq!(counter.bands().total(), counter.total_values());
    }

    #[test]
    fn extra_ragged_row_reports_row_mismatch() {
        let err = run(
            "1.0",
            "probe\tc1\tc2\np1\t1\t2\np2\t1\n",
            "probe\tc1\tc2\np1\t1\t2\n",
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::RowMismatch { ref longer, .. } if longer == "a.txt"));
    }

    #[test]
    fn extra_bad_number_in_second_file_reports_row_mismatch() {
        let err = run(
            "1.0",
            "probe\tc1\np1\t1\n",
            "probe\tc1\np1\t1\np2\tn/a\n",
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::RowMismatch { ref longer, .. } if longer == "b.txt"));
    }
}
