use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::model::{ExpressionHeader, ExpressionRow};
use crate::error::{DeltaError, Result};

// ---------------------------------------------------------------------------
// ExpressionReader – row supplier over a tab-separated file
// ---------------------------------------------------------------------------

/// Reads a tab-separated expression file one row at a time.
///
/// Layout:
///
/// ```text
/// probeset<TAB>chip1<TAB>chip2 ...
/// 1000_at <TAB>7.21 <TAB>6.98  ...
/// ```
///
/// The first record is the header; every following record is a data row.
/// Quotes are not special and empty lines are skipped.
pub struct ExpressionReader<R: Read> {
    name: String,
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl ExpressionReader<File> {
    /// Open `path` for reading. The file is closed when the reader drops.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| DeltaError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened expression file {}", path.display());
        Ok(Self::from_reader(path.display().to_string(), file))
    }
}

impl<R: Read> ExpressionReader<R> {
    /// Wrap any byte source. `name` labels the source in error messages.
    pub fn from_reader(name: impl Into<String>, rdr: R) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(rdr);

        ExpressionReader {
            name: name.into(),
            reader,
            record: StringRecord::new(),
        }
    }

    /// Label used for this source in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next raw record without interpreting it. Returns its line
    /// number, or `None` at end of input.
    pub(crate) fn advance(&mut self) -> Result<Option<u64>> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|source| DeltaError::Read {
                file: self.name.clone(),
                line: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;
        if !more {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        Ok(Some(line))
    }

    /// Read the header row. An empty input yields a header with no chips.
    pub fn read_header(&mut self) -> Result<ExpressionHeader> {
        if self.advance()?.is_none() {
            return Ok(ExpressionHeader {
                id_heading: String::new(),
                chips: Vec::new(),
            });
        }

        let mut fields = self.record.iter();
        let id_heading = fields.next().unwrap_or("").to_string();
        let chips = fields.map(str::to_string).collect();
        Ok(ExpressionHeader { id_heading, chips })
    }

    /// Read the next data row, which must have exactly `data_columns`
    /// values after the identifier.
    pub fn read_row(&mut self, data_columns: usize) -> Result<Option<ExpressionRow>> {
        match self.advance()? {
            Some(line) => self.parse_record(line, data_columns).map(Some),
            None => Ok(None),
        }
    }

    /// Interpret the record last read by [`Self::advance`] as a data row.
    pub(crate) fn parse_record(&self, line: u64, data_columns: usize) -> Result<ExpressionRow> {
        let found = self.record.len().saturating_sub(1);
        if found != data_columns {
            return Err(DeltaError::RaggedRow {
                file: self.name.clone(),
                line,
                expected: data_columns,
                found,
            });
        }

        let probe = self.record.get(0).unwrap_or("").to_string();
        let values = self
            .record
            .iter()
            .enumerate()
            .skip(1)
            .map(|(column, text)| {
                text.trim().parse::<f64>().map_err(|_| DeltaError::ParseValue {
                    file: self.name.clone(),
                    line,
                    column: column + 1,
                    text: text.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(ExpressionRow {
            line,
            probe,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> ExpressionReader<Cursor<Vec<u8>>> {
        ExpressionReader::from_reader("test.txt", Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn reads_header_and_rows() {
        let mut r = reader("probe\tchipA\tchipB\np1\t1.0\t2.5\np2\t 3 \t-4e-1\n");
        let header = r.read_header().unwrap();
        assert_eq!(header.id_heading, "probe");
        assert_eq!(header.chips, vec!["chipA", "chipB"]);
        assert_eq!(header.data_columns(), 2);

        let row = r.read_row(2).unwrap().unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(row.probe, "p1");
        assert_eq!(row.values, vec![1.0, 2.5]);

        let row = r.read_row(2).unwrap().unwrap();
        assert_eq!(row.values, vec![3.0, -0.4]);

        assert!(r.read_row(2).unwrap().is_none());
    }

    #[test]
    fn crlf_and_blank_lines() {
        let mut r = reader("probe\tc1\r\n\r\np1\t1.5\r\n");
        assert_eq!(r.read_header().unwrap().data_columns(), 1);
        assert_eq!(r.read_row(1).unwrap().unwrap().values, vec![1.5]);
        assert!(r.read_row(1).unwrap().is_none());
    }

    #[test]
    fn empty_input_has_no_data_columns() {
        let mut r = reader("");
        assert_eq!(r.read_header().unwrap().data_columns(), 0);
    }

    #[test]
    fn comma_separated_input_has_no_data_columns() {
        let mut r = reader("probe,c1,c2\np1,1,2\n");
        assert_eq!(r.read_header().unwrap().data_columns(), 0);
    }

    #[test]
    fn ragged_row_is_reported_with_line() {
        let mut r = reader("probe\tc1\tc2\np1\t1\t2\np2\t1\n");
        r.read_header().unwrap();
        r.read_row(2).unwrap();
        match r.read_row(2) {
            Err(DeltaError::RaggedRow {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!((line, expected, found), (3, 2, 1));
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    #[test]
    fn bad_number_names_line_and_column() {
        let mut r = reader("probe\tc1\tc2\np1\t1.0\tn/a\n");
        r.read_header().unwrap();
        let err = r.read_row(2).unwrap_err();
        match &err {
            DeltaError::ParseValue {
                file,
                line,
                column,
                text,
            } => {
                assert_eq!(file, "test.txt");
                assert_eq!((*line, *column), (2, 3));
                assert_eq!(text, "n/a");
            }
            other => panic!("expected ParseValue, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "test.txt, line 2, column 3: 'n/a' is not a number"
        );
    }

    #[test]
    fn quotes_are_literal() {
        let mut r = reader("\"probe\"\tc1\n\"p1\"\t2\n");
        assert_eq!(r.read_header().unwrap().id_heading, "\"probe\"");
        assert_eq!(r.read_row(1).unwrap().unwrap().probe, "\"p1\"");
    }
}
