// ---------------------------------------------------------------------------
// ExpressionHeader – first row of an expression file
// ---------------------------------------------------------------------------

/// Header row: identifier column heading followed by one name per chip.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionHeader {
    /// Heading of the identifier column (e.g. `probeset`).
    pub id_heading: String,
    /// Chip names, one per data column. May be empty strings.
    pub chips: Vec<String>,
}

impl ExpressionHeader {
    /// Number of data columns (fields after the identifier).
    pub fn data_columns(&self) -> usize {
        self.chips.len()
    }
}

// ---------------------------------------------------------------------------
// ExpressionRow – one probe across all chips
// ---------------------------------------------------------------------------

/// A single data row: probe identifier plus one expression value per chip.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Probe identifier (first column), not used in comparisons.
    pub probe: String,
    /// Expression values, same length as the header's chip list.
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// ExpressionMatrix – a fully materialised file (generator output)
// ---------------------------------------------------------------------------

/// An in-memory expression matrix. The comparison never builds one; it is
/// used by the sample generator and in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    pub header: ExpressionHeader,
    pub rows: Vec<ExpressionRow>,
}

impl ExpressionMatrix {
    /// Number of probes (data rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
