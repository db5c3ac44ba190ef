//! Banded comparison of two expression matrices.
//!
//! Two tab-separated files of equal shape are read in lockstep. Each cell
//! pair's absolute difference is counted in the first band it satisfies:
//! exactly zero, `<= delta1`, `<= delta2`, ..., or the remainder.

pub mod bands;
pub mod compare;
pub mod data;
pub mod error;
pub mod report;

pub use bands::{parse_thresholds, Band, BandList, Relation};
pub use compare::{compare_files, compare_readers, BandedDiffCounter, Tally};
pub use error::DeltaError;
