//! # Trialmaker - stimulus lists to trial records
//!
//! Trialmaker reads a CSV stimulus list (one trial per row, header row first)
//! and turns every row into a [`Trial`] whose attributes are named after the
//! column headers, ready for an experiment runtime to consume.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Reader    │────▶│   Wrapper   │────▶│  TrialList  │
//! │ (stimuli)   │     │ (RowRecord) │     │   (Trial)   │     │  (ordered)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trialmaker::make_trial_list;
//!
//! let trials = make_trial_list("stimulus_list.csv")?;
//! println!("{:?}", trials[1].vars_list());
//! println!("{}", trials[0].require("target")?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Cell values and row records
//! - [`parser`] - CSV reading with optional auto-detection
//! - [`trial`] - Trial records and the list builder

pub mod error;
pub mod models;
pub mod parser;
pub mod trial;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AppError, AppResult, CsvError, CsvResult, TrialError, TrialResult};

pub use models::{CellValue, RowRecord};

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_str, read_rows,
    read_rows_with, ParseResult, ReaderOptions,
};

pub use trial::{
    make_trial_list, make_trial_list_with, trials_from_rows, CsvInfo, Trial, TrialList,
    TrialListResult,
};
