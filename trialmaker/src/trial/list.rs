//! Build the ordered list of trials for an experiment.
//!
//! Reads the stimulus file, then wraps every row in exactly one [`Trial`].
//!
//! # Example
//!
//! ```rust,ignore
//! use trialmaker::make_trial_list;
//!
//! let trials = make_trial_list("stimulus_list.csv")?;
//! for trial in &trials {
//!     println!("{} -> {}", trial.require("target")?, trial.require("correct_response")?);
//! }
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::Trial;
use crate::error::{CsvResult, TrialError, TrialResult};
use crate::models::RowRecord;
use crate::parser::{format_delimiter, read_rows_with, ParseResult, ReaderOptions};

/// Trials in stimulus-file row order.
pub type TrialList = Vec<Trial>;

/// Stimulus file information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Trials plus information about the file they came from.
#[derive(Debug, Clone, Serialize)]
pub struct TrialListResult {
    pub trials: TrialList,
    pub csv_info: CsvInfo,
}

impl TrialListResult {
    /// Trial at `index`, or an error naming the list length.
    pub fn trial(&self, index: usize) -> TrialResult<&Trial> {
        self.trials.get(index).ok_or(TrialError::Index {
            index,
            len: self.trials.len(),
        })
    }
}

/// Read a stimulus file and make one trial per row.
///
/// Uses default reader options: comma-separated, UTF-8. Fails with the
/// reader's error; no partial list is returned.
pub fn make_trial_list<P: AsRef<Path>>(path: P) -> CsvResult<TrialList> {
    make_trial_list_with(path, &ReaderOptions::default()).map(|r| r.trials)
}

/// Same as [`make_trial_list`] with explicit reader options.
pub fn make_trial_list_with<P: AsRef<Path>>(
    path: P,
    options: &ReaderOptions,
) -> CsvResult<TrialListResult> {
    let path = path.as_ref();
    let parsed = read_rows_with(path, options)?;

    info!(
        path = %path.display(),
        encoding = %parsed.encoding,
        delimiter = %format_delimiter(parsed.delimiter),
        rows = parsed.rows.len(),
        "loaded stimulus file"
    );

    Ok(from_parsed(parsed))
}

/// Wrap already-read rows, one trial each.
pub fn trials_from_rows<'a, I>(rows: I) -> TrialList
where
    I: IntoIterator<Item = &'a RowRecord>,
{
    rows.into_iter().map(Trial::from_row).collect()
}

fn from_parsed(parsed: ParseResult) -> TrialListResult {
    let trials = trials_from_rows(&parsed.rows);
    let csv_info = CsvInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        row_count: parsed.rows.len(),
        headers: parsed.headers,
    };
    TrialListResult { trials, csv_info }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use crate::models::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn stimulus_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_worked_example() {
        let file = stimulus_file(
            "target,competitor,correct_response\nM5K.png,N2V.png,z\nC2G.png,Z7R.png,m\n",
        );
        let trials = make_trial_list(file.path()).unwrap();

        assert_eq!(trials.len(), 2);
        assert_eq!(trials[0].get_str("target"), Some("M5K.png"));
        assert_eq!(trials[0].get_str("correct_response"), Some("z"));
        assert_eq!(trials[0].vars_list(), ["target", "competitor", "correct_response"]);
        assert_eq!(trials[1].get_str("correct_response"), Some("m"));
    }

    #[test]
    fn test_one_trial_per_row_with_all_columns() {
        let file = stimulus_file(
            "target,competitor,sentence,target_position,correct_response\n\
             M5K.png,N2V.png,djVc.wav,left,z\n\
             C2G.png,Z7R.png,djVc.wav,right,m\n\
             P4Q.png,K8L.png,abXy.wav,left,z\n",
        );
        let trials = make_trial_list(file.path()).unwrap();

        assert_eq!(trials.len(), 3);
        for trial in &trials {
            assert!(trial.len() >= 5);
            for name in trial.vars_list() {
                assert!(trial.contains(name));
            }
        }
    }

    #[test]
    fn test_header_only_gives_empty_list() {
        let file = stimulus_file("target,competitor\n");
        let trials = make_trial_list(file.path()).unwrap();
        assert!(trials.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = make_trial_list(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, CsvError::NotFound { .. }));
    }

    #[test]
    fn test_ragged_file_fails_whole_read() {
        let file = stimulus_file("a,b\n1,2\n3,4,5\n");
        assert!(matches!(
            make_trial_list(file.path()),
            Err(CsvError::Parse { .. })
        ));
    }

    #[test]
    fn test_repeat_reads_equal() {
        let file = stimulus_file("word,soa\ncat,200\ndog,\n");
        let first = make_trial_list(file.path()).unwrap();
        let second = make_trial_list(file.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[1].get("soa"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_with_options_reports_info() {
        let file = stimulus_file("target;key\nA.png;z\n");
        let options = ReaderOptions::new().with_auto_detect(true);
        let result = make_trial_list_with(file.path(), &options).unwrap();

        assert_eq!(result.csv_info.delimiter, ';');
        assert_eq!(result.csv_info.row_count, 1);
        assert_eq!(result.csv_info.headers, vec!["target", "key"]);
        assert_eq!(result.trial(0).unwrap().get_str("key"), Some("z"));
        assert!(matches!(
            result.trial(5),
            Err(TrialError::Index { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_trials_from_rows_adds_nothing() {
        let rows = crate::parser::parse_str("a\n1\n2\n", &ReaderOptions::default())
            .unwrap()
            .rows;
        let trials = trials_from_rows(&rows);

        assert_eq!(trials.len(), 2);
        assert_eq!(trials[1].vars_list(), ["a"]);
        assert_eq!(trials[1].get_i64("a"), Some(2));
    }
}
