//! Stimulus file reader with optional encoding and delimiter detection.
//!
//! Turns a CSV file into ordered [`RowRecord`]s keyed by the header row.
//! No trial-specific logic here.

pub mod infer;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CsvError, CsvResult};
use crate::models::{CellValue, RowRecord};
use infer::{convert_cell, infer_column, ColumnType};

/// Delimiter used when none is given and detection is off.
pub const DEFAULT_DELIMITER: char = ',';

/// Encoding used when none is given.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Options controlling how a stimulus file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Explicit delimiter. Takes precedence over detection.
    pub delimiter: Option<char>,

    /// Detect the delimiter from the header line when none is given.
    pub auto_detect: bool,

    /// Content encoding; `"auto"` runs detection. Defaults to UTF-8.
    pub encoding: Option<String>,

    /// Trim surrounding whitespace from headers and cells.
    pub trim: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            auto_detect: false,
            encoding: None,
            trim: false,
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect = auto_detect;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn resolve_delimiter(&self, content: &str) -> char {
        match self.delimiter {
            Some(d) => d,
            None if self.auto_detect => detect_delimiter(content),
            None => DEFAULT_DELIMITER,
        }
    }

    fn resolve_encoding(&self, bytes: &[u8]) -> String {
        match self.encoding.as_deref() {
            None => DEFAULT_ENCODING.to_string(),
            Some(e) if e.eq_ignore_ascii_case("auto") => detect_encoding(bytes),
            Some(e) => e.to_lowercase(),
        }
    }
}

/// Rows read from a stimulus file, with the settings that were used.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// One record per data row, in file order.
    pub rows: Vec<RowRecord>,
    /// Column headers after de-duplication.
    pub headers: Vec<String>,
    /// Encoding used to decode the content.
    pub encoding: String,
    /// Delimiter used to split fields.
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the named encoding.
///
/// UTF-8 is decoded strictly; a leading byte-order mark is dropped.
/// Latin-1 maps every byte to the code point of the same value
/// (encoding_rs treats that label as windows-1252).
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| CsvError::Encoding(format!("invalid UTF-8: {}", e)))?,
        "iso-8859-1" | "latin-1" | "latin1" => bytes.iter().map(|&b| b as char).collect(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        other => {
            let codec = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| CsvError::Encoding(format!("unsupported encoding '{}'", other)))?;
            codec.decode(bytes).0.into_owned()
        }
    };

    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = DEFAULT_DELIMITER;
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read a stimulus file with default options.
pub fn read_rows<P: AsRef<Path>>(path: P) -> CsvResult<Vec<RowRecord>> {
    read_rows_with(path, &ReaderOptions::default()).map(|r| r.rows)
}

/// Read a stimulus file with explicit options.
///
/// The file is read completely before parsing starts.
pub fn read_rows_with<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading stimulus file");
    let bytes = std::fs::read(path).map_err(|e| CsvError::from_io(path, e))?;
    parse_bytes(&bytes, options)
}

/// Parse raw bytes: decode, pick a delimiter, then parse.
pub fn parse_bytes(bytes: &[u8], options: &ReaderOptions) -> CsvResult<ParseResult> {
    let encoding = options.resolve_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let mut result = parse_str(&content, options)?;
    result.encoding = encoding;
    Ok(result)
}

/// Parse already-decoded CSV content.
pub fn parse_str(content: &str, options: &ReaderOptions) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let delimiter = options.resolve_delimiter(content);
    if !delimiter.is_ascii() {
        return Err(CsvError::parse(
            1,
            format!("delimiter '{}' is not a single ASCII character", delimiter),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(if options.trim { csv::Trim::All } else { csv::Trim::None })
        .from_reader(content.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let headers = dedupe_headers(&raw_headers);
    let width = headers.len();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let (line, start) = record
            .position()
            .map(|p| (p.line(), p.byte() as usize))
            .unwrap_or((0, 0));

        if is_blank_line(content, start) {
            continue;
        }
        if record.len() > width {
            return Err(CsvError::parse(
                line,
                format!("Expected {} fields in line {}, saw {}", width, line, record.len()),
            ));
        }

        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        raw_rows.push(cells);
    }

    let column_types: Vec<ColumnType> = (0..width)
        .map(|col| infer_column(raw_rows.iter().map(|row| row[col].as_str())))
        .collect();

    let rows = raw_rows
        .iter()
        .map(|cells| {
            let fields = headers
                .iter()
                .zip(cells)
                .zip(&column_types)
                .map(|((name, raw), ty)| (name.clone(), convert_cell(raw, *ty)))
                .collect::<Vec<(String, CellValue)>>();
            RowRecord::from_fields(fields)
        })
        .collect::<Vec<_>>();

    debug!(
        rows = rows.len(),
        columns = width,
        delimiter = %format_delimiter(delimiter),
        "parsed stimulus rows"
    );

    Ok(ParseResult {
        rows,
        headers,
        encoding: DEFAULT_ENCODING.to_string(),
        delimiter,
    })
}

/// Make header labels unique: repeats of `x` become `x.1`, `x.2`, ...
/// Blank labels become `Unnamed: <index>`.
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (i, label) in raw.iter().enumerate() {
        let base = if label.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            label.clone()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        if candidate != base {
            warn!(column = %base, renamed = %candidate, "duplicate header renamed");
        }
        headers.push(candidate);
    }

    headers
}

/// Whether the record starting at byte `start` is a whitespace-only line.
///
/// Judged on the raw text, so a quoted empty field (`""`) is a real row.
/// Record positions are taken before the reader skips empty lines, hence
/// the leading line terminators are dropped first.
fn is_blank_line(content: &str, start: usize) -> bool {
    content
        .get(start..)
        .map(|rest| rest.trim_start_matches(['\r', '\n']))
        .and_then(|rest| rest.lines().next())
        .map_or(false, |line| line.trim().is_empty())
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
