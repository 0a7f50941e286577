//! Per-column type inference for raw CSV cells.
//!
//! A column is typed as a whole: it becomes numeric (or boolean) only when
//! every non-empty cell agrees, otherwise every cell keeps its literal text.

use crate::models::CellValue;

/// Inferred type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// No non-empty cells at all.
    Empty,
    Integer,
    Float,
    Bool,
    Text,
}

/// Infer the type of a column from its raw cells.
pub fn infer_column<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut integer = true;
    let mut float = true;
    let mut boolean = true;
    let mut seen = false;

    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        seen = true;
        integer = integer && cell.parse::<i64>().is_ok();
        float = float && parse_float(cell).is_some();
        boolean = boolean && parse_bool(cell).is_some();
        if !integer && !float && !boolean {
            return ColumnType::Text;
        }
    }

    match (seen, integer, float, boolean) {
        (false, _, _, _) => ColumnType::Empty,
        (true, true, _, _) => ColumnType::Integer,
        (true, false, true, _) => ColumnType::Float,
        (true, false, false, true) => ColumnType::Bool,
        _ => ColumnType::Text,
    }
}

/// Convert one raw cell according to its column type.
pub fn convert_cell(raw: &str, column_type: ColumnType) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match column_type {
        ColumnType::Integer => raw
            .parse::<i64>()
            .map(CellValue::Integer)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        ColumnType::Float => parse_float(raw)
            .map(CellValue::Float)
            .unwrap_or_else(|| CellValue::Text(raw.to_string())),
        ColumnType::Bool => parse_bool(raw)
            .map(CellValue::Bool)
            .unwrap_or_else(|| CellValue::Text(raw.to_string())),
        ColumnType::Empty | ColumnType::Text => CellValue::Text(raw.to_string()),
    }
}

// Rust accepts "inf"/"nan"/"infinity" spelled freely; only the plain
// numeric forms count as numbers here.
fn parse_float(raw: &str) -> Option<f64> {
    let looks_numeric = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !looks_numeric {
        return None;
    }
    raw.parse::<f64>().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_column() {
        assert_eq!(infer_column(["1", "-2", "30"]), ColumnType::Integer);
        assert_eq!(convert_cell("-2", ColumnType::Integer), CellValue::Integer(-2));
    }

    #[test]
    fn test_float_column_accepts_integers() {
        assert_eq!(infer_column(["1", "2.5", "1e3"]), ColumnType::Float);
        assert_eq!(convert_cell("1", ColumnType::Float), CellValue::Float(1.0));
    }

    #[test]
    fn test_mixed_column_is_text() {
        assert_eq!(infer_column(["1", "left", "2"]), ColumnType::Text);
        assert_eq!(convert_cell("1", ColumnType::Text), CellValue::from("1"));
    }

    #[test]
    fn test_bool_column() {
        assert_eq!(infer_column(["True", "false", "TRUE"]), ColumnType::Bool);
        assert_eq!(convert_cell("False", ColumnType::Bool), CellValue::Bool(false));
    }

    #[test]
    fn test_empty_cells_ignored_for_inference() {
        assert_eq!(infer_column(["", "4", ""]), ColumnType::Integer);
        assert_eq!(infer_column(["", ""]), ColumnType::Empty);
        assert_eq!(convert_cell("", ColumnType::Integer), CellValue::Empty);
    }

    #[test]
    fn test_nan_words_stay_text() {
        assert_eq!(infer_column(["inf", "nan"]), ColumnType::Text);
    }

    #[test]
    fn test_response_keys_stay_text() {
        assert_eq!(infer_column(["z", "m"]), ColumnType::Text);
    }
}
