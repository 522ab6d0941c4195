use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a scalar cell value in a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or text that is empty after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text that starts with `=` is a formula source.
    #[must_use]
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::String(s) if s.trim_start().starts_with('='))
    }

    /// Numeric reading of the cell.
    ///
    /// Typed numbers and numeric text count; booleans, blanks and
    /// non-finite parses do not.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
            }
            _ => None,
        }
    }

    /// Check if the value reads as a number
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Get the value as a string
    #[must_use]
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Comparison key used by duplicate detection: trimmed, lower-cased text.
    #[must_use]
    pub fn match_key(&self) -> String {
        self.as_text().trim().to_lowercase()
    }

    /// Parse a string into a `CellValue` with type inference
    /// Tries: null -> bool -> int -> float -> string
    #[must_use]
    pub fn infer(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }

        // Formula sources stay text
        if trimmed.starts_with('=') {
            return CellValue::String(s.to_string());
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        CellValue::String(s.to_string())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// Render a computed number for messages.
///
/// Whole numbers print without decimals, everything else with two.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer("  "), CellValue::Null);
        assert_eq!(CellValue::infer("TRUE"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("42"), CellValue::Int(42));
        assert_eq!(CellValue::infer("-2.5"), CellValue::Float(-2.5));
        assert_eq!(CellValue::infer("yes"), CellValue::from("yes"));
        assert_eq!(CellValue::infer("NaN"), CellValue::from("NaN"));
        assert_eq!(
            CellValue::infer("=SUM(A1:A3)"),
            CellValue::from("=SUM(A1:A3)")
        );
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Int(3).as_number(), Some(3.0));
        assert_eq!(CellValue::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(CellValue::from("inf").as_number(), None);
        assert_eq!(CellValue::from("abc").as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Null.as_number(), None);
    }

    #[test]
    fn test_empty_and_formula() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::from("   ").is_empty());
        assert!(!CellValue::Int(0).is_empty());
        assert!(CellValue::from("=A1+B1").is_formula());
        assert!(!CellValue::from("A1+B1").is_formula());
    }

    #[test]
    fn test_match_key() {
        assert_eq!(CellValue::from("  Alice ").match_key(), "alice");
        assert_eq!(CellValue::Int(10).match_key(), "10");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(60.0), "60");
        assert_eq!(format_number(2.5), "2.50");
        assert_eq!(format_number(-1.0 / 3.0), "-0.33");
    }

    #[test]
    fn test_json_round_trip_shapes() {
        let cells = vec![
            CellValue::Null,
            CellValue::Bool(false),
            CellValue::Int(7),
            CellValue::from("x"),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,false,7,"x"]"#);
        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }
}
