use serde::{Deserialize, Serialize};

/// Cell with position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub cell: Cell,
}

/// A single cell's value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// The display value (integral numbers without a fraction, booleans as TRUE/FALSE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    /// Cell type: s=string, n=number, b=boolean, e=error
    pub t: CellType,
}

impl Cell {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            v: Some(value.into()),
            t: CellType::String,
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            v: Some(format_number(value)),
            t: CellType::Number,
        }
    }

    /// Trimmed value, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        self.v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    #[serde(rename = "s")]
    String,
    #[serde(rename = "n")]
    Number,
    #[serde(rename = "b")]
    Boolean,
    #[serde(rename = "e")]
    Error,
}

/// Render a numeric value the way a spreadsheet user typed it.
///
/// Integral values lose the fraction (`101`, not `101.0`) so numeric roll
/// numbers and dimensions survive as text.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        whole.to_string()
    } else {
        value.to_string()
    }
}
