//! FILENAME: engine/src/cell.rs
//! PURPOSE: The fundamental data structures for a single spreadsheet cell.
//! CONTEXT: Separates the user's raw input from its parsed form. A cell
//! is created on the first successful `try_update` with non-empty content
//! for its position, mutated only via successful `try_update`, and
//! destroyed when `try_update` receives the empty string.

use parser::ExprNode;
use serde::{Deserialize, Serialize};

/// A computed or looked-up value: the only two shapes a formula can
/// ultimately reduce to, or a cell can directly hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{n:.0}")
                } else {
                    format!("{n}")
                }
            }
            Value::String(s) => s.clone(),
        }
    }
}

/// The parsed form of a cell's raw string. `Empty` is a marker for
/// deletion, not a value — it never appears in `ValueCache`.
#[derive(Debug, Clone)]
pub enum Content {
    Empty,
    Number(f64),
    String(String),
    Formula(ExprNode),
}

/// The atomic unit of the spreadsheet: what the user typed, and its
/// parsed form.
#[derive(Debug, Clone)]
pub struct Cell {
    pub raw: String,
    pub parsed: Content,
}

impl Cell {
    pub fn new(raw: String, parsed: Content) -> Self {
        Cell { raw, parsed }
    }
}
