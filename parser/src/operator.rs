//! FILENAME: parser/src/operator.rs
//! PURPOSE: The immutable registry of arithmetic operators the formula
//! grammar recognizes.
//! CONTEXT: Operators are looked up by `(symbol, kind)` during the shunting
//! -yard reduction, and their compute functions are invoked by the
//! evaluator once operands are known. The registry never changes after
//! construction (`OperatorCatalog::standard`).

/// Which side(s) of an operator its operands sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Unary,
    Binary,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Ltr,
    Rtl,
}

/// Raised by a binary operator's compute function; currently only `/` by 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionByZero;

#[derive(Clone, Copy)]
enum Compute {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> Result<f64, DivisionByZero>),
    Range(fn(&[f64]) -> f64),
}

/// A single entry in the operator catalog.
///
/// `symbol` may be multi-character (`sin`, `max`) and can overlap operand
/// character classes, so callers must match on the whole token, never a
/// prefix.
#[derive(Clone, Copy)]
pub struct Operator {
    pub symbol: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub kind: OperatorKind,
    compute: Compute,
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .field("associativity", &self.associativity)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.kind == other.kind
    }
}

impl Operator {
    /// Applies a unary operator's compute function.
    ///
    /// # Panics
    /// Panics if called on a non-unary operator; callers dispatch by `kind`.
    pub fn apply_unary(&self, operand: f64) -> f64 {
        match self.compute {
            Compute::Unary(f) => f(operand),
            _ => panic!("apply_unary called on non-unary operator {}", self.symbol),
        }
    }

    /// Applies a binary operator's compute function.
    ///
    /// # Panics
    /// Panics if called on a non-binary operator; callers dispatch by `kind`.
    pub fn apply_binary(&self, left: f64, right: f64) -> Result<f64, DivisionByZero> {
        match self.compute {
            Compute::Binary(f) => f(left, right),
            _ => panic!("apply_binary called on non-binary operator {}", self.symbol),
        }
    }

    /// Applies a range operator's compute function over the expanded operand list.
    ///
    /// # Panics
    /// Panics if called on a non-range operator, or with an empty operand list.
    pub fn apply_range(&self, operands: &[f64]) -> f64 {
        match self.compute {
            Compute::Range(f) => f(operands),
            _ => panic!("apply_range called on non-range operator {}", self.symbol),
        }
    }
}

/// The immutable set of operators a formula may use.
pub struct OperatorCatalog {
    operators: Vec<Operator>,
}

impl OperatorCatalog {
    /// Builds the catalog described in the spreadsheet engine's data model:
    /// `+ - * / ^` binary, unary negation and `sin`, and the `max`/`min`/
    /// `sum`/`average` range (aggregate) operators.
    pub fn standard() -> Self {
        use Associativity::{Ltr, Rtl};
        use OperatorKind::{Binary, Range, Unary};

        let operators = vec![
            Operator {
                symbol: "+",
                precedence: 1,
                associativity: Ltr,
                kind: Binary,
                compute: Compute::Binary(|a, b| Ok(a + b)),
            },
            Operator {
                symbol: "-",
                precedence: 1,
                associativity: Ltr,
                kind: Binary,
                compute: Compute::Binary(|a, b| Ok(a - b)),
            },
            Operator {
                symbol: "*",
                precedence: 2,
                associativity: Ltr,
                kind: Binary,
                compute: Compute::Binary(|a, b| Ok(a * b)),
            },
            Operator {
                symbol: "/",
                precedence: 2,
                associativity: Ltr,
                kind: Binary,
                compute: Compute::Binary(|a, b| {
                    if b == 0.0 {
                        Err(DivisionByZero)
                    } else {
                        Ok(a / b)
                    }
                }),
            },
            Operator {
                symbol: "^",
                precedence: 4,
                associativity: Rtl,
                kind: Binary,
                compute: Compute::Binary(|a, b| Ok(a.powf(b))),
            },
            Operator {
                symbol: "-",
                precedence: 3,
                associativity: Rtl,
                kind: Unary,
                compute: Compute::Unary(|a| -a),
            },
            Operator {
                symbol: "sin",
                precedence: 3,
                associativity: Rtl,
                kind: Unary,
                compute: Compute::Unary(f64::sin),
            },
            Operator {
                symbol: "max",
                precedence: 3,
                associativity: Rtl,
                kind: Range,
                compute: Compute::Range(|xs| xs.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            },
            Operator {
                symbol: "min",
                precedence: 3,
                associativity: Rtl,
                kind: Range,
                compute: Compute::Range(|xs| xs.iter().copied().fold(f64::INFINITY, f64::min)),
            },
            Operator {
                symbol: "sum",
                precedence: 3,
                associativity: Rtl,
                kind: Range,
                compute: Compute::Range(|xs| xs.iter().sum()),
            },
            Operator {
                symbol: "average",
                precedence: 3,
                associativity: Rtl,
                kind: Range,
                compute: Compute::Range(|xs| xs.iter().sum::<f64>() / xs.len() as f64),
            },
        ];

        OperatorCatalog { operators }
    }

    /// True if `token` equals the symbol of any catalog entry, regardless of
    /// arity. Used by the tokenizer, which classifies by token shape only.
    pub fn is_operator_symbol(&self, token: &str) -> bool {
        self.operators.iter().any(|op| op.symbol == token)
    }

    /// Looks up an operator by exact symbol and kind.
    pub fn find(&self, symbol: &str, kind: OperatorKind) -> Option<Operator> {
        self.operators
            .iter()
            .copied()
            .find(|op| op.symbol == symbol && op.kind == kind)
    }

    /// Resolves which operator a symbol refers to given the parser's current
    /// context, per the shunting-yard's kind-precedence rule:
    /// `Range > Binary(if prev_is_operand) > Unary(otherwise)`.
    pub fn resolve(&self, symbol: &str, prev_is_operand: bool) -> Option<Operator> {
        if let Some(op) = self.find(symbol, OperatorKind::Range) {
            return Some(op);
        }
        if prev_is_operand {
            self.find(symbol, OperatorKind::Binary)
        } else {
            self.find(symbol, OperatorKind::Unary)
        }
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_minus_as_unary_when_not_after_operand() {
        let catalog = OperatorCatalog::standard();
        let op = catalog.resolve("-", false).unwrap();
        assert_eq!(op.kind, OperatorKind::Unary);
    }

    #[test]
    fn resolves_minus_as_binary_after_operand() {
        let catalog = OperatorCatalog::standard();
        let op = catalog.resolve("-", true).unwrap();
        assert_eq!(op.kind, OperatorKind::Binary);
    }

    #[test]
    fn range_operator_outranks_context() {
        let catalog = OperatorCatalog::standard();
        let op = catalog.resolve("sum", true).unwrap();
        assert_eq!(op.kind, OperatorKind::Range);
    }

    #[test]
    fn division_by_zero_is_caught() {
        let catalog = OperatorCatalog::standard();
        let div = catalog.find("/", OperatorKind::Binary).unwrap();
        assert_eq!(div.apply_binary(1.0, 0.0), Err(DivisionByZero));
        assert_eq!(div.apply_binary(6.0, 2.0), Ok(3.0));
    }

    #[test]
    fn power_is_right_associative_precedence() {
        let catalog = OperatorCatalog::standard();
        let pow = catalog.find("^", OperatorKind::Binary).unwrap();
        assert_eq!(pow.associativity, Associativity::Rtl);
        assert_eq!(pow.precedence, 4);
    }
}
