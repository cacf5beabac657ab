//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Recursive evaluation of a parsed expression tree.
//! CONTEXT: A leaf holding a string resolves to a value via a three-step
//! lookup: the transaction's scratch cache first, the committed value
//! cache second, and — only if neither has it — computing the referenced
//! cell's parsed content on demand (memoizing the result into scratch so
//! later lookups in the same transaction don't redo the work). The
//! dependency graph's acyclicity guarantees this recursion terminates.

use std::collections::HashMap;

use parser::{ExprNode, NodeValue, OperatorKind};

use crate::cell::{Content, Value};
use crate::coord::{expand_range, parse_cell_name, position_to_name, Position};
use crate::error::EngineError;
use crate::grid::{CellStore, ValueCache};

pub type Scratch = HashMap<Position, Value>;

pub struct Evaluator<'a> {
    store: &'a CellStore,
    committed: &'a ValueCache,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a CellStore, committed: &'a ValueCache) -> Self {
        Evaluator { store, committed }
    }

    /// Resolves `position`'s value, computing and memoizing it into
    /// `scratch` on demand if it is cached nowhere yet.
    pub fn resolve(&self, position: Position, scratch: &mut Scratch) -> Result<Value, EngineError> {
        if let Some(value) = scratch.get(&position) {
            return Ok(value.clone());
        }
        if let Some(value) = self.committed.get(position) {
            return Ok(value.clone());
        }
        let cell = self.store.get(position).ok_or_else(|| {
            EngineError::EvaluationError(format!(
                "reference to non-existent cell {}",
                position_to_name(position)
            ))
        })?;
        let value = self.evaluate_content(&cell.parsed, scratch)?;
        scratch.insert(position, value.clone());
        Ok(value)
    }

    /// Computes the value a piece of parsed content evaluates to. Does
    /// not consult or update `scratch` for `position` itself — callers
    /// that want memoization should go through [`Evaluator::resolve`].
    pub fn evaluate_content(&self, content: &Content, scratch: &mut Scratch) -> Result<Value, EngineError> {
        match content {
            Content::Empty => Err(EngineError::EvaluationError(
                "cannot evaluate an empty cell".to_string(),
            )),
            Content::Number(n) => Ok(Value::Number(*n)),
            Content::String(s) => Ok(Value::String(s.clone())),
            Content::Formula(tree) => self.evaluate_tree(tree, scratch).map(Value::Number),
        }
    }

    fn evaluate_tree(&self, node: &ExprNode, scratch: &mut Scratch) -> Result<f64, EngineError> {
        match &node.value {
            NodeValue::Number(n) => Ok(*n),
            NodeValue::Name(name) => self.evaluate_scalar_reference(name, scratch),
            NodeValue::Operator(op) => match op.kind {
                OperatorKind::Unary => {
                    let child = node
                        .right
                        .as_ref()
                        .expect("unary-operator node always has a right child");
                    let operand = self.evaluate_tree(child, scratch)?;
                    Ok(op.apply_unary(operand))
                }
                OperatorKind::Binary => {
                    let left_node = node
                        .left
                        .as_ref()
                        .expect("binary-operator node always has a left child");
                    let right_node = node
                        .right
                        .as_ref()
                        .expect("binary-operator node always has a right child");
                    let left = self.evaluate_tree(left_node, scratch)?;
                    let right = self.evaluate_tree(right_node, scratch)?;
                    op.apply_binary(left, right).map_err(|_| EngineError::ZeroDivision)
                }
                OperatorKind::Range => {
                    let child = node
                        .right
                        .as_ref()
                        .expect("range-operator node always has a right child");
                    let range_name = match &child.value {
                        NodeValue::Name(name) => name,
                        _ => {
                            return Err(EngineError::EvaluationError(
                                "range operator's operand must be a range name".to_string(),
                            ))
                        }
                    };
                    let positions = expand_range(range_name)?;
                    let mut operands = Vec::with_capacity(positions.len());
                    for position in positions {
                        match self.resolve(position, scratch)? {
                            Value::Number(n) => operands.push(n),
                            Value::String(_) => {
                                return Err(EngineError::EvaluationError(format!(
                                    "non-numeric value in range at {}",
                                    position_to_name(position)
                                )))
                            }
                        }
                    }
                    Ok(op.apply_range(&operands))
                }
            },
        }
    }

    fn evaluate_scalar_reference(&self, name: &str, scratch: &mut Scratch) -> Result<f64, EngineError> {
        if name.contains(':') {
            return Err(EngineError::EvaluationError(
                "a range name cannot be used as a scalar operand".to_string(),
            ));
        }
        let position = parse_cell_name(name)?;
        match self.resolve(position, scratch)? {
            Value::Number(n) => Ok(n),
            Value::String(_) => Err(EngineError::EvaluationError(format!(
                "cell {name} holds a string, not a number"
            ))),
        }
    }
}
