//! FILENAME: parser/src/parser.rs
//! PURPOSE: Shunting-yard reducer and postfix-to-tree builder.
//! CONTEXT: The second and third stages of the pipeline. Tokens from the
//! lexer are reduced to postfix order (handling contextual unary/binary
//! disambiguation and the `op(range)` call shape), then the postfix
//! sequence is folded into an `ExprNode` tree with a node stack.
//!
//! GRAMMAR (informal): an expression is a sequence of operands (numeric
//! literals, cell names) and operators (unary, binary, range), grouped by
//! any of `()`, `[]`, `{}` (interchangeable, but matched only within the
//! same kind). A range operator must be followed immediately by
//! `(range-name)`; a bare range name anywhere else is rejected.

use crate::ast::{ExprNode, NodeValue};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::operator::{Operator, OperatorCatalog, OperatorKind};
use crate::token::{BracketKind, Token};

pub type ParseResult<T> = Result<T, ParseError>;

enum StackItem {
    Bracket(BracketKind),
    Op(Operator),
}

enum PostfixItem {
    Number(f64),
    Name(String),
    Op(Operator),
}

/// Parses formulas against a given operator catalog. Most callers use the
/// free function [`parse`], which parses against the standard catalog.
pub struct Parser {
    catalog: OperatorCatalog,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            catalog: OperatorCatalog::standard(),
        }
    }

    pub fn parse(&self, input: &str) -> ParseResult<ExprNode> {
        let tokens = Lexer::new(input, &self.catalog).tokenize()?;
        if tokens.is_empty() {
            return Err(ParseError::EmptyFormula);
        }
        let postfix = to_postfix(&tokens, &self.catalog)?;
        build_tree(postfix)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `input` (the formula text with any leading `=` already stripped)
/// into an expression tree, against the standard operator catalog.
pub fn parse(input: &str) -> ParseResult<ExprNode> {
    Parser::new().parse(input)
}

fn higher_or_equal_precedence(top: &Operator, incoming: &Operator) -> bool {
    use crate::operator::Associativity::{Ltr, Rtl};
    match incoming.associativity {
        Ltr => top.precedence >= incoming.precedence,
        Rtl => top.precedence > incoming.precedence,
    }
}

fn to_postfix(tokens: &[Token], catalog: &OperatorCatalog) -> ParseResult<Vec<PostfixItem>> {
    let mut output = Vec::new();
    let mut op_stack: Vec<StackItem> = Vec::new();
    let mut prev_is_operand = false;
    let mut prev_is_open_bracket = false;

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Open(kind) => {
                if prev_is_operand {
                    return Err(ParseError::OpenBracketAfterOperand);
                }
                op_stack.push(StackItem::Bracket(*kind));
                prev_is_open_bracket = true;
                prev_is_operand = false;
                i += 1;
            }
            Token::Close(kind) => {
                if prev_is_open_bracket {
                    return Err(ParseError::EmptyBrackets);
                }
                let mut matched = false;
                while let Some(item) = op_stack.pop() {
                    match item {
                        StackItem::Bracket(open_kind) => {
                            if open_kind == *kind {
                                matched = true;
                            } else {
                                return Err(ParseError::MismatchedBrackets);
                            }
                            break;
                        }
                        StackItem::Op(op) => output.push(PostfixItem::Op(op)),
                    }
                }
                if !matched {
                    return Err(ParseError::UnmatchedCloseBracket);
                }
                prev_is_operand = true;
                prev_is_open_bracket = false;
                i += 1;
            }
            Token::Operator(symbol) => {
                let op = catalog
                    .resolve(symbol, prev_is_operand)
                    .ok_or_else(|| ParseError::InvalidOperator(symbol.clone()))?;

                if op.kind == OperatorKind::Range {
                    let (open_kind, name) = match tokens.get(i + 1..i + 4) {
                        Some(
                            [Token::Open(open_kind), Token::RangeName(name), Token::Close(close_kind)],
                        ) if open_kind == close_kind => (*open_kind, name.clone()),
                        _ => return Err(ParseError::BadRangeCall),
                    };
                    let _ = open_kind;
                    output.push(PostfixItem::Name(name));
                    output.push(PostfixItem::Op(op));
                    prev_is_operand = true;
                    prev_is_open_bracket = false;
                    i += 4;
                    continue;
                }

                while let Some(StackItem::Op(top)) = op_stack.last() {
                    if higher_or_equal_precedence(top, &op) {
                        if let Some(StackItem::Op(top)) = op_stack.pop() {
                            output.push(PostfixItem::Op(top));
                        }
                    } else {
                        break;
                    }
                }
                op_stack.push(StackItem::Op(op));
                prev_is_operand = false;
                prev_is_open_bracket = false;
                i += 1;
            }
            Token::Number(n) => {
                if prev_is_operand {
                    return Err(ParseError::ConsecutiveOperands);
                }
                output.push(PostfixItem::Number(*n));
                prev_is_operand = true;
                prev_is_open_bracket = false;
                i += 1;
            }
            Token::CellName(name) => {
                if prev_is_operand {
                    return Err(ParseError::ConsecutiveOperands);
                }
                output.push(PostfixItem::Name(name.clone()));
                prev_is_operand = true;
                prev_is_open_bracket = false;
                i += 1;
            }
            Token::RangeName(_) => {
                return Err(ParseError::BareRangeName);
            }
        }
    }

    if !prev_is_operand {
        return Err(ParseError::TrailingOperator);
    }

    while let Some(item) = op_stack.pop() {
        match item {
            StackItem::Bracket(_) => return Err(ParseError::UnbalancedBrackets),
            StackItem::Op(op) => output.push(PostfixItem::Op(op)),
        }
    }

    Ok(output)
}

fn build_tree(postfix: Vec<PostfixItem>) -> ParseResult<ExprNode> {
    let mut stack: Vec<ExprNode> = Vec::new();

    for item in postfix {
        match item {
            PostfixItem::Number(n) => stack.push(ExprNode::leaf(NodeValue::Number(n))),
            PostfixItem::Name(s) => stack.push(ExprNode::leaf(NodeValue::Name(s))),
            PostfixItem::Op(op) => match op.kind {
                OperatorKind::Binary => {
                    let right = stack
                        .pop()
                        .ok_or_else(|| ParseError::ArityUnderflow(op.symbol.to_string()))?;
                    let left = stack
                        .pop()
                        .ok_or_else(|| ParseError::ArityUnderflow(op.symbol.to_string()))?;
                    stack.push(ExprNode::binary(op, left, right));
                }
                OperatorKind::Unary | OperatorKind::Range => {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| ParseError::ArityUnderflow(op.symbol.to_string()))?;
                    stack.push(ExprNode::unary(op, operand));
                }
            },
        }
    }

    if stack.len() != 1 {
        return Err(ParseError::IncompleteReduction);
    }
    Ok(stack.pop().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OperatorKind;
    use pretty_assertions::assert_eq;

    fn leaf_number(node: &ExprNode) -> f64 {
        match node.value {
            NodeValue::Number(n) => n,
            _ => panic!("expected number leaf"),
        }
    }

    #[test]
    fn precedence_multiplication_before_addition() {
        let tree = parse("1+2*3").unwrap();
        match &tree.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "+"),
            _ => panic!("expected + at root"),
        }
        let right = tree.right.unwrap();
        match &right.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "*"),
            _ => panic!("expected * on the right"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let tree = parse("2^3^2").unwrap();
        match &tree.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "^"),
            _ => panic!("expected ^ at root"),
        }
        let right = tree.right.as_ref().unwrap();
        match &right.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "^"),
            _ => panic!("^ should nest on the right for right-associativity"),
        }
    }

    #[test]
    fn unary_minus_disambiguation() {
        let tree = parse("-3+4").unwrap();
        match &tree.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "+"),
            _ => panic!("expected + at root"),
        }
        let left = tree.left.unwrap();
        match &left.value {
            NodeValue::Operator(op) => assert_eq!(op.kind, OperatorKind::Unary),
            _ => panic!("expected unary minus on the left"),
        }
    }

    #[test]
    fn binary_minus_after_operand() {
        let tree = parse("5--3").unwrap();
        match &tree.value {
            NodeValue::Operator(op) => assert_eq!(op.kind, OperatorKind::Binary),
            _ => panic!("expected binary - at root"),
        }
        let right = tree.right.unwrap();
        match &right.value {
            NodeValue::Operator(op) => assert_eq!(op.kind, OperatorKind::Unary),
            _ => panic!("expected unary - as the right operand"),
        }
    }

    #[test]
    fn bracket_kinds_are_interchangeable_but_matched() {
        assert!(parse("[1+2]").is_ok());
        assert!(parse("{1+2}").is_ok());
        assert_eq!(parse("[1+2}"), Err(ParseError::MismatchedBrackets));
    }

    #[test]
    fn range_function_call_shape_required() {
        assert!(parse("max(A1:A4)").is_ok());
        assert_eq!(parse("max A1:A4"), Err(ParseError::BareRangeName));
    }

    #[test]
    fn bare_range_name_is_rejected() {
        assert_eq!(parse("A1:A4"), Err(ParseError::BareRangeName));
    }

    #[test]
    fn sin_is_not_fragmented_by_longest_match() {
        let tree = parse("sin(0)").unwrap();
        match &tree.value {
            NodeValue::Operator(op) => assert_eq!(op.symbol, "sin"),
            _ => panic!("expected sin at root"),
        }
        assert_eq!(leaf_number(&tree.right.unwrap()), 0.0);
    }

    #[test]
    fn empty_formula_is_rejected() {
        assert_eq!(parse(""), Err(ParseError::EmptyFormula));
    }

    #[test]
    fn trailing_operator_is_rejected() {
        assert_eq!(parse("1+"), Err(ParseError::TrailingOperator));
    }

    #[test]
    fn consecutive_operands_are_rejected() {
        assert_eq!(parse("1 2"), Err(ParseError::ConsecutiveOperands));
    }

    #[test]
    fn unmatched_close_bracket_is_rejected() {
        assert_eq!(parse("1)"), Err(ParseError::UnmatchedCloseBracket));
    }

    #[test]
    fn unbalanced_open_bracket_is_rejected() {
        assert_eq!(parse("(1+2"), Err(ParseError::UnbalancedBrackets));
    }

    #[test]
    fn empty_brackets_are_rejected() {
        assert_eq!(parse("()"), Err(ParseError::EmptyBrackets));
    }
}
