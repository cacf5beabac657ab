//! FILENAME: engine/src/dependency_extractor.rs
//! PURPOSE: Walks a parsed cell's expression tree to find every position
//! it reads.
//! CONTEXT: Pre-order traversal over `ExprNode`, collecting every
//! string-valued leaf. A leaf containing `:` is a range name and expands
//! to a set of positions; any other string leaf is a single cell name.

use std::collections::HashSet;

use parser::NodeValue;

use crate::cell::Content;
use crate::coord::{expand_range, parse_cell_name, Position};
use crate::error::EngineError;

/// Collects every position `content`'s formula reads. Returns an empty
/// set for non-formula content.
pub fn extract_dependencies(content: &Content) -> Result<HashSet<Position>, EngineError> {
    let Content::Formula(tree) = content else {
        return Ok(HashSet::new());
    };

    let mut deps = HashSet::new();
    let mut first_error: Option<EngineError> = None;

    tree.preorder(&mut |node| {
        if first_error.is_some() {
            return;
        }
        let NodeValue::Name(name) = &node.value else {
            return;
        };
        let result = if name.contains(':') {
            expand_range(name).map(|positions| deps.extend(positions))
        } else {
            parse_cell_name(name).map(|position| {
                deps.insert(position);
            })
        };
        if let Err(err) = result {
            first_error = Some(err.into());
        }
    });

    match first_error {
        Some(err) => Err(err),
        None => Ok(deps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse;

    fn formula(src: &str) -> Content {
        Content::Formula(parse(src).unwrap())
    }

    #[test]
    fn collects_a_single_cell_reference() {
        let deps = extract_dependencies(&formula("A1+1")).unwrap();
        assert_eq!(deps, [Position::new(0, 0)].into_iter().collect());
    }

    #[test]
    fn expands_a_range_reference() {
        let deps = extract_dependencies(&formula("sum(A1:A3)")).unwrap();
        assert_eq!(
            deps,
            [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn literal_content_has_no_dependencies() {
        assert!(extract_dependencies(&Content::Number(1.0)).unwrap().is_empty());
    }

    #[test]
    fn out_of_bounds_reference_fails() {
        assert!(extract_dependencies(&formula("ZZ9999+1")).is_err());
    }
}
