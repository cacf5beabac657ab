//! FILENAME: engine/src/scheduler.rs
//! PURPOSE: The `try_update` transaction — the only way a cell's content
//! changes.
//! CONTEXT: Parses the new content, tentatively rewrites a cloned
//! dependency graph, checks the whole graph for cycles, and only then
//! evaluates. Nothing in `CellStore`, `DependencyGraph`, or `ValueCache`
//! is mutated until every check has passed; an aborted update leaves the
//! sheet exactly as it was.

use std::collections::HashMap;

use log::debug;
use parser::parse;

use crate::cell::{Cell, Content, Value};
use crate::coord::{position_to_name, Position};
use crate::dependency_extractor::extract_dependencies;
use crate::dependency_graph::DependencyGraph;
use crate::error::EngineError;
use crate::evaluator::Evaluator;
use crate::grid::{CellStore, ValueCache};

/// The effect of a successful `try_update`: every position whose value
/// changed as a result, including `position` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub changed: Vec<Position>,
}

fn classify(raw: &str) -> Result<Content, EngineError> {
    if raw.is_empty() {
        return Ok(Content::Empty);
    }
    if let Ok(n) = raw.parse::<f64>() {
        return Ok(Content::Number(n));
    }
    if let Some(formula) = raw.strip_prefix('=') {
        let tree = parse(formula)?;
        return Ok(Content::Formula(tree));
    }
    Ok(Content::String(raw.to_string()))
}

/// Attempts to set `position`'s raw content to `raw`, validating,
/// re-evaluating, and committing atomically. On any failure the sheet
/// is left entirely unchanged.
pub fn try_update(
    store: &mut CellStore,
    graph: &mut DependencyGraph,
    cache: &mut ValueCache,
    position: Position,
    raw: &str,
) -> Result<UpdateOutcome, EngineError> {
    let content = classify(raw)?;

    if matches!(content, Content::Empty) {
        return try_delete(store, graph, cache, position);
    }

    let new_deps = extract_dependencies(&content)?;

    let mut tentative_graph = graph.clone();
    tentative_graph.remove_out_edges(position);
    tentative_graph.add_edges(position, new_deps.iter().copied());
    tentative_graph.prune_isolates();

    if tentative_graph.topological_order().is_err() {
        debug!("update at {position:?} aborted: would introduce a circular dependency");
        return Err(EngineError::CircularDependencies);
    }

    let dependents_in_order = reverse_topological_dependents(&tentative_graph, position);

    let mut scratch: HashMap<Position, Value> = HashMap::new();
    let new_cell = Cell::new(raw.to_string(), content.clone());

    let mut tentative_store = store.clone();
    tentative_store.set(position, new_cell.clone());

    {
        let evaluator = Evaluator::new(&tentative_store, cache);
        let value = match evaluator.evaluate_content(&content, &mut scratch) {
            Ok(value) => value,
            Err(err) => {
                debug!("update at {position:?} aborted: {err}");
                return Err(err);
            }
        };
        scratch.insert(position, value);

        for dependent in &dependents_in_order {
            let cell = tentative_store
                .get(*dependent)
                .expect("dependent position always has a stored cell");
            match evaluator.evaluate_content(&cell.parsed, &mut scratch) {
                Ok(value) => {
                    scratch.insert(*dependent, value);
                }
                Err(err) => {
                    debug!("update at {position:?} aborted re-evaluating {dependent:?}: {err}");
                    return Err(err);
                }
            }
        }
    }

    store.set(position, new_cell);
    *graph = tentative_graph;
    let mut changed = Vec::with_capacity(1 + dependents_in_order.len());
    changed.push(position);
    changed.extend(dependents_in_order);
    cache.merge(scratch);

    Ok(UpdateOutcome { changed })
}

/// Empty-content short-circuit: a position with live dependents can't be
/// deleted out from under them, so this fails without touching anything
/// rather than leaving those dependents referencing a cell that no
/// longer exists.
fn try_delete(
    store: &mut CellStore,
    graph: &mut DependencyGraph,
    cache: &mut ValueCache,
    position: Position,
) -> Result<UpdateOutcome, EngineError> {
    if !graph.in_edges(position).is_empty() {
        debug!("delete at {position:?} aborted: still has dependents");
        return Err(EngineError::EvaluationError(format!(
            "cannot delete {}: other cells still depend on it",
            position_to_name(position)
        )));
    }

    store.remove(position);
    cache.remove(position);
    graph.remove_out_edges(position);
    graph.prune_isolates();

    Ok(UpdateOutcome { changed: Vec::new() })
}

/// `position`'s transitive dependents, ordered so that each one is
/// re-evaluated only after everything it itself depends on.
fn reverse_topological_dependents(graph: &DependencyGraph, position: Position) -> Vec<Position> {
    let affected = graph.descendants_in_reverse(position);
    match graph.topological_order() {
        Ok(order) => order.into_iter().filter(|p| affected.contains(p)).collect(),
        Err(_) => affected.into_iter().collect(),
    }
}
