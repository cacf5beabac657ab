//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet engine.
//! CONTEXT: Re-exports public types and modules, and exposes `SheetEngine`
//! as the single façade other crates (persistence, cli) talk to — nothing
//! outside this crate touches `CellStore`, `DependencyGraph`, or
//! `ValueCache` directly.

pub mod cell;
pub mod coord;
pub mod dependency_extractor;
pub mod dependency_graph;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod scheduler;

pub use cell::{Cell, Content, Value};
pub use coord::{expand_range, parse_cell_name, position_to_name, CoordError, Position, COLUMNS, ROWS};
pub use dependency_extractor::extract_dependencies;
pub use dependency_graph::{CycleError, DependencyGraph};
pub use error::EngineError;
pub use evaluator::Evaluator;
pub use grid::{CellStore, ValueCache};
pub use scheduler::{try_update, UpdateOutcome};

/// The public entry point: a fixed `ROWS` x `COLUMNS` sheet with its
/// store, dependency graph, and value cache kept consistent by
/// `try_update`.
#[derive(Debug, Clone, Default)]
pub struct SheetEngine {
    store: CellStore,
    graph: DependencyGraph,
    cache: ValueCache,
}

impl SheetEngine {
    pub fn new() -> Self {
        SheetEngine {
            store: CellStore::new(),
            graph: DependencyGraph::new(),
            cache: ValueCache::new(),
        }
    }

    /// The raw string the user typed for `position`, or `""` if empty.
    pub fn get_raw(&self, position: Position) -> &str {
        self.store.get_raw(position).unwrap_or("")
    }

    /// The last computed value at `position`, if any.
    pub fn get_value(&self, position: Position) -> Option<&Value> {
        self.cache.get(position)
    }

    /// Attempts to set `position`'s content to `raw`. Returns every
    /// position whose value changed. On error the sheet is unchanged.
    pub fn try_update(&mut self, position: Position, raw: &str) -> Result<UpdateOutcome, EngineError> {
        scheduler::try_update(&mut self.store, &mut self.graph, &mut self.cache, position, raw)
    }

    /// Iterates every non-empty cell as `(position, raw content)`.
    pub fn iter_raw(&self) -> impl Iterator<Item = (Position, &str)> {
        self.store.iter().map(|(&position, cell)| (position, cell.raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_round_trips_a_formula() {
        let mut engine = SheetEngine::new();
        engine.try_update(Position::new(0, 0), "10").unwrap();
        engine.try_update(Position::new(0, 1), "=A1*2").unwrap();
        assert_eq!(engine.get_value(Position::new(0, 1)), Some(&Value::Number(20.0)));
        assert_eq!(engine.get_raw(Position::new(0, 1)), "=A1*2");
    }

    #[test]
    fn rejected_update_leaves_value_untouched() {
        let mut engine = SheetEngine::new();
        engine.try_update(Position::new(0, 0), "10").unwrap();
        let result = engine.try_update(Position::new(0, 0), "=1/0");
        assert!(result.is_err());
        assert_eq!(engine.get_value(Position::new(0, 0)), Some(&Value::Number(10.0)));
    }
}
