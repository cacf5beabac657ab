//! FILENAME: engine/src/grid.rs
//! PURPOSE: The sparse cell store and its parallel value cache.
//! CONTEXT: Most of a fixed-size sheet is empty, so both maps are sparse
//! `HashMap`s keyed by `Position` rather than dense arrays. Invariant
//! (enforced by the scheduler, not this module): a position present in
//! `CellStore` with non-empty parsed content is always present in
//! `ValueCache`, and a position absent from `CellStore` is absent from
//! `ValueCache`.

use std::collections::HashMap;

use crate::cell::{Cell, Value};
use crate::coord::Position;

/// Sparse storage mapping position to cell. 0-based indices throughout.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    cells: HashMap<Position, Cell>,
}

impl CellStore {
    pub fn new() -> Self {
        CellStore {
            cells: HashMap::new(),
        }
    }

    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }

    pub fn set(&mut self, position: Position, cell: Cell) {
        self.cells.insert(position, cell);
    }

    pub fn remove(&mut self, position: Position) -> Option<Cell> {
        self.cells.remove(&position)
    }

    pub fn get_raw(&self, position: Position) -> Option<&str> {
        self.cells.get(&position).map(|cell| cell.raw.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &Cell)> {
        self.cells.iter()
    }
}

/// Per-sheet cache of a cell's most recently computed value.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    values: HashMap<Position, Value>,
}

impl ValueCache {
    pub fn new() -> Self {
        ValueCache {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, position: Position) -> Option<&Value> {
        self.values.get(&position)
    }

    pub fn set(&mut self, position: Position, value: Value) {
        self.values.insert(position, value);
    }

    pub fn remove(&mut self, position: Position) -> Option<Value> {
        self.values.remove(&position)
    }

    /// Writes every entry of `scratch` into this cache, overwriting
    /// existing entries for the same positions. Used to commit a
    /// transaction's scratch cache on a successful `try_update`.
    pub fn merge(&mut self, scratch: HashMap<Position, Value>) {
        self.values.extend(scratch);
    }
}
