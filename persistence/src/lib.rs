//! FILENAME: persistence/src/lib.rs
//! PURPOSE: Import and export a sheet's contents to JSON and CSV.
//! CONTEXT: JSON round-trips raw cell input (what the user typed,
//! including a leading `=` for formulas) as a flat `{"A1": "..."}`
//! object — this is the only format that preserves formulas. CSV only
//! ever exports: it's a snapshot of computed values for consumption
//! elsewhere, not a format this crate reads back.

mod error;

pub use error::PersistenceError;

use std::collections::BTreeMap;
use std::io::Write;

use serde_json::Value as JsonValue;

use engine::{position_to_name, Position, SheetEngine, COLUMNS, ROWS};

/// Loads a flat `{"A1": "raw string"}` JSON object into `engine`, one
/// `try_update` per key. Rejects any JSON shape other than an object of
/// string keys to string values.
pub fn import_json(engine: &mut SheetEngine, json: &str) -> Result<(), PersistenceError> {
    let parsed: JsonValue = serde_json::from_str(json)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| PersistenceError::InvalidFormat("top-level JSON value must be an object".to_string()))?;

    for (name, value) in object {
        let raw = value
            .as_str()
            .ok_or_else(|| PersistenceError::InvalidFormat(format!("value for '{name}' is not a string")))?;
        let position = engine::parse_cell_name(name).map_err(engine::EngineError::from)?;
        engine.try_update(position, raw)?;
    }
    Ok(())
}

/// Exports every non-empty cell in `engine` as a flat JSON object keyed
/// by canonical cell name.
pub fn export_json(engine: &SheetEngine) -> Result<String, PersistenceError> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (position, raw) in engine.iter_raw() {
        map.insert(position_to_name(position), raw.to_string());
    }
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Exports a `ROWS` x `COLUMNS` grid of computed display values to CSV,
/// row-major, empty string where no cell exists. Values containing a
/// comma are quoted (handled by the `csv` writer itself).
pub fn export_csv(engine: &SheetEngine) -> Result<String, PersistenceError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    for row in 0..ROWS {
        let mut record = Vec::with_capacity(COLUMNS as usize);
        for col in 0..COLUMNS {
            let position = Position::new(row, col);
            let cell_text = engine.get_value(position).map(|v| v.display()).unwrap_or_default();
            record.push(cell_text);
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    let bytes = writer.into_inner().map_err(|e| PersistenceError::Csv(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Saves `engine` to `path`, choosing the format by extension (`.json`
/// or `.csv`). Any other extension is rejected.
pub fn save(engine: &SheetEngine, path: &std::path::Path) -> Result<(), PersistenceError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let contents = match extension {
        "json" => export_json(engine)?,
        "csv" => export_csv(engine)?,
        other => {
            return Err(PersistenceError::InvalidFormat(format!(
                "unsupported file extension: '{other}'"
            )))
        }
    };
    let mut file = std::fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_raw_content() {
        let mut engine = SheetEngine::new();
        import_json(&mut engine, r#"{"A1": "10", "B1": "=A1*2"}"#).unwrap();
        assert_eq!(engine.get_raw(Position::new(0, 0)), "10");
        assert_eq!(engine.get_raw(Position::new(0, 1)), "=A1*2");

        let exported = export_json(&engine).unwrap();
        let mut other = SheetEngine::new();
        import_json(&mut other, &exported).unwrap();
        assert_eq!(other.get_raw(Position::new(0, 1)), "=A1*2");
        assert_eq!(other.get_value(Position::new(0, 1)), engine.get_value(Position::new(0, 1)));
    }

    #[test]
    fn rejects_non_string_values() {
        let mut engine = SheetEngine::new();
        let result = import_json(&mut engine, r#"{"A1": 10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_object_top_level() {
        let mut engine = SheetEngine::new();
        let result = import_json(&mut engine, "[1, 2, 3]");
        assert!(result.is_err());
    }

    #[test]
    fn csv_export_has_rows_times_columns_rows() {
        let mut engine = SheetEngine::new();
        engine.try_update(Position::new(0, 0), "hello, world").unwrap();
        let csv_text = export_csv(&engine).unwrap();
        let line_count = csv_text.lines().count();
        assert_eq!(line_count as u32, ROWS);
        assert!(csv_text.lines().next().unwrap().contains("\"hello, world\""));
    }

    #[test]
    fn save_json_round_trips_through_a_real_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sheet.json");

        let mut engine = SheetEngine::new();
        engine.try_update(Position::new(0, 0), "10").unwrap();
        engine.try_update(Position::new(0, 1), "=A1*2").unwrap();
        save(&engine, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut reloaded = SheetEngine::new();
        import_json(&mut reloaded, &contents).unwrap();
        assert_eq!(reloaded.get_raw(Position::new(0, 1)), "=A1*2");
        assert_eq!(reloaded.get_value(Position::new(0, 1)), Some(&engine::Value::Number(20.0)));
    }

    #[test]
    fn save_rejects_an_unsupported_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sheet.xlsx");
        let engine = SheetEngine::new();
        assert!(save(&engine, &path).is_err());
        assert!(!path.exists());
    }
}
