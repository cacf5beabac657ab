//! FILENAME: cli/src/main.rs
//! PURPOSE: A minimal terminal driver for `SheetEngine`.
//! CONTEXT: The interactive GUI is out of scope; this binary exists so
//! the engine is actually drivable end to end. `--json-file` optionally
//! seeds the sheet on startup; any failure there (missing file, bad
//! JSON shape, a cycle or bad name in the loaded data) exits non-zero
//! before the REPL ever starts.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use engine::{Position, SheetEngine};

#[derive(Parser)]
#[command(name = "sheet")]
#[command(author, version, about = "A small formula-evaluating spreadsheet")]
struct Cli {
    /// JSON file to load the initial sheet from (see persistence crate for format).
    #[arg(long)]
    json_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut engine = SheetEngine::new();

    if let Some(path) = &cli.json_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        persistence::import_json(&mut engine, &contents)
            .with_context(|| format!("failed to load sheet from '{}'", path.display()))?;
    }

    run_repl(&mut engine)
}

/// `set <cell> <raw>`, `get <cell>`, `save <path>`, `quit`.
fn run_repl(engine: &mut SheetEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, ' ');
        let command = parts.next().unwrap_or("");

        match command {
            "quit" | "exit" => break,
            "set" => {
                let Some(cell_name) = parts.next() else {
                    eprintln!("usage: set <cell> <raw content>");
                    continue;
                };
                let raw = parts.next().unwrap_or("");
                match dispatch_set(engine, cell_name, raw) {
                    Ok(()) => {}
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "get" => {
                let Some(cell_name) = parts.next() else {
                    eprintln!("usage: get <cell>");
                    continue;
                };
                match dispatch_get(engine, cell_name) {
                    Ok(text) => println!("{text}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "save" => {
                let Some(path) = parts.next() else {
                    eprintln!("usage: save <path>");
                    continue;
                };
                if let Err(err) = persistence::save(engine, std::path::Path::new(path)) {
                    eprintln!("error: {err}");
                }
            }
            other => eprintln!("unknown command: '{other}' (try set, get, save, quit)"),
        }
    }

    Ok(())
}

fn dispatch_set(engine: &mut SheetEngine, cell_name: &str, raw: &str) -> Result<()> {
    let position = engine::parse_cell_name(cell_name).map_err(engine::EngineError::from)?;
    engine.try_update(position, raw)?;
    Ok(())
}

fn dispatch_get(engine: &SheetEngine, cell_name: &str) -> Result<String> {
    let position: Position = engine::parse_cell_name(cell_name).map_err(engine::EngineError::from)?;
    Ok(engine
        .get_value(position)
        .map(|value| value.display())
        .unwrap_or_default())
}
