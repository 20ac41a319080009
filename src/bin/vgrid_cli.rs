//! CLI tool for vgrid - lays out a grid description and outputs the frame as JSON
//!
//! Usage:
//!   vgrid_cli <grid.json>              # Output JSON to stdout
//!   vgrid_cli <grid.json> -o out.json  # Output JSON to file
//!
//! The input holds `config`, `columns`, `rows` and a `viewport` with
//! `width`, `height`, `scrollLeft` and `scrollTop`.
//!
//! Layout warnings go to stderr; `RUST_LOG=debug` shows more.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use vgrid::render::CellRenderData;
use vgrid::{Column, GridConfig, NoopHost, RenderPlan, Row, ViewportController};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportInput {
    width: f32,
    height: f32,
    #[serde(default)]
    scroll_left: f32,
    #[serde(default)]
    scroll_top: f32,
}

#[derive(Deserialize)]
struct GridInput {
    #[serde(default)]
    config: GridConfig,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
    viewport: ViewportInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Frame {
    plan: RenderPlan,
    cells: Vec<CellRenderData>,
}

/// Route `log` records from the library to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: vgrid_cli <grid.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let input: GridInput = match serde_json::from_str(&data) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error parsing grid JSON: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = input.config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    // Lay out the frame
    let mut grid = ViewportController::new(input.config, NoopHost);
    grid.set_columns(input.columns);
    grid.set_row_count(input.rows.len());
    grid.resize(input.viewport.width, input.viewport.height);
    grid.handle_scroll(input.viewport.scroll_left, input.viewport.scroll_top);
    let frame = Frame {
        plan: grid.render_plan(),
        cells: grid.visible_cells(&input.rows),
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&frame) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
