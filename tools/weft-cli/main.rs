use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::process::exit;

use weft::prelude::*;

/// JSON interchange shape used by the CLI: the canvas state the surrounding
/// editor page would hold in memory.
#[derive(Serialize, Deserialize)]
struct CanvasFile {
    metadata: WorkflowMetadata,
    graph: WorkflowGraph,
}

/// Workflow graph / YAML codec CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a YAML workflow document and print the canvas JSON on stdout
    Import {
        /// Path to the workflow YAML file
        yaml_path: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Export a canvas JSON file back to workflow YAML on stdout
    Export {
        /// Path to the canvas JSON file (as produced by `import`)
        canvas_path: String,
    },
    /// Round-trip a YAML workflow document and report validation findings
    Check {
        /// Path to the workflow YAML file
        yaml_path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Import { yaml_path, pretty } => run_import(&yaml_path, pretty),
        Command::Export { canvas_path } => run_export(&canvas_path),
        Command::Check { yaml_path } => run_check(&yaml_path),
    }
}

fn run_import(yaml_path: &str, pretty: bool) {
    let imported = import_file(yaml_path);
    for warning in &imported.warnings {
        eprintln!("warning: {warning}");
    }
    let canvas = CanvasFile {
        metadata: imported.metadata,
        graph: imported.graph,
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&canvas)
    } else {
        serde_json::to_string(&canvas)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => exit_with_error(&format!("Failed to serialize canvas JSON: {e}")),
    }
}

fn run_export(canvas_path: &str) {
    let content = fs::read_to_string(canvas_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read canvas file '{canvas_path}': {e}"))
    });
    let canvas: CanvasFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to parse canvas JSON '{canvas_path}': {e}"))
    });
    match export_workflow(&canvas.graph, &canvas.metadata) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => exit_with_error(&format!("Export failed: {e}")),
    }
}

fn run_check(yaml_path: &str) {
    let imported = import_file(yaml_path);
    for warning in &imported.warnings {
        println!("warning: {warning}");
    }
    match export_workflow(&imported.graph, &imported.metadata) {
        Ok(_) => println!(
            "OK: {} nodes, {} edges, {} warning(s)",
            imported.graph.nodes.len(),
            imported.graph.edges.len(),
            imported.warnings.len()
        ),
        Err(e) => exit_with_error(&format!("Validation failed: {e}")),
    }
}

fn import_file(yaml_path: &str) -> ImportedWorkflow {
    let yaml = fs::read_to_string(yaml_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow file '{yaml_path}': {e}"))
    });
    import_workflow(&yaml)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import '{yaml_path}': {e}")))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    exit(1);
}
