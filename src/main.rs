use std::path::PathBuf;

use clap::Parser;
use indicatif::ProgressBar;
use square_mesh::{
    config::{load_input_file, GridConfig, LeftBoundary, LineStyle},
    error::MeshError,
    writer::PROGRESS_THRESHOLD,
};

/// Writes a structured triangular mesh of the unit square as an SU2 file
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Write mesh to FILE [default: square.su2]
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Number of nodes in the x direction [default: 3]
    #[arg(short = 'n', long = "nodes-x", visible_alias = "nNode", value_name = "NNODE")]
    nodes_x: Option<usize>,

    /// Number of nodes in the y direction [default: 3]
    #[arg(short = 'm', long = "nodes-y", visible_alias = "mNode", value_name = "MNODE")]
    nodes_y: Option<usize>,

    /// JSON input file with grid parameters. Flags take precedence.
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Emit only the two topmost left edges, matching legacy square.su2 files
    #[arg(long)]
    legacy_left: bool,

    /// Layout of data lines
    #[arg(long, value_enum)]
    line_style: Option<LineStyle>,

    /// Read the written file back and check it
    #[arg(long)]
    verify: bool,
}

fn build_config(args: &Args) -> Result<GridConfig, MeshError> {
    let mut config = GridConfig::default();

    if let Some(path) = &args.config {
        let input_json = load_input_file(path)?;
        config.apply_json(&input_json)?;
    }

    if let Some(file) = &args.file {
        config.output = file.clone();
    }
    if let Some(nx) = args.nodes_x {
        config.nodes_x = nx;
    }
    if let Some(ny) = args.nodes_y {
        config.nodes_y = ny;
    }
    if args.legacy_left {
        config.left_boundary = LeftBoundary::Legacy;
    }
    if let Some(style) = args.line_style {
        config.line_style = style;
    }

    Ok(config)
}

fn run(args: &Args) -> Result<(), MeshError> {
    let config = build_config(args)?;

    config.validate()?;
    let bar = if (config.element_count() + config.node_count()) as u64 > PROGRESS_THRESHOLD {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    };
    let summary = square_mesh::generate_with_progress(&config, args.verify, &bar)?;

    println!(
        "wrote {} nodes and {} elements to {}",
        summary.nodes,
        summary.elements,
        config.output.display()
    );

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1)
    }
}
