//! Structured triangular meshes of the unit square in SU2 format.
//!
//! A grid of `nodes_x` by `nodes_y` nodes is split into two triangles per
//! cell and written with four boundary markers: `lower`, `right`, `upper`
//! and `left`.
//!
//! ```no_run
//! use square_mesh::{config::GridConfig, generate};
//!
//! let summary = generate(&GridConfig::default()).expect("failed to write mesh");
//! assert_eq!(summary.elements, 8);
//! ```

pub mod config;
pub mod datatypes;
pub mod error;
pub mod mesher;
pub mod reader;
pub mod writer;

use indicatif::ProgressBar;

use config::GridConfig;
use datatypes::Mesh;
use error::MeshError;

/// Tolerance on coordinates read back from a written file
const VERIFY_TOLERANCE: f64 = 1e-12;

/// Counts reported after a mesh is written
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSummary {
    pub nodes: usize,
    pub elements: usize,
    pub boundary_edges: usize,
    pub area: f64,
}

impl MeshSummary {
    pub fn of(mesh: &Mesh) -> MeshSummary {
        MeshSummary {
            nodes: mesh.nodes.len(),
            elements: mesh.elements.len(),
            boundary_edges: mesh.markers.iter().map(|m| m.edges.len()).sum(),
            area: mesh.signed_area(),
        }
    }
}

/// Builds the mesh described by `config` and writes it to `config.output`
pub fn generate(config: &GridConfig) -> Result<MeshSummary, MeshError> {
    generate_with_progress(config, false, &ProgressBar::hidden())
}

/// Generates the mesh, then reads the written file back and checks it
/// reproduces what was generated
pub fn generate_and_verify(config: &GridConfig) -> Result<MeshSummary, MeshError> {
    generate_with_progress(config, true, &ProgressBar::hidden())
}

/// Generates the mesh, reporting write progress on a bar owned by the
/// caller
///
/// # Arguments
/// * `config` - The grid configuration
/// * `check` - Read the written file back and verify it
/// * `progress` - Advanced while writing meshes above
///   `writer::PROGRESS_THRESHOLD` data lines
pub fn generate_with_progress(
    config: &GridConfig,
    check: bool,
    progress: &ProgressBar,
) -> Result<MeshSummary, MeshError> {
    let mesh = mesher::run(config)?;
    writer::write_mesh_file(&mesh, config.line_style, &config.output, progress)?;

    let summary = MeshSummary::of(&mesh);
    log::info!(
        "mesh has {} boundary edges, covered area {:.6}",
        summary.boundary_edges,
        summary.area
    );

    if check {
        let written = reader::read_su2(&config.output)?;
        verify(&mesh, &written)?;
        log::info!("verified {}", config.output.display());
    }

    Ok(summary)
}

/// Compares a generated mesh against one read back from disk
///
/// Connectivity and markers must match exactly, coordinates within
/// printing precision.
pub fn verify(expected: &Mesh, written: &Mesh) -> Result<(), MeshError> {
    if expected.nodes.len() != written.nodes.len() {
        return Err(MeshError::Verify(format!(
            "expected {} nodes, file has {}",
            expected.nodes.len(),
            written.nodes.len()
        )));
    }
    if expected.elements != written.elements {
        return Err(MeshError::Verify(
            "element connectivity differs".to_string(),
        ));
    }

    for (i, (a, b)) in std::iter::zip(&expected.nodes, &written.nodes).enumerate() {
        if (a.x - b.x).abs() > VERIFY_TOLERANCE || (a.y - b.y).abs() > VERIFY_TOLERANCE {
            return Err(MeshError::Verify(format!(
                "node {i} moved from ({}, {}) to ({}, {})",
                a.x, a.y, b.x, b.y
            )));
        }
    }

    if expected.markers.len() != written.markers.len() {
        return Err(MeshError::Verify(format!(
            "expected {} markers, file has {}",
            expected.markers.len(),
            written.markers.len()
        )));
    }
    for (a, b) in std::iter::zip(&expected.markers, &written.markers) {
        if a != b {
            return Err(MeshError::Verify(format!("marker {} differs", a.tag)));
        }
    }

    Ok(())
}
