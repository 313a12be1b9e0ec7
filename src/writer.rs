use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::ProgressBar;

use crate::{
    config::LineStyle,
    datatypes::{ElementKind, Mesh},
    error::MeshError,
};

/// Significant digits of coordinates in the tabbed style
pub const COORDINATE_PRECISION: usize = 15;

/// Meshes with more lines than this advance the caller's progress bar
pub const PROGRESS_THRESHOLD: u64 = 100_000;

impl LineStyle {
    fn separator(self) -> &'static str {
        match self {
            LineStyle::Tabbed => "\t",
            LineStyle::Spaced => " \t ",
        }
    }

    fn coordinate(self, value: f64) -> String {
        match self {
            LineStyle::Tabbed => format_significant(value, COORDINATE_PRECISION),
            LineStyle::Spaced => format!("{:15.14}", value),
        }
    }
}

/// Formats a float the way a C++ stream does with `precision(n)`: the
/// shorter of fixed and scientific notation, trailing zeros removed.
///
/// # Arguments
/// * `value` - The value to print
/// * `precision` - Number of significant digits, at least 1
pub fn format_significant(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let precision = precision.max(1);

    // round first so the exponent reflects carries like 9.99.. -> 10
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Serializes a mesh in SU2 format
///
/// # Arguments
/// * `mesh` - The mesh to serialize
/// * `style` - Separator and coordinate style of data lines
/// * `out` - Destination stream
/// * `bar` - Progress bar advanced once per data line
pub fn write_su2<W: Write>(
    mesh: &Mesh,
    style: LineStyle,
    out: &mut W,
    bar: &ProgressBar,
) -> std::io::Result<()> {
    let sep = style.separator();

    writeln!(out, "%")?;
    writeln!(out, "% Problem dimension")?;
    writeln!(out, "%")?;
    writeln!(out, "NDIME= 2")?;

    writeln!(out, "%")?;
    writeln!(out, "% Inner element connectivity")?;
    writeln!(out, "%")?;
    writeln!(out, "NELEM= {}", mesh.elements.len())?;
    let triangle = ElementKind::Triangle.vtk_id();
    for (i, element) in mesh.elements.iter().enumerate() {
        let [n0, n1, n2] = element.nodes;
        writeln!(out, "{triangle}{sep}{n0}{sep}{n1}{sep}{n2}{sep}{i}")?;
        bar.inc(1);
    }

    writeln!(out, "%")?;
    writeln!(out, "% Node coordinates")?;
    writeln!(out, "%")?;
    writeln!(out, "NPOIN= {}", mesh.nodes.len())?;
    for (i, vertex) in mesh.nodes.iter().enumerate() {
        writeln!(
            out,
            "{x}{sep}{y}{sep}{i}",
            x = style.coordinate(vertex.x),
            y = style.coordinate(vertex.y)
        )?;
        bar.inc(1);
    }

    writeln!(out, "%")?;
    writeln!(out, "% Boundary elements")?;
    writeln!(out, "%")?;
    writeln!(out, "NMARK= {}", mesh.markers.len())?;
    let line = ElementKind::Line.vtk_id();
    for marker in &mesh.markers {
        writeln!(out, "MARKER_TAG= {}", marker.tag)?;
        writeln!(out, "MARKER_ELEMS= {}", marker.edges.len())?;
        for edge in &marker.edges {
            let [n0, n1] = edge.nodes;
            writeln!(out, "{line}{sep}{n0}{sep}{n1}")?;
            bar.inc(1);
        }
    }

    Ok(())
}

/// Writes a mesh to a file, creating or truncating it
///
/// # Arguments
/// * `mesh` - The mesh to write
/// * `style` - Separator and coordinate style of data lines
/// * `path` - Output file path
/// * `progress` - Bar owned by the caller. Only used above
///   `PROGRESS_THRESHOLD` data lines; library callers pass a hidden bar.
pub fn write_mesh_file(
    mesh: &Mesh,
    style: LineStyle,
    path: &Path,
    progress: &ProgressBar,
) -> Result<(), MeshError> {
    let file = File::create(path).map_err(|err| MeshError::io(path, err))?;
    let mut writer = BufWriter::new(file);

    let total_lines = data_line_count(mesh);
    let hidden = ProgressBar::hidden();
    let bar = if total_lines > PROGRESS_THRESHOLD {
        progress.set_length(total_lines);
        progress
    } else {
        &hidden
    };

    write_su2(mesh, style, &mut writer, bar).map_err(|err| MeshError::io(path, err))?;
    writer.flush().map_err(|err| MeshError::io(path, err))?;
    bar.finish_and_clear();

    log::info!("wrote mesh to {}", path.display());

    Ok(())
}

/// Number of element, node and boundary edge lines in the file
fn data_line_count(mesh: &Mesh) -> u64 {
    (mesh.elements.len()
        + mesh.nodes.len()
        + mesh.markers.iter().map(|m| m.edges.len()).sum::<usize>()) as u64
}
