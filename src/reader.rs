use std::path::Path;

use crate::{
    datatypes::{BoundaryEdge, Element, ElementKind, Marker, Mesh, Vertex},
    error::MeshError,
};

/// Non-comment lines of a mesh file, paired with 1-based line numbers
struct MeshLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> MeshLines<'a> {
    fn new(contents: &'a str) -> MeshLines<'a> {
        MeshLines {
            inner: contents.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (i, line) in self.inner.by_ref() {
            self.last_line = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            return Some((i + 1, line));
        }
        None
    }

    fn expect_line(&mut self, what: &str) -> Result<(usize, &'a str), MeshError> {
        match self.next_line() {
            Some(l) => Ok(l),
            None => Err(MeshError::parse(
                self.last_line,
                format!("unexpected end of file, expected {what}"),
            )),
        }
    }

    /// Reads a `KEY= value` line and checks the key
    fn expect_keyword(&mut self, key: &str) -> Result<(usize, &'a str), MeshError> {
        let (line_no, line) = self.expect_line(key)?;
        match split_keyword(line) {
            Some((k, value)) if k == key => Ok((line_no, value)),
            _ => Err(MeshError::parse(
                line_no,
                format!("expected {key}=, found '{line}'"),
            )),
        }
    }
}

fn split_keyword(line: &str) -> Option<(&str, &str)> {
    line.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
}

fn parse_count(line_no: usize, key: &str, value: &str) -> Result<usize, MeshError> {
    value
        .parse()
        .map_err(|_| MeshError::parse(line_no, format!("{key} expects a count, found '{value}'")))
}

fn parse_field<T: std::str::FromStr>(
    line_no: usize,
    field: Option<&str>,
    what: &str,
) -> Result<T, MeshError> {
    match field {
        Some(f) => f
            .parse()
            .map_err(|_| MeshError::parse(line_no, format!("invalid {what} '{f}'"))),
        None => Err(MeshError::parse(line_no, format!("missing {what}"))),
    }
}

/// Parses the element type tag at the start of a data line
fn parse_kind(line_no: usize, field: Option<&str>, expected: ElementKind) -> Result<(), MeshError> {
    let id: u8 = parse_field(line_no, field, "element type")?;
    match ElementKind::from_vtk_id(id) {
        Some(kind) if kind == expected => Ok(()),
        _ => Err(MeshError::parse(
            line_no,
            format!(
                "unsupported element type {id}, expected {}",
                expected.vtk_id()
            ),
        )),
    }
}

/// Checks the optional trailing index of a data line
fn check_index(line_no: usize, field: Option<&str>, expected: usize) -> Result<(), MeshError> {
    if field.is_none() {
        return Ok(());
    }
    let index: usize = parse_field(line_no, field, "index")?;
    if index != expected {
        return Err(MeshError::parse(
            line_no,
            format!("index {index} out of order, expected {expected}"),
        ));
    }
    Ok(())
}

/// Parses SU2 mesh text into a Mesh
///
/// Accepts both tab and space separated data lines. Element and node
/// lines may omit their trailing index.
///
/// # Arguments
/// * `contents` - The full text of the mesh file
pub fn parse_su2(contents: &str) -> Result<Mesh, MeshError> {
    let mut lines = MeshLines::new(contents);
    let mut mesh = Mesh::default();

    // (line number, node index) of every connectivity reference
    let mut references: Vec<(usize, usize)> = Vec::new();

    let (line_no, value) = lines.expect_keyword("NDIME")?;
    if parse_count(line_no, "NDIME", value)? != 2 {
        return Err(MeshError::parse(
            line_no,
            format!("only 2D meshes are supported, found NDIME= {value}"),
        ));
    }

    let (line_no, value) = lines.expect_keyword("NELEM")?;
    let num_elements = parse_count(line_no, "NELEM", value)?;
    mesh.elements.reserve(num_elements);
    for i in 0..num_elements {
        let (line_no, line) = lines.expect_line("element")?;
        let mut fields = line.split_whitespace();

        parse_kind(line_no, fields.next(), ElementKind::Triangle)?;
        let mut nodes = [0usize; 3];
        for node in nodes.iter_mut() {
            *node = parse_field(line_no, fields.next(), "node index")?;
            references.push((line_no, *node));
        }
        check_index(line_no, fields.next(), i)?;

        mesh.elements.push(Element { nodes });
    }

    let (line_no, value) = lines.expect_keyword("NPOIN")?;
    let num_nodes = parse_count(line_no, "NPOIN", value)?;
    mesh.nodes.reserve(num_nodes);
    for i in 0..num_nodes {
        let (line_no, line) = lines.expect_line("node")?;
        let mut fields = line.split_whitespace();

        let x: f64 = parse_field(line_no, fields.next(), "x coordinate")?;
        let y: f64 = parse_field(line_no, fields.next(), "y coordinate")?;
        check_index(line_no, fields.next(), i)?;

        mesh.nodes.push(Vertex { x, y });
    }

    let (line_no, value) = lines.expect_keyword("NMARK")?;
    let num_markers = parse_count(line_no, "NMARK", value)?;
    for _ in 0..num_markers {
        let (line_no, tag) = lines.expect_keyword("MARKER_TAG")?;
        if tag.is_empty() {
            return Err(MeshError::parse(line_no, "MARKER_TAG has an empty name"));
        }
        let (line_no, value) = lines.expect_keyword("MARKER_ELEMS")?;
        let num_edges = parse_count(line_no, "MARKER_ELEMS", value)?;

        let mut edges: Vec<BoundaryEdge> = Vec::with_capacity(num_edges);
        for _ in 0..num_edges {
            let (line_no, line) = lines.expect_line("boundary element")?;
            let mut fields = line.split_whitespace();

            parse_kind(line_no, fields.next(), ElementKind::Line)?;
            let mut nodes = [0usize; 2];
            for node in nodes.iter_mut() {
                *node = parse_field(line_no, fields.next(), "node index")?;
                references.push((line_no, *node));
            }
            if let Some(extra) = fields.next() {
                return Err(MeshError::parse(
                    line_no,
                    format!("unexpected field '{extra}' after boundary element nodes"),
                ));
            }

            edges.push(BoundaryEdge { nodes });
        }

        mesh.markers.push(Marker {
            tag: tag.to_string(),
            edges,
        });
    }

    if let Some((line_no, line)) = lines.next_line() {
        return Err(MeshError::parse(
            line_no,
            format!("unexpected trailing content '{line}'"),
        ));
    }

    if let Some((line_no, node)) = references.iter().find(|(_, n)| *n >= mesh.nodes.len()) {
        return Err(MeshError::parse(
            *line_no,
            format!(
                "node index {node} out of range for {} nodes",
                mesh.nodes.len()
            ),
        ));
    }

    Ok(mesh)
}

/// Reads an SU2 mesh file
///
/// # Arguments
/// * `path` - Path to the mesh file
pub fn read_su2(path: &Path) -> Result<Mesh, MeshError> {
    let contents = std::fs::read_to_string(path).map_err(|err| MeshError::io(path, err))?;
    let mesh = parse_su2(&contents)?;

    log::debug!(
        "loaded {} nodes, {} elements and {} markers from {}",
        mesh.nodes.len(),
        mesh.elements.len(),
        mesh.markers.len(),
        path.display()
    );

    Ok(mesh)
}
