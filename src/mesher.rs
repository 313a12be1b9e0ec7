use crate::{
    config::{GridConfig, LeftBoundary},
    datatypes::{BoundaryEdge, Element, Marker, Mesh, Vertex},
    error::MeshError,
};

pub const MARKER_TAGS: [&str; 4] = ["lower", "right", "upper", "left"];

/// Splits every grid cell into two counter-clockwise triangles
///
/// Cells are visited row by row; within a cell the triangle touching the
/// bottom-left corner comes first. The resulting order is what downstream
/// consumers see as element indices, so it must not change.
///
/// # Arguments
/// * `nodes_x` - Number of nodes along the x axis, at least 2
/// * `nodes_y` - Number of nodes along the y axis, at least 2
pub fn triangulate(nodes_x: usize, nodes_y: usize) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::with_capacity(2 * (nodes_x - 1) * (nodes_y - 1));

    for j in 0..nodes_y - 1 {
        for i in 0..nodes_x - 1 {
            let bottom_left = j * nodes_x + i;
            let bottom_right = bottom_left + 1;
            let top_left = (j + 1) * nodes_x + i;
            let top_right = top_left + 1;

            elements.push(Element {
                nodes: [bottom_left, bottom_right, top_left],
            });
            elements.push(Element {
                nodes: [bottom_right, top_right, top_left],
            });
        }
    }

    elements
}

/// Places nodes on the unit square in row-major order
///
/// # Arguments
/// * `nodes_x` - Number of nodes along the x axis, at least 2
/// * `nodes_y` - Number of nodes along the y axis, at least 2
pub fn coordinates(nodes_x: usize, nodes_y: usize) -> Vec<Vertex> {
    let mut vertices: Vec<Vertex> = Vec::with_capacity(nodes_x * nodes_y);

    for j in 0..nodes_y {
        for i in 0..nodes_x {
            vertices.push(Vertex {
                x: i as f64 / (nodes_x - 1) as f64,
                y: j as f64 / (nodes_y - 1) as f64,
            });
        }
    }

    vertices
}

fn lower_edges(nodes_x: usize) -> Vec<BoundaryEdge> {
    (0..nodes_x - 1)
        .map(|i| BoundaryEdge { nodes: [i, i + 1] })
        .collect()
}

fn right_edges(nodes_x: usize, nodes_y: usize) -> Vec<BoundaryEdge> {
    let last_col = nodes_x - 1;
    (0..nodes_y - 1)
        .map(|j| BoundaryEdge {
            nodes: [j * nodes_x + last_col, (j + 1) * nodes_x + last_col],
        })
        .collect()
}

fn upper_edges(nodes_x: usize, nodes_y: usize) -> Vec<BoundaryEdge> {
    let last = nodes_x * nodes_y - 1;
    (0..nodes_x - 1)
        .map(|i| BoundaryEdge {
            nodes: [last - i, last - i - 1],
        })
        .collect()
}

fn left_edges(nodes_x: usize, nodes_y: usize, mode: LeftBoundary) -> Vec<BoundaryEdge> {
    let rows = match mode {
        LeftBoundary::Full => nodes_y - 1,
        // legacy files carry the two topmost rows only, never below row 0
        LeftBoundary::Legacy => usize::min(2, nodes_y - 1),
    };

    (0..nodes_y - 1)
        .rev()
        .take(rows)
        .map(|j| BoundaryEdge {
            nodes: [(j + 1) * nodes_x, j * nodes_x],
        })
        .collect()
}

/// Builds the four boundary markers, in file order
///
/// # Arguments
/// * `config` - The validated grid configuration
pub fn boundary_markers(config: &GridConfig) -> Vec<Marker> {
    let (nx, ny) = (config.nodes_x, config.nodes_y);

    let edges = [
        lower_edges(nx),
        right_edges(nx, ny),
        upper_edges(nx, ny),
        left_edges(nx, ny, config.left_boundary),
    ];

    std::iter::zip(MARKER_TAGS, edges)
        .map(|(tag, edges)| Marker {
            tag: tag.to_string(),
            edges,
        })
        .collect()
}

/// Runs the mesher
///
/// # Arguments
/// * `config` - The grid configuration. Validated before anything is built.
///
/// # Returns
/// The complete mesh: nodes, elements and boundary markers
pub fn run(config: &GridConfig) -> Result<Mesh, MeshError> {
    config.validate()?;

    let mesh = Mesh {
        nodes: coordinates(config.nodes_x, config.nodes_y),
        elements: triangulate(config.nodes_x, config.nodes_y),
        markers: boundary_markers(config),
    };

    if config.left_boundary == LeftBoundary::Legacy && config.nodes_y > 3 {
        log::warn!(
            "legacy left boundary covers 2 of {} left edges",
            config.cells_y()
        );
    }

    log::info!(
        "built {} nodes and {} elements on a {}x{} grid",
        mesh.nodes.len(),
        mesh.elements.len(),
        config.nodes_x,
        config.nodes_y
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(nodes_x: usize, nodes_y: usize, left_boundary: LeftBoundary) -> GridConfig {
        GridConfig {
            nodes_x,
            nodes_y,
            left_boundary,
            ..GridConfig::default()
        }
    }

    fn edge_list(marker: &Marker) -> Vec<[usize; 2]> {
        marker.edges.iter().map(|e| e.nodes).collect()
    }

    #[test]
    fn test_triangulate_3x3() {
        let elements = triangulate(3, 3);
        let nodes: Vec<[usize; 3]> = elements.iter().map(|e| e.nodes).collect();

        assert_eq!(
            nodes,
            vec![
                [0, 1, 3],
                [1, 4, 3],
                [1, 2, 4],
                [2, 5, 4],
                [3, 4, 6],
                [4, 7, 6],
                [4, 5, 7],
                [5, 8, 7],
            ]
        );
    }

    #[test]
    fn test_counts_scale_with_grid() {
        for (nx, ny) in [(2, 2), (3, 3), (4, 2), (2, 5), (7, 4)] {
            let mesh = run(&grid(nx, ny, LeftBoundary::Full)).unwrap();

            assert_eq!(mesh.elements.len(), 2 * (nx - 1) * (ny - 1));
            assert_eq!(mesh.nodes.len(), nx * ny);
            assert_eq!(mesh.marker("lower").unwrap().edges.len(), nx - 1);
            assert_eq!(mesh.marker("right").unwrap().edges.len(), ny - 1);
            assert_eq!(mesh.marker("upper").unwrap().edges.len(), nx - 1);
            assert_eq!(mesh.marker("left").unwrap().edges.len(), ny - 1);

            let in_range = |n: &usize| *n < nx * ny;
            assert!(mesh.elements.iter().flat_map(|e| e.nodes.iter()).all(in_range));
            assert!(mesh
                .markers
                .iter()
                .flat_map(|m| m.edges.iter())
                .flat_map(|e| e.nodes.iter())
                .all(in_range));
        }
    }

    #[test]
    fn test_corner_coordinates() {
        let (nx, ny) = (5, 4);
        let nodes = coordinates(nx, ny);

        assert_eq!(nodes[0], Vertex { x: 0.0, y: 0.0 });
        assert_eq!(nodes[nx - 1], Vertex { x: 1.0, y: 0.0 });
        assert_eq!(nodes[(ny - 1) * nx], Vertex { x: 0.0, y: 1.0 });
        assert_eq!(nodes[nx * ny - 1], Vertex { x: 1.0, y: 1.0 });
        assert_relative_eq!(nodes[6].x, 0.25);
        assert_relative_eq!(nodes[6].y, 1.0 / 3.0);
    }

    #[test]
    fn test_markers_3x3() {
        let markers = boundary_markers(&grid(3, 3, LeftBoundary::Full));
        let tags: Vec<&str> = markers.iter().map(|m| m.tag.as_str()).collect();

        assert_eq!(tags, MARKER_TAGS);
        assert_eq!(edge_list(&markers[0]), vec![[0, 1], [1, 2]]);
        assert_eq!(edge_list(&markers[1]), vec![[2, 5], [5, 8]]);
        assert_eq!(edge_list(&markers[2]), vec![[8, 7], [7, 6]]);
        assert_eq!(edge_list(&markers[3]), vec![[6, 3], [3, 0]]);
    }

    #[test]
    fn test_left_modes_agree_on_3x3() {
        let full = boundary_markers(&grid(3, 3, LeftBoundary::Full));
        let legacy = boundary_markers(&grid(3, 3, LeftBoundary::Legacy));
        assert_eq!(full, legacy);
    }

    #[test]
    fn test_legacy_left_stops_after_two_rows() {
        let markers = boundary_markers(&grid(3, 6, LeftBoundary::Legacy));
        assert_eq!(edge_list(&markers[3]), vec![[15, 12], [12, 9]]);

        let markers = boundary_markers(&grid(3, 6, LeftBoundary::Full));
        assert_eq!(
            edge_list(&markers[3]),
            vec![[15, 12], [12, 9], [9, 6], [6, 3], [3, 0]]
        );
    }

    #[test]
    fn test_legacy_left_single_row() {
        let markers = boundary_markers(&grid(4, 2, LeftBoundary::Legacy));
        assert_eq!(edge_list(&markers[3]), vec![[4, 0]]);
    }

    #[test]
    fn test_elements_cover_unit_square() {
        let mesh = run(&grid(6, 9, LeftBoundary::Full)).unwrap();

        assert_relative_eq!(mesh.signed_area(), 1.0, epsilon = 1e-12);
        for element in &mesh.elements {
            assert!(crate::datatypes::compute_element_area(element, &mesh.nodes) > 0.0);
        }
    }

    #[test]
    fn test_run_rejects_degenerate_grid() {
        let result = run(&grid(1, 3, LeftBoundary::Full));
        assert!(matches!(result, Err(MeshError::Input(_))));
    }
}
