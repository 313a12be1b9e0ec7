use nalgebra::matrix;

/// VTK cell identifiers used by SU2 to tag element geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Line = 3,
    Triangle = 5,
}

impl ElementKind {
    pub fn vtk_id(self) -> u8 {
        self as u8
    }

    pub fn from_vtk_id(id: u8) -> Option<ElementKind> {
        match id {
            3 => Some(ElementKind::Line),
            5 => Some(ElementKind::Triangle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// Interior triangle. Node order is counter-clockwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub nodes: [usize; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryEdge {
    pub nodes: [usize; 2],
}

/// A named group of boundary edges
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub tag: String,
    pub edges: Vec<BoundaryEdge>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub nodes: Vec<Vertex>,
    pub elements: Vec<Element>,
    pub markers: Vec<Marker>,
}

impl Mesh {
    /// Looks up a marker by its tag
    pub fn marker(&self, tag: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.tag == tag)
    }

    /// Sum of the signed areas of all elements
    pub fn signed_area(&self) -> f64 {
        self.elements
            .iter()
            .map(|element| compute_element_area(element, &self.nodes))
            .sum()
    }
}

/// Calculates the signed area of the element. Positive when the nodes
/// wind counter-clockwise.
///
/// # Arguments
/// * `element` - The Element to target
/// * `nodes` - A reference to the vector of mesh vertices
pub fn compute_element_area(element: &Element, nodes: &[Vertex]) -> f64 {
    let v0 = &nodes[element.nodes[0]];
    let v1 = &nodes[element.nodes[1]];
    let v2 = &nodes[element.nodes[2]];

    let corners = matrix![
        1.0, v0.x, v0.y;
        1.0, v1.x, v1.y;
        1.0, v2.x, v2.y;
    ];

    0.5 * corners.determinant()
}
