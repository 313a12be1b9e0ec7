use std::path::{Path, PathBuf};

use clap::ValueEnum;
use json::JsonValue;

use crate::error::MeshError;

pub const DEFAULT_NODES_X: usize = 3;
pub const DEFAULT_NODES_Y: usize = 3;
pub const DEFAULT_OUTPUT: &str = "square.su2";

/// Which rows of the left column receive boundary edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftBoundary {
    /// Every row, top to bottom
    #[default]
    Full,
    /// Only the two topmost rows, matching legacy square.su2 files
    Legacy,
}

/// Field separators and coordinate formatting of emitted lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LineStyle {
    /// Tab separated, coordinates with 15 significant digits
    #[default]
    Tabbed,
    /// Space-tab-space separated, coordinates fixed to 14 decimals
    Spaced,
}

impl LineStyle {
    fn from_name(name: &str) -> Option<LineStyle> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tabbed" => Some(LineStyle::Tabbed),
            "spaced" => Some(LineStyle::Spaced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub nodes_x: usize,
    pub nodes_y: usize,
    pub output: PathBuf,
    pub left_boundary: LeftBoundary,
    pub line_style: LineStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            nodes_x: DEFAULT_NODES_X,
            nodes_y: DEFAULT_NODES_Y,
            output: PathBuf::from(DEFAULT_OUTPUT),
            left_boundary: LeftBoundary::default(),
            line_style: LineStyle::default(),
        }
    }
}

impl GridConfig {
    /// Rejects grids that would divide by zero when placing nodes
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.nodes_x < 2 {
            return Err(MeshError::Input(format!(
                "invalid grid dimension: nodes_x must be at least 2, got {}",
                self.nodes_x
            )));
        }
        if self.nodes_y < 2 {
            return Err(MeshError::Input(format!(
                "invalid grid dimension: nodes_y must be at least 2, got {}",
                self.nodes_y
            )));
        }
        if self.nodes_x.checked_mul(self.nodes_y).is_none() {
            return Err(MeshError::Input(format!(
                "invalid grid dimension: {} x {} nodes overflows",
                self.nodes_x, self.nodes_y
            )));
        }

        Ok(())
    }

    pub fn cells_x(&self) -> usize {
        self.nodes_x - 1
    }

    pub fn cells_y(&self) -> usize {
        self.nodes_y - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes_x * self.nodes_y
    }

    pub fn element_count(&self) -> usize {
        2 * self.cells_x() * self.cells_y()
    }

    /// Overwrites fields with the values present in a parsed input file
    ///
    /// # Arguments
    /// * `input_json` - The input file as a JsonValue object
    pub fn apply_json(&mut self, input_json: &JsonValue) -> Result<(), MeshError> {
        if !input_json.is_object() {
            return Err(MeshError::Input(
                "Input json must be an object".to_string(),
            ));
        }

        if input_json.has_key("nodes_x") {
            self.nodes_x = parse_dimension(input_json, "nodes_x")?;
        }
        if input_json.has_key("nodes_y") {
            self.nodes_y = parse_dimension(input_json, "nodes_y")?;
        }
        if input_json.has_key("output") {
            let output = match input_json["output"].as_str() {
                Some(o) => o,
                None => {
                    return Err(MeshError::Input(
                        "Input json field output must be a string".to_string(),
                    ))
                }
            };
            self.output = PathBuf::from(output);
        }
        if input_json.has_key("legacy_left") {
            let legacy = match input_json["legacy_left"].as_bool() {
                Some(b) => b,
                None => {
                    return Err(MeshError::Input(
                        "Input json field legacy_left must be a boolean".to_string(),
                    ))
                }
            };
            self.left_boundary = if legacy {
                LeftBoundary::Legacy
            } else {
                LeftBoundary::Full
            };
        }
        if input_json.has_key("line_style") {
            let style = input_json["line_style"].as_str().and_then(LineStyle::from_name);
            self.line_style = match style {
                Some(s) => s,
                None => {
                    return Err(MeshError::Input(format!(
                        "Input json field line_style must be \"tabbed\" or \"spaced\", got {}",
                        input_json["line_style"].dump()
                    )))
                }
            };
        }

        Ok(())
    }
}

fn parse_dimension(input_json: &JsonValue, key: &str) -> Result<usize, MeshError> {
    match input_json[key].as_usize() {
        Some(n) => Ok(n),
        None => Err(MeshError::Input(format!(
            "Input json field {key} must be a non-negative integer, got {}",
            input_json[key].dump()
        ))),
    }
}

/// Parses the input json into a JsonValue object
///
/// # Arguments
/// * `input_file` - The path to the input file
pub fn load_input_file(input_file: &Path) -> Result<JsonValue, MeshError> {
    let file_string =
        std::fs::read_to_string(input_file).map_err(|err| MeshError::io(input_file, err))?;

    match json::parse(&file_string) {
        Ok(j) => Ok(j),
        Err(err) => Err(MeshError::Input(format!(
            "Error in input file json {}: {err}",
            input_file.display()
        ))),
    }
}
