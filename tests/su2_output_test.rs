//! End-to-end tests: generate mesh files on disk and read them back.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use square_mesh::{
    config::{GridConfig, LeftBoundary, LineStyle},
    error::MeshError,
    generate, generate_and_verify, mesher, reader,
};
use tempfile::TempDir;

fn golden(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn config_in(dir: &TempDir, name: &str, nodes_x: usize, nodes_y: usize) -> GridConfig {
    GridConfig {
        nodes_x,
        nodes_y,
        output: dir.path().join(name),
        ..GridConfig::default()
    }
}

#[test]
fn test_default_grid_matches_golden_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, "square.su2", 3, 3);

    let summary = generate(&config).unwrap();
    assert_eq!(summary.elements, 8);
    assert_eq!(summary.nodes, 9);

    let written = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(written, golden("square_3x3.su2"));
}

#[test]
fn test_legacy_left_matches_golden_file_on_3x3() {
    let dir = TempDir::new().unwrap();
    let config = GridConfig {
        left_boundary: LeftBoundary::Legacy,
        ..config_in(&dir, "legacy.su2", 3, 3)
    };

    generate(&config).unwrap();

    let written = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(written, golden("square_3x3.su2"));
}

#[test]
fn test_thirds_match_golden_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, "square_4x3.su2", 4, 3);

    generate(&config).unwrap();

    let written = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(written, golden("square_4x3.su2"));
}

#[test]
fn test_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let first = config_in(&dir, "a.su2", 6, 5);
    let second = config_in(&dir, "b.su2", 6, 5);

    generate(&first).unwrap();
    generate(&second).unwrap();

    let a = std::fs::read(&first.output).unwrap();
    let b = std::fs::read(&second.output).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_round_trip_both_styles() {
    let dir = TempDir::new().unwrap();

    for style in [LineStyle::Tabbed, LineStyle::Spaced] {
        let config = GridConfig {
            line_style: style,
            ..config_in(&dir, "round_trip.su2", 5, 7)
        };

        generate_and_verify(&config).unwrap();

        let mesh = reader::read_su2(&config.output).unwrap();
        let expected = mesher::run(&config).unwrap();

        assert_eq!(mesh.elements, expected.elements);
        assert_eq!(mesh.markers, expected.markers);
        assert_eq!(mesh.nodes.len(), 35);
        for (a, b) in std::iter::zip(&mesh.nodes, &expected.nodes) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-13);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-13);
        }
    }
}

#[test]
fn test_legacy_left_on_tall_grid() {
    let dir = TempDir::new().unwrap();
    let config = GridConfig {
        left_boundary: LeftBoundary::Legacy,
        ..config_in(&dir, "tall.su2", 3, 8)
    };

    generate_and_verify(&config).unwrap();

    let mesh = reader::read_su2(&config.output).unwrap();
    let left = mesh.marker("left").unwrap();
    assert_eq!(left.edges.len(), 2);
    assert_eq!(left.edges[0].nodes, [21, 18]);
    assert_eq!(left.edges[1].nodes, [18, 15]);
    assert_eq!(mesh.marker("right").unwrap().edges.len(), 7);

    let text = std::fs::read_to_string(&config.output).unwrap();
    assert!(text.ends_with("MARKER_TAG= left\nMARKER_ELEMS= 2\n3\t21\t18\n3\t18\t15\n"));
}

#[test]
fn test_degenerate_grid_writes_nothing() {
    let dir = TempDir::new().unwrap();

    for (nx, ny) in [(1, 3), (3, 1)] {
        let config = config_in(&dir, "never.su2", nx, ny);

        let result = generate(&config);
        assert!(matches!(result, Err(MeshError::Input(_))));
        assert!(!config.output.exists());
    }
}

#[test]
fn test_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let config = GridConfig {
        output: dir.path().join("missing").join("square.su2"),
        ..GridConfig::default()
    };

    match generate(&config) {
        Err(MeshError::Io { path, .. }) => assert_eq!(path, config.output),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn test_json_input_file() {
    let dir = TempDir::new().unwrap();
    let output: PathBuf = dir.path().join("from_json.su2");
    let input = dir.path().join("input.json");
    std::fs::write(
        &input,
        format!(
            r#"{{ "nodes_x": 4, "nodes_y": 3, "output": {} }}"#,
            json::stringify(output.to_str().unwrap())
        ),
    )
    .unwrap();

    let mut config = GridConfig::default();
    config
        .apply_json(&square_mesh::config::load_input_file(&input).unwrap())
        .unwrap();
    generate(&config).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, golden("square_4x3.su2"));
}
