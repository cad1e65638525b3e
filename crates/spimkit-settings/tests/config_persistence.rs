use spimkit_core::{Axis, AxisRange};
use spimkit_settings::{Config, SettingsError, TileSpecs};
use spimkit_tiling::{AxisRemapTable, AxisSource};
use tempfile::TempDir;

fn customised() -> Config {
    let mut config = Config::new();
    config.tile_specs.set_field("volume_x_um", 5000.0).unwrap();
    config
        .tile_specs
        .set_field("tile_overlap_y_percent", 25.0)
        .unwrap();
    config.axis_map = AxisRemapTable::new(
        AxisSource::negative(Axis::Z),
        AxisSource::positive(Axis::X),
        AxisSource::positive(Axis::Y),
    )
    .unwrap();
    config.simulated_limits[Axis::Z] = AxisRange::new(-5.0, 5.0);
    config
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = customised();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip_into_nested_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spimkit").join("config.toml");

    let config = customised();
    config.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_axis_map_is_stored_as_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    Config::new().save_to_file(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["axis_map"]["y"]["sign"], "-");
    assert_eq!(raw["axis_map"]["y"]["axis"], "z");
    assert_eq!(raw["axis_map"]["x"]["axis"], "y");
}

#[test]
fn test_duplicate_axis_map_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "axis_map": {
                "x": {"sign": "+", "axis": "x"},
                "y": {"sign": "+", "axis": "x"},
                "z": {"sign": "+", "axis": "z"}
            }
        }"#,
    )
    .unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::JsonError(_)));
}

#[test]
fn test_invalid_specs_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut specs = TileSpecs::default();
    specs.tile_overlap_x_percent = 150.0;
    let body = format!(
        "[tile_specs]\n{}",
        toml_table(&specs)
    );
    std::fs::write(&path, body).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Geometry(_)));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_partial_file_takes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[simulated_limits]\nx = { min = 0.0, max = 25.0 }\ny = { min = 0.0, max = 25.0 }\nz = { min = 0.0, max = 10.0 }\n",
    )
    .unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.tile_specs, TileSpecs::default());
    assert_eq!(loaded.axis_map, AxisRemapTable::dispim());
    assert_eq!(loaded.simulated_limits[Axis::Z].span(), 10.0);
}

fn toml_table(specs: &TileSpecs) -> String {
    TileSpecs::schema()
        .iter()
        .map(|field| format!("{} = {:?}\n", field.name, specs.get_field(field.name).unwrap()))
        .collect()
}
