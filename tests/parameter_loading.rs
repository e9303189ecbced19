mod common;

use common::*;
use flight6dof::{
    components::{AircraftParameters, EngineKind, PropulsionConfig},
    utils::ConfigError,
};
use pretty_assertions::assert_eq;

fn twin_document(kind: &str) -> String {
    format!("{}engines:\n  count: 2\n  kind: {}\n", TWIN_AIRCRAFT_YAML, kind)
}

#[test]
fn loads_twin_from_file() {
    let file = write_yaml(&twin_document("Turboprop"));
    let params = AircraftParameters::try_from_file(file.path()).unwrap();

    assert_eq!(params.name, "TestTwin");
    assert_eq!(params.mass.mass, 2300.0);
    assert_eq!(params.propulsion.engines.len(), 2);
    assert!(params
        .propulsion
        .engines
        .iter()
        .all(|engine| engine.model.kind() == EngineKind::Turboprop));
    // Symmetric about the centreline
    let lateral: f64 = params
        .propulsion
        .engines
        .iter()
        .map(|engine| engine.position.y)
        .sum();
    assert!(lateral.abs() < 1e-12);

    // The lenient path agrees on a valid document
    assert_eq!(AircraftParameters::from_yaml_file(file.path()), params);
}

#[test]
fn missing_engine_list_uses_single_piston() {
    let params = AircraftParameters::try_from_yaml_str(TWIN_AIRCRAFT_YAML).unwrap();
    assert_eq!(params.propulsion, PropulsionConfig::light_single());
}

#[test]
fn missing_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    assert!(matches!(
        AircraftParameters::try_from_file(&path),
        Err(ConfigError::FileError(_))
    ));
    assert_eq!(
        AircraftParameters::from_yaml_file(&path),
        AircraftParameters::default()
    );
}

#[test]
fn malformed_document_falls_back_to_default() {
    let broken = "name: [unterminated\nmass: heavy\n";
    assert!(matches!(
        AircraftParameters::try_from_yaml_str(broken),
        Err(ConfigError::YamlError(_))
    ));
    assert_eq!(
        AircraftParameters::from_yaml_str(broken),
        AircraftParameters::default()
    );
}

#[test]
fn strict_load_rejects_bad_engine_count() {
    let doc = format!("{}engines:\n  count: 5\n  kind: Turbojet\n", TWIN_AIRCRAFT_YAML);
    assert!(matches!(
        AircraftParameters::try_from_yaml_str(&doc),
        Err(ConfigError::InvalidEngineCount(5))
    ));
}

#[test]
fn unphysical_mass_is_rejected_then_replaced() {
    let doc = TWIN_AIRCRAFT_YAML.replace("mass: 2300.0", "mass: -10.0");
    assert!(matches!(
        AircraftParameters::try_from_yaml_str(&doc),
        Err(ConfigError::ValidationError(_))
    ));

    let params = AircraftParameters::from_yaml_str(&doc);
    assert!(params.mass.is_valid());
    assert_eq!(params.name, "TestTwin");
    assert!(params.validate().is_ok());
}
