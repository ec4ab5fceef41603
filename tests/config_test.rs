use std::fs;

use tempfile::TempDir;

use stencil::config::{load_manifest, parse_manifest, MANIFEST_FILE};
use stencil::error::Error;

const MANIFEST: &str = r#"{
    "languages": {
        "c++": {
            "standards": ["23", "20", "17"],
            "templates": {
                "executable": {
                    "modes": { "console": { "features": ["tests"] } }
                },
                "library": {
                    "modes": { "static": {} }
                }
            }
        }
    },
    "wildcards": {
        "name": "@NAME@",
        "language": "@LANGUAGE@",
        "standard": "@STANDARD@"
    }
}"#;

#[test]
fn test_parse_manifest() {
    let manifest = parse_manifest(MANIFEST).unwrap();

    let language = manifest.languages.get("c++").unwrap();
    assert_eq!(language.standards, vec!["23", "20", "17"]);

    let executable = language.templates.get("executable").unwrap();
    let console = executable.modes.get("console").unwrap();
    assert_eq!(console.features, vec!["tests"]);

    // Features are optional per mode.
    let library = language.templates.get("library").unwrap();
    assert!(library.modes.get("static").unwrap().features.is_empty());

    assert_eq!(manifest.wildcards.name, "@NAME@");
    assert_eq!(manifest.wildcards.language, "@LANGUAGE@");
    assert_eq!(manifest.wildcards.standard, "@STANDARD@");
}

#[test]
fn test_parse_manifest_rejects_invalid_json() {
    match parse_manifest("{ not json") {
        Err(Error::Config(message)) => assert!(message.contains("Invalid manifest")),
        other => panic!("Expected a configuration error, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_load_manifest_from_templates_directory() {
    let templates = TempDir::new().unwrap();
    fs::write(templates.path().join(MANIFEST_FILE), MANIFEST).unwrap();

    let manifest = load_manifest(templates.path()).unwrap();
    assert!(manifest.languages.contains_key("c++"));
}

#[test]
fn test_load_manifest_reports_a_missing_file() {
    let templates = TempDir::new().unwrap();

    match load_manifest(templates.path()) {
        Err(Error::Config(message)) => assert!(message.contains("Couldn't open")),
        other => panic!("Expected a configuration error, got {:?}", other.is_ok()),
    }
}
