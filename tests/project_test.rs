use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stencil::cli::Args;
use stencil::config::parse_manifest;
use stencil::error::Error;
use stencil::project::{Project, PROJECT_INFO_FILE};

const MANIFEST: &str = r#"{
    "languages": {
        "c++": {
            "standards": ["23", "20", "17"],
            "templates": {
                "executable": {
                    "modes": { "console": { "features": ["tests", "format"] } }
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

fn args() -> Args {
    Args {
        name: "demo".to_string(),
        language: "c++".to_string(),
        standard: "latest".to_string(),
        kind: "executable".to_string(),
        mode: "console".to_string(),
        features: Vec::new(),
        templates: PathBuf::from("templates"),
        verbose: false,
    }
}

#[test]
fn test_resolve_latest_standard() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let project = Project::resolve(&args(), &manifest).unwrap();

    assert_eq!(project.name, "demo");
    assert_eq!(project.language, "c++");
    assert_eq!(project.standard, "23");
    assert_eq!(project.kind, "executable");
    assert_eq!(project.mode, "console");
    assert!(project.features.is_empty());
}

#[test]
fn test_resolve_explicit_standard() {
    let manifest = parse_manifest(MANIFEST).unwrap();

    let mut args = args();
    args.standard = "17".to_string();
    assert_eq!(Project::resolve(&args, &manifest).unwrap().standard, "17");

    args.standard = "11".to_string();
    match Project::resolve(&args, &manifest) {
        Err(Error::Project(message)) => assert!(message.contains("Standard \"11\"")),
        other => panic!("Expected a project error, got {other:?}"),
    }
}

#[test]
fn test_resolve_rejects_unknown_parameters() {
    let manifest = parse_manifest(MANIFEST).unwrap();

    let mut unknown_language = args();
    unknown_language.language = "cobol".to_string();
    match Project::resolve(&unknown_language, &manifest) {
        Err(Error::Project(message)) => assert!(message.contains("isn't supported")),
        other => panic!("Expected a project error, got {other:?}"),
    }

    let mut unknown_kind = args();
    unknown_kind.kind = "plugin".to_string();
    assert!(Project::resolve(&unknown_kind, &manifest).is_err());

    let mut unknown_mode = args();
    unknown_mode.mode = "gui".to_string();
    assert!(Project::resolve(&unknown_mode, &manifest).is_err());
}

#[test]
fn test_unavailable_features_are_dropped() {
    let manifest = parse_manifest(MANIFEST).unwrap();

    let mut args = args();
    args.features = vec!["tests".to_string(), "bogus".to_string()];

    let project = Project::resolve(&args, &manifest).unwrap();
    assert_eq!(project.features, vec!["tests"]);
}

#[test]
fn test_context_exposes_the_environment_table() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let mut args = args();
    args.features = vec!["tests".to_string(), "format".to_string()];

    let project = Project::resolve(&args, &manifest).unwrap();
    let context = project.context();

    assert!(context.local_variables.is_empty());
    let env = &context.environment_variables;
    assert_eq!(env.get("ENV:LANGUAGE").unwrap(), "c++");
    assert_eq!(env.get("ENV:STANDARD").unwrap(), "23");
    assert_eq!(env.get("ENV:KIND").unwrap(), "executable");
    assert_eq!(env.get("ENV:MODE").unwrap(), "console");
    assert_eq!(env.get("ENV:FEATURES").unwrap(), "tests,format");
}

#[test]
fn test_wildcard_map() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let project = Project::resolve(&args(), &manifest).unwrap();

    let wildcards = project.wildcards(&manifest.wildcards);
    assert_eq!(wildcards.get("@NAME@").unwrap(), "demo");
    assert_eq!(wildcards.get("@LANGUAGE@").unwrap(), "c++");
    assert_eq!(wildcards.get("@STANDARD@").unwrap(), "23");
}

#[test]
fn test_save_info_writes_the_project_file() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let mut args = args();
    args.features = vec!["tests".to_string()];
    let project = Project::resolve(&args, &manifest).unwrap();

    let destination = TempDir::new().unwrap();
    project.save_info(destination.path()).unwrap();

    let content = fs::read_to_string(destination.path().join(PROJECT_INFO_FILE)).unwrap();
    let info: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(info["project"], "demo");
    assert_eq!(info["language"], serde_json::json!(["c++", "23"]));
    assert_eq!(info["kind"], serde_json::json!(["executable", "console"]));
    assert_eq!(info["features"], serde_json::json!(["tests"]));
}
