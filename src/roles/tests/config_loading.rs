//! Loading role declarations from disk

use authorize_roles::{AuthorizeError, PrincipalOptions, RegistryConfig, RoleMixin};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_load_toml_file() {
    let file = write_config(
        ".toml",
        r#"
        [[roles]]
        id = "author"
        actions = ["write", "publish"]
        inherits = ["reader"]

        [[roles]]
        id = "reader"
        actions = ["read"]
        "#,
    );

    let registry = RegistryConfig::load(file.path()).unwrap().build().unwrap();
    assert_eq!(registry.roles(), vec!["author", "reader"]);
    assert!(registry.grants("author", "read").unwrap());
}

#[test]
fn test_load_json_file() {
    let file = write_config(
        ".json",
        r#"{"roles": [
            {"id": "admin", "actions": ["*"], "description": "Everything"},
            {"id": "guest"}
        ]}"#,
    );

    let config = RegistryConfig::load(file.path()).unwrap();
    assert_eq!(config.roles[0].description.as_deref(), Some("Everything"));

    let roles = RoleMixin::new(config.build().unwrap());
    let guest = roles
        .build_principal("user:guest", PrincipalOptions::with_role("guest"))
        .unwrap();
    assert!(!roles.can_perform(&guest, "read").unwrap());
}

#[test]
fn test_unsupported_extension() {
    let file = write_config(".yaml", "roles: []");
    let result = RegistryConfig::load(file.path());
    assert!(matches!(result, Err(AuthorizeError::Config(_))));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = RegistryConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AuthorizeError::Io(_))));
}

#[test]
fn test_config_round_trips_through_toml() {
    let original = RegistryConfig::from_toml_str(
        r#"
        [[roles]]
        id = "reader"
        actions = ["read"]
        "#,
    )
    .unwrap();

    let rendered = toml::to_string(&original).unwrap();
    let file = write_config(".toml", &rendered);
    assert_eq!(RegistryConfig::load(file.path()).unwrap(), original);
}
