use folio_domain::config::{ApiConfig, DatabaseConfig, DockerConfig, MAX_TIMEOUT_SECONDS, RunnerConfig};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_are_sane() {
    let docker = DockerConfig::default();
    assert_eq!(docker.compose_file, PathBuf::from("docker-compose.yml"));
    assert!(docker.project_name.is_none());

    let db = DatabaseConfig::default();
    assert!(db.url.starts_with("postgres://"));
    assert_eq!(db.schema_file, PathBuf::from("database/schema.hcl"));

    let api = ApiConfig::default();
    assert_eq!(api.base_url, "http://localhost:3000");
    assert_eq!(api.timeout_seconds, 10);
}

#[test]
fn runner_config_deserializes_partially() {
    let raw = json!({
        "project": { "root": "/srv/portfolio" },
        "database": { "url": "postgres://u:p@db/folio" },
        "api": { "timeout_seconds": 3 }
    });

    let cfg: RunnerConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.database.url, "postgres://u:p@db/folio");
    assert_eq!(cfg.database.seed_file, PathBuf::from("database/seed.sql"));
    assert_eq!(cfg.api.timeout_seconds, 3);
    assert_eq!(cfg.api.base_url, "http://localhost:3000");
    assert_eq!(cfg.tools.git, "git");
    assert_eq!(cfg.project_path("docker-compose.yml"), PathBuf::from("/srv/portfolio/docker-compose.yml"));
}

#[test]
fn absolute_paths_bypass_the_project_root() {
    let cfg = RunnerConfig::default();
    assert_eq!(cfg.project_path("/tmp/seed.sql"), PathBuf::from("/tmp/seed.sql"));
    assert_eq!(cfg.project_path("seed.sql"), PathBuf::from("./seed.sql"));
}

#[test]
fn api_timeout_is_kept_in_range() {
    let mut api = ApiConfig::default();
    assert_eq!(api.timeout_seconds(), 10);

    api.timeout_seconds = u64::MAX;
    assert_eq!(api.timeout_seconds(), MAX_TIMEOUT_SECONDS);

    api.timeout_seconds = 0;
    assert_eq!(api.timeout_seconds(), 1);
}
