use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.ollama.protocol, "http");
    assert_eq!(config.ollama.host, "localhost");
    assert_eq!(config.ollama.port, 11434);
}

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");

    let config = Config::load(temp_dir.path()).expect("load should succeed without a file");

    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.auth, AuthConfig::default());
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn config_file_round_trip() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");

    let original = Config {
        ollama: OllamaConfig {
            protocol: "https".to_string(),
            host: "inference.internal".to_string(),
            port: 8080,
            chat_model: "test-chat".to_string(),
            embedding_model: "test-embed".to_string(),
        },
        auth: AuthConfig {
            header_name: "X-Api-Token".to_string(),
            header_value: "secret".to_string(),
        },
        base_dir: temp_dir.path().to_path_buf(),
    };

    original.save().expect("save should succeed");
    let loaded = Config::load(temp_dir.path()).expect("load should succeed");

    assert_eq!(original, loaded);
}

#[test]
fn load_rejects_invalid_config() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        r#"
[ollama]
protocol = "ftp"
"#,
    )
    .expect("should write config file");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn load_rejects_invalid_toml() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "[ollama\nhost =").expect("should write config file");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn validate_rejects_zero_port() {
    let config = OllamaConfig {
        port: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPort(0))
    ));
}

#[test]
fn validate_rejects_empty_model() {
    let config = OllamaConfig {
        chat_model: "  ".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidModel(_))
    ));
}

#[test]
fn server_url_is_built_from_parts() {
    let config = OllamaConfig::default();
    let url = config.server_url().expect("default URL should parse");
    assert_eq!(url.as_str(), "http://localhost:11434/");
}

#[test]
fn auth_header_pair_requires_both_halves() {
    let auth = AuthConfig::default();
    assert_eq!(auth.header_pair(), None);

    let auth = AuthConfig {
        header_name: "X-Token".to_string(),
        header_value: String::new(),
    };
    assert_eq!(auth.header_pair(), None);
    assert!(matches!(
        auth.validate(),
        Err(ConfigError::PartialAuthHeader)
    ));

    let auth = AuthConfig {
        header_name: "X-Token".to_string(),
        header_value: "secret".to_string(),
    };
    assert_eq!(auth.header_pair(), Some(("X-Token", "secret")));
    assert!(auth.validate().is_ok());
}
