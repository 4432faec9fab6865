//! Tests for configuration loading.

use explorer::{DEFAULT_MODEL, ExplorerConfig, PartialResponsePolicy};
use explorer_error::ExplorerErrorKind;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_are_valid() {
    let config = ExplorerConfig::default();
    assert_eq!(config.model(), DEFAULT_MODEL);
    assert_eq!(*config.poll_interval_ms(), 250);
    assert_eq!(config.stream_idle_timeout(), Duration::from_secs(60));
    assert_eq!(*config.partial_response(), PartialResponsePolicy::Retain);
    assert!(!config.enforce_topic_relevance());
    assert!(config.validate().is_ok());
}

#[test]
fn loads_partial_file_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let file = write_config(
        r#"
        model = "gemini-2.5-pro"
        partial_response = "discard"
        enforce_topic_relevance = true
        upload_timeout_secs = 30
        stream_idle_timeout_secs = 15

        [parameters]
        temperature = 1.2
        nucleus_threshold = 0.8
        "#,
    );

    let config = ExplorerConfig::from_file(file.path())?;

    assert_eq!(config.model(), "gemini-2.5-pro");
    assert_eq!(*config.partial_response(), PartialResponsePolicy::Discard);
    assert!(*config.enforce_topic_relevance());
    assert_eq!(*config.parameters().temperature(), 1.2);
    assert_eq!(*config.parameters().top_p(), 0.8);
    assert_eq!(*config.parameters().top_k(), 40);

    let coordinator = config.coordinator_config();
    assert_eq!(*coordinator.poll_interval(), Duration::from_millis(250));
    assert_eq!(*coordinator.upload().timeout(), Duration::from_secs(30));
    assert_eq!(*coordinator.partial_response(), PartialResponsePolicy::Discard);
    assert_eq!(*coordinator.stream_idle_timeout(), Duration::from_secs(15));
    Ok(())
}

#[test]
fn out_of_range_values_are_config_errors() {
    let file = write_config(
        r#"
        [parameters]
        temperature = 3.5
        "#,
    );

    let err = ExplorerConfig::from_file(file.path()).expect_err("temperature too high");
    assert!(matches!(err.kind(), ExplorerErrorKind::Config(_)));
    assert!(err.to_string().contains("temperature"));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let file = write_config("poll_interval_ms = 0\n");
    assert!(ExplorerConfig::from_file(file.path()).is_err());
}

#[test]
fn zero_stream_idle_timeout_is_rejected() {
    let file = write_config("stream_idle_timeout_secs = 0\n");
    let err = ExplorerConfig::from_file(file.path()).expect_err("zero idle timeout");
    assert!(err.to_string().contains("timeouts must be greater than zero"));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let file = write_config("model = [unclosed");
    let err = ExplorerConfig::from_file(file.path()).expect_err("bad toml");
    assert!(matches!(err.kind(), ExplorerErrorKind::Config(_)));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");
    let err = ExplorerConfig::load(Some(path.as_path()))
        .expect_err("explicit path must exist");
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn model_override_replaces_only_the_model() {
    let config = ExplorerConfig::default().with_model("gemini-2.0-flash");
    assert_eq!(config.model(), "gemini-2.0-flash");
    assert_eq!(*config.upload_timeout_secs(), 120);
}
