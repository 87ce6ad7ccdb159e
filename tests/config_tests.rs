// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use isp_pipeline::backends::framework::{Encoding, SourcePattern};
use isp_pipeline::constants::{components, format, timing};
use isp_pipeline::{AppError, PipelineConfig};
use std::time::Duration;

#[test]
fn test_config_default() {
    // Defaults reproduce the built-in pipeline
    let config = PipelineConfig::default();

    assert_eq!(config.width, 3265);
    assert_eq!(config.height, 4096);
    assert_eq!(config.source.encoding, Encoding::I420);
    assert_eq!(config.isp.output_encoding, Encoding::I420);
    assert_eq!(config.source.pattern, SourcePattern::Random);
    assert!(!config.zero_copy, "Zero copy should be off by default");
    assert_eq!(config.run_duration(), Duration::from_secs(timing::RUN_DURATION_SECS));
    assert!(config.teardown);
}

#[test]
fn test_config_component_names() {
    let config = PipelineConfig::default();
    assert_eq!(config.source.component, components::SOURCE);
    assert_eq!(config.isp.component, components::ISP);
    assert_eq!(config.render.component, components::RENDER);
}

#[test]
fn test_empty_json_is_default() {
    let config = PipelineConfig::from_json("{}").unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn test_json_round_trip_through_file() {
    let mut config = PipelineConfig::default();
    config.width = 1920;
    config.height = 1080;
    config.isp.output_encoding = Encoding::NV12;
    config.zero_copy = true;

    let path = std::env::temp_dir().join(format!("isp-pipeline-config-{}.json", std::process::id()));
    std::fs::write(&path, config.to_json().unwrap()).unwrap();
    let loaded = PipelineConfig::load(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.unwrap(), config);
}

#[test]
fn test_encodings_serialize_as_fourcc() {
    let json = PipelineConfig::default().to_json().unwrap();
    assert!(json.contains("\"encoding\": \"I420\""));
    assert!(json.contains("\"pattern\": \"random\""));
}

#[test]
fn test_missing_file_is_config_error() {
    let result = PipelineConfig::load(std::path::Path::new("/nonexistent/isp-pipeline.json"));
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_oversized_dimensions_rejected() {
    let result = PipelineConfig::from_json(r#"{"height": 100000}"#);
    assert!(matches!(result, Err(AppError::Config(_))));
    assert_eq!(format::HEIGHT, PipelineConfig::default().height);
}
