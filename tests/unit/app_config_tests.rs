/*!
 * Tests for configuration loading
 */

use anyhow::Result;
use std::fs;

use doctran::app_config::{Config, LogLevel};
use crate::common;

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("doctran.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.parallel_workers, 5);
    let written: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written.language_codes, config.language_codes);
    Ok(())
}

#[test]
fn test_load_or_create_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "doctran.json",
        r#"{ "language_codes": ["ko", "ja"], "parallel_workers": 2, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.language_codes, vec!["ko".to_string(), "ja".to_string()]);
    assert_eq!(config.parallel_workers, 2);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    Ok(())
}

#[test]
fn test_load_or_create_withBrokenJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "doctran.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        language_codes: vec!["es".to_string(), "xx".to_string()],
        ..Config::default()
    };
    assert!(config.validate().is_err());
}
