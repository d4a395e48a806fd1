/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;

use doctran::errors::{ConfigError, ProviderError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::ConnectionError("Host unreachable".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::ConnectionError(_))));
    assert!(error.to_string().contains("Host unreachable"));
}

#[test]
fn test_translationError_io_shouldNamePath() {
    let error = TranslationError::io(
        "translations/es/a.md",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    );
    let display = error.to_string();
    assert!(display.contains("translations/es/a.md"));
    assert!(display.contains("denied"));
}

#[test]
fn test_configError_invalidRoot_shouldDisplayPath() {
    let error = ConfigError::InvalidRootDirectory(PathBuf::from("/missing"));
    assert_eq!(error.to_string(), "Invalid root directory: /missing");
}
