use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tool binary paths are not blank
/// - Transcode timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.extractor.ytdlp_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "extractor.ytdlp_path cannot be empty".to_string(),
        ));
    }
    if config.fetcher.ytdlp_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "fetcher.ytdlp_path cannot be empty".to_string(),
        ));
    }
    if config.transcoder.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "transcoder.ffmpeg_path cannot be empty".to_string(),
        ));
    }
    if config.transcoder.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "transcoder.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_blank_tool_path_fails() {
        let mut config = Config::default();
        config.transcoder.ffmpeg_path = PathBuf::new();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.transcoder.timeout_secs = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
