//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use terramosaic::config::ConfigFileError;
use terramosaic::mosaic::MosaicError;
use terramosaic::RenderError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid arguments or missing settings
    Config(String),
    /// Could not read or write the config file
    ConfigFile(ConfigFileError),
    /// Failed to create the HTTP client
    HttpClient(String),
    /// The render failed
    Render(RenderError),
    /// The tile listing failed
    Tiles(RenderError),
}

impl CliError {
    /// Exit the process with an error message and status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Render(RenderError::ExternalTool(MosaicError::ToolUnavailable { .. })) => {
                eprintln!();
                eprintln!("The mosaic step needs the GDAL command-line tools:");
                eprintln!("  Debian/Ubuntu: sudo apt install gdal-bin");
                eprintln!("  macOS:         brew install gdal");
                eprintln!("Tool paths can be set in the [gdal] section of config.ini.");
            }
            CliError::Config(msg) if msg.contains("access token") => {
                eprintln!();
                eprintln!("Get a token at https://www.mapbox.com/ and pass it with");
                eprintln!("--access-token, MAPBOX_ACCESS_TOKEN, or [mapbox] access_token.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::HttpClient(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            CliError::Render(e) => write!(f, "Render failed: {}", e),
            CliError::Tiles(e) => write!(f, "Cannot list tiles: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Render(e) | CliError::Tiles(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CliError::Config("missing token".to_string()).to_string(),
            "Configuration error: missing token"
        );

        let err: CliError = RenderError::Configuration("bad zoom".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Render failed: configuration error: bad zoom"
        );

        let err = CliError::Tiles(RenderError::Configuration("bad zoom".to_string()));
        assert_eq!(
            err.to_string(),
            "Cannot list tiles: configuration error: bad zoom"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err: CliError = RenderError::ExternalTool(MosaicError::NoInputs).into();
        assert!(err.source().is_some());
        assert!(CliError::LoggingInit("x".to_string()).source().is_none());
    }
}
