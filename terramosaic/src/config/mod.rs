//! Configuration for terramosaic.
//!
//! [`RenderConfig`] carries the tunables of one render. [`ConfigFile`] is the
//! user's `~/.terramosaic/config.ini`, which can produce a `RenderConfig`.
//!
//! # Example
//!
//! ```no_run
//! use terramosaic::config::ConfigFile;
//!
//! let file = ConfigFile::load()?;
//! let render_config = file.render_config();
//! # Ok::<(), terramosaic::config::ConfigFileError>(())
//! ```

mod file;
mod parser;
mod render;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use render::RenderConfig;
pub use settings::{ConfigFile, GdalSettings, MapboxSettings, RenderSettings};
