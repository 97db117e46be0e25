//! Client configuration stored as TOML in the `.ssts` directory.

mod defaults;
mod io;
mod types;

pub use io::{
    CONFIG_FILE_NAME, SERVER_ENV, apply_origin_override, config_path, load_from,
    load_or_default, save, save_to_path,
};
pub use types::{
    AppConfig, ConfigError, ExportSettings, LiveSettings, MissingMetricPolicy, ServerSettings,
};
