//! Configuration for negentropy.
//!
//! A single KDL file, `config.kdl`, holds user preferences: the keymap,
//! the productivity gauge cap, the render theme, and whether the running
//! indicator animates.
//!
//! Located at `~/.config/negentropy/config.kdl` by default; see
//! [`resolver`] for overrides. The file is not strictly validated: unknown
//! nodes are ignored and bad values fall back to defaults field by field.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_PATH_ENV, LoadedConfig, ValueSource, default_config_path, load_config_file,
    resolve_config,
};
pub use schema::{DEFAULT_MAX_PRODUCTIVITY_HOURS, KeymapConfig, Theme, UserConfig};
