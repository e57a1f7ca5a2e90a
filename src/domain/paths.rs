//! # Config Paths
//!
//! File names inside the configuration directory.

use std::path::{Path, PathBuf};

pub const BOT_PROPS_FILE: &str = "botprops.json";
pub const AD_PREFS_FILE: &str = "adprefs.json";
pub const SEARCH_PARAMS_FILE: &str = "searchparams.json";
/// Chat transport credentials.
pub const MATRIX_FILE: &str = "matrix.yaml";
pub const SESSION_LOG_FILE: &str = "session.log";

pub fn config_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
