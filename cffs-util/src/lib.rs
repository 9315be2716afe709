#![warn(clippy::all)]

use std::env;
use std::path::PathBuf;

use lazy_static::lazy_static;

pub mod abs_path;
pub mod console;
mod macros;
pub mod model;
pub mod service;
pub mod web;

use crate::abs_path::AbsPathBuf;
pub use crate::console::{Console, ConsoleConfig};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

static APP_DIR_NAME: &str = "cffs";

lazy_static! {
    /// Directory for cookies and persisted settings.
    pub static ref DATA_LOCAL_DIR: AbsPathBuf = app_dir(dirs::data_local_dir(), &[".local", "share"]);
    /// Directory searched for the config file.
    pub static ref CONFIG_DIR: AbsPathBuf = app_dir(dirs::config_dir(), &[".config"]);
}

fn app_dir(base: Option<PathBuf>, home_fallback: &[&str]) -> AbsPathBuf {
    let base = base
        .or_else(|| {
            dirs::home_dir().map(|home| home_fallback.iter().fold(home, |dir, c| dir.join(c)))
        })
        .unwrap_or_else(env::temp_dir);
    AbsPathBuf::try_new(base.join(APP_DIR_NAME)).expect("Could not find an absolute app dir")
}
