//! Library lookup configuration.
//!
//! Every value the path resolver consults lives here, so two engines built
//! with different configs never observe each other's settings.

use std::path::PathBuf;

/// Default kernel library file stem.
pub const DEFAULT_LIB_NAME: &str = "libferrum";
/// Extension of compiled Metal libraries.
pub const DEFAULT_LIB_EXT: &str = "metallib";
/// Environment variable naming an override directory.
pub const DEFAULT_ENV_VAR: &str = "FERRUM_LIB";
/// Directory searched when no override is set.
pub const DEFAULT_LIB_DIR: &str = "./lib";

/// Immutable configuration for [`crate::resolver::LibraryResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub lib_name: String,
    pub lib_ext: String,
    pub env_var: String,
    pub default_dir: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            lib_name: DEFAULT_LIB_NAME.to_string(),
            lib_ext: DEFAULT_LIB_EXT.to_string(),
            env_var: DEFAULT_ENV_VAR.to_string(),
            default_dir: PathBuf::from(DEFAULT_LIB_DIR),
        }
    }
}

impl ResolverConfig {
    pub fn with_lib_name(mut self, name: impl Into<String>) -> Self {
        self.lib_name = name.into();
        self
    }

    pub fn with_lib_ext(mut self, ext: impl Into<String>) -> Self {
        self.lib_ext = ext.into();
        self
    }

    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    pub fn with_default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = dir.into();
        self
    }

    /// `<lib_name>.<lib_ext>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.lib_name, self.lib_ext)
    }
}
