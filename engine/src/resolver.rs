//! Kernel library path resolution.
//!
//! Search order, first match wins:
//! 1. the application bundle's resources (`<name>.<ext>`)
//! 2. an explicit path: the file itself, or `<dir>/<lib_name>.<ext>`
//! 3. `$<env_var>/<lib_name>.<ext>`, else `<default_dir>/<lib_name>.<ext>`
//!    (an empty `$<env_var>` counts as unset)
//!
//! Only regular files match.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::ResolverConfig;
use crate::error::{FerrumError, Result};

/// Source of bundled resources (the app bundle on macOS).
pub trait ResourceBundle: Send + Sync {
    fn resource_path(&self, name: &str, ext: &str) -> Option<PathBuf>;
}

/// The process's main `NSBundle`.
#[cfg(all(target_os = "macos", feature = "metal-backend"))]
pub struct MainBundle;

#[cfg(all(target_os = "macos", feature = "metal-backend"))]
impl ResourceBundle for MainBundle {
    fn resource_path(&self, name: &str, ext: &str) -> Option<PathBuf> {
        use objc2_foundation::{NSBundle, NSString};

        let bundle = NSBundle::mainBundle();
        let name = NSString::from_str(name);
        let ext = NSString::from_str(ext);
        let path = bundle.pathForResource_ofType(Some(&name), Some(&ext))?;
        Some(PathBuf::from(path.to_string()))
    }
}

pub struct LibraryResolver {
    config: ResolverConfig,
    bundle: Option<Box<dyn ResourceBundle>>,
}

impl LibraryResolver {
    /// Resolver using the platform bundle, if there is one.
    pub fn new(config: ResolverConfig) -> Self {
        #[cfg(all(target_os = "macos", feature = "metal-backend"))]
        let bundle: Option<Box<dyn ResourceBundle>> = Some(Box::new(MainBundle));
        #[cfg(not(all(target_os = "macos", feature = "metal-backend")))]
        let bundle: Option<Box<dyn ResourceBundle>> = None;

        LibraryResolver { config, bundle }
    }

    /// Resolver that never consults a bundle.
    pub fn without_bundle(config: ResolverConfig) -> Self {
        LibraryResolver {
            config,
            bundle: None,
        }
    }

    pub fn with_bundle(mut self, bundle: impl ResourceBundle + 'static) -> Self {
        self.bundle = Some(Box::new(bundle));
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Locate the kernel library. `name_or_path` is either a bundle resource
    /// name or a filesystem path (file or directory).
    pub fn resolve(&self, name_or_path: Option<&str>) -> Result<PathBuf> {
        let not_found = || FerrumError::LibraryNotFound(name_or_path.map(str::to_string));

        if let Some(bundle) = &self.bundle {
            let resource = name_or_path.unwrap_or(&self.config.lib_name);
            if let Some(path) = bundle.resource_path(resource, &self.config.lib_ext) {
                debug!("resolved kernel library from bundle: {}", path.display());
                return Ok(path);
            }
        }

        if let Some(given) = name_or_path {
            let given = Path::new(given);
            if given.is_file() {
                debug!("resolved kernel library from explicit file: {}", given.display());
                return Ok(given.to_path_buf());
            }
            if given.is_dir() {
                let candidate = given.join(self.config.file_name());
                if candidate.is_file() {
                    debug!("resolved kernel library in directory: {}", candidate.display());
                    return Ok(candidate);
                }
            }
            debug!("no kernel library at {}", given.display());
            return Err(not_found());
        }

        let dir = match std::env::var_os(&self.config.env_var) {
            Some(dir) if !dir.is_empty() => {
                debug!("{} override: {:?}", self.config.env_var, dir);
                PathBuf::from(dir)
            }
            _ => self.config.default_dir.clone(),
        };
        let candidate = dir.join(self.config.file_name());
        if candidate.is_file() {
            debug!("resolved kernel library: {}", candidate.display());
            Ok(candidate)
        } else {
            debug!("no kernel library at {}", candidate.display());
            Err(not_found())
        }
    }
}
