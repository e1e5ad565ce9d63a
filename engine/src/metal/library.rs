//! Kernel library loading: `.metallib` files and MSL source.

use std::path::Path;

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_foundation::{NSString, NSURL};
use objc2_metal::{MTLDevice, MTLLibrary};

use crate::error::{FerrumError, Result};

/// Load a precompiled library from a file URL.
pub fn load_from_path(
    device: &ProtocolObject<dyn MTLDevice>,
    path: &Path,
) -> Result<Retained<ProtocolObject<dyn MTLLibrary>>> {
    let path_ns = NSString::from_str(&path.to_string_lossy());
    let url = NSURL::fileURLWithPath(&path_ns);
    device
        .newLibraryWithURL_error(&url)
        .map_err(|e| FerrumError::LibraryLoad(e.localizedDescription().to_string()))
}

/// Compile MSL source into a library.
pub fn compile_source(
    device: &ProtocolObject<dyn MTLDevice>,
    source: &str,
) -> Result<Retained<ProtocolObject<dyn MTLLibrary>>> {
    let source_ns = NSString::from_str(source);
    device
        .newLibraryWithSource_options_error(&source_ns, None)
        .map_err(|e| FerrumError::LibraryLoad(format!("MSL compilation failed: {}", e.localizedDescription())))
}

/// Names of every function in the library.
pub fn function_names(library: &ProtocolObject<dyn MTLLibrary>) -> Vec<String> {
    library
        .functionNames()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metal::device_init::{is_available, load_device};

    #[test]
    fn test_compile_and_list_functions() {
        if !is_available() {
            println!("Metal not available, skipping");
            return;
        }
        let device = load_device().unwrap();
        let library = compile_source(&device, &crate::msl::reference_library_source()).unwrap();
        let names = function_names(&library);
        assert!(names.iter().any(|n| n == "vector_add"));
        assert_eq!(names.len(), crate::msl::REFERENCE_KERNELS.len());
    }

    #[test]
    fn test_bad_source_is_load_error() {
        if !is_available() {
            println!("Metal not available, skipping");
            return;
        }
        let device = load_device().unwrap();
        let err = compile_source(&device, "kernel void broken(").err().unwrap();
        assert!(matches!(err, FerrumError::LibraryLoad(_)));
    }

    #[test]
    fn test_garbage_file_is_load_error() {
        if !is_available() {
            println!("Metal not available, skipping");
            return;
        }
        let device = load_device().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libferrum.metallib");
        std::fs::write(&path, b"not a metallib").unwrap();
        let err = load_from_path(&device, &path).err().unwrap();
        assert!(matches!(err, FerrumError::LibraryLoad(_)));
    }
}
