//! Metal device selection and context setup

use log::info;
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_metal::{MTLCommandQueue, MTLCopyAllDevices, MTLDevice, MTLLibrary};

use super::library;
use crate::error::{FerrumError, Result};
use crate::resolver::LibraryResolver;

// Device enumeration on some macOS versions needs CoreGraphics linked
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {}

/// Device, loaded kernel library and the single command queue.
///
/// Field order is drop order: queue, then library, then device.
pub struct MetalContext {
    pub command_queue: Retained<ProtocolObject<dyn MTLCommandQueue>>,
    pub library: Retained<ProtocolObject<dyn MTLLibrary>>,
    pub device: Retained<ProtocolObject<dyn MTLDevice>>,
}

// SAFETY: Metal devices, libraries and command queues are thread-safe
// objects. Each context sits behind its own mutex in the session registry,
// so encoding on the queue never happens from two threads at once.
unsafe impl Send for MetalContext {}

/// First device reported by the system, if any.
pub fn load_device() -> Option<Retained<ProtocolObject<dyn MTLDevice>>> {
    #[allow(unused_unsafe)]
    let devices = unsafe { MTLCopyAllDevices() };
    devices.firstObject()
}

/// Check if Metal is available on this system.
pub fn is_available() -> bool {
    load_device().is_some()
}

impl MetalContext {
    /// Select the device, then resolve and load the kernel library.
    pub fn open(resolver: &LibraryResolver, name_or_path: Option<&str>) -> Result<Self> {
        let device = load_device().ok_or(FerrumError::DeviceUnavailable)?;
        let path = resolver.resolve(name_or_path)?;
        let library = library::load_from_path(&device, &path)?;
        info!("loaded kernel library {}", path.display());
        Self::with_library(device, library)
    }

    /// Context over a library compiled from MSL source.
    pub fn from_source(source: &str) -> Result<Self> {
        let device = load_device().ok_or(FerrumError::DeviceUnavailable)?;
        let library = library::compile_source(&device, source)?;
        Self::with_library(device, library)
    }

    fn with_library(
        device: Retained<ProtocolObject<dyn MTLDevice>>,
        library: Retained<ProtocolObject<dyn MTLLibrary>>,
    ) -> Result<Self> {
        let command_queue = device
            .newCommandQueue()
            .ok_or_else(|| FerrumError::DispatchFailed("failed to create command queue".into()))?;
        Ok(MetalContext {
            command_queue,
            library,
            device,
        })
    }
}
