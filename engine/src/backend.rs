//! Backend abstraction: the seam between the dispatch protocol and Metal.
//!
//! The engine, pipeline cache and C ABI only talk to [`ComputeBackend`].
//! [`SystemBackend`] is Metal on macOS; everywhere else it is
//! [`Unavailable`], which can never be opened, so engines built on those
//! hosts come up unusable and every call fails cleanly.

use crate::error::{FerrumError, Result};
use crate::resolver::LibraryResolver;

/// One argument bound to a kernel slot.
pub enum KernelArg<'a, B> {
    Buffer(&'a B),
    Uint(u32),
    Float(f32),
}

// Manual impls: `B` itself need not be Clone/Copy.
impl<B> Clone for KernelArg<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for KernelArg<'_, B> {}

impl<B> std::fmt::Debug for KernelArg<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelArg::Buffer(_) => f.write_str("Buffer"),
            KernelArg::Uint(v) => write!(f, "Uint({v})"),
            KernelArg::Float(v) => write!(f, "Float({v})"),
        }
    }
}

/// A device + loaded kernel library + command queue.
pub trait ComputeBackend: Send + Sized {
    /// Transient device buffer, released on drop.
    type Buffer;
    /// Compiled, ready-to-dispatch kernel.
    type Kernel: Send;

    /// Select a device and load the kernel library found by `resolver`.
    fn open(resolver: &LibraryResolver, name_or_path: Option<&str>) -> Result<Self>;

    fn device_name(&self) -> String;

    /// Every function name embedded in the loaded library.
    fn function_names(&self) -> Vec<String>;

    /// Create the function object and compile its pipeline.
    fn build_kernel(&self, name: &str) -> Result<Self::Kernel>;

    /// Copy host data into a new device buffer.
    fn buffer_from_slice(&self, data: &[f32]) -> Option<Self::Buffer>;

    /// Encode `kernel` with `args` bound to slots `0..args.len()`, run
    /// `threads` threads and block until the device is done.
    fn run(&self, kernel: &Self::Kernel, args: &[KernelArg<'_, Self::Buffer>], threads: usize)
        -> Result<()>;

    /// Copy the first `out.len()` elements of `buffer` back to the host.
    fn read_buffer(&self, buffer: &Self::Buffer, out: &mut [f32]) -> Result<()>;
}

/// Backend for hosts without a supported GPU. Uninhabited.
#[derive(Debug)]
pub enum Unavailable {}

impl ComputeBackend for Unavailable {
    type Buffer = ();
    type Kernel = ();

    fn open(_resolver: &LibraryResolver, _name_or_path: Option<&str>) -> Result<Self> {
        Err(FerrumError::DeviceUnavailable)
    }

    fn device_name(&self) -> String {
        match *self {}
    }

    fn function_names(&self) -> Vec<String> {
        match *self {}
    }

    fn build_kernel(&self, _name: &str) -> Result<()> {
        match *self {}
    }

    fn buffer_from_slice(&self, _data: &[f32]) -> Option<()> {
        match *self {}
    }

    fn run(&self, _kernel: &(), _args: &[KernelArg<'_, ()>], _threads: usize) -> Result<()> {
        match *self {}
    }

    fn read_buffer(&self, _buffer: &(), _out: &mut [f32]) -> Result<()> {
        match *self {}
    }
}

#[cfg(all(target_os = "macos", feature = "metal-backend"))]
pub type SystemBackend = crate::metal::MetalContext;

#[cfg(not(all(target_os = "macos", feature = "metal-backend")))]
pub type SystemBackend = Unavailable;

/// Check if the platform backend can run at all.
pub fn is_available() -> bool {
    #[cfg(all(target_os = "macos", feature = "metal-backend"))]
    {
        crate::metal::device_init::is_available()
    }
    #[cfg(not(all(target_os = "macos", feature = "metal-backend")))]
    {
        false
    }
}
