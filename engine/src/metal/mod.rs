//! Metal backend for GPU compute (macOS)

pub mod buffer_ops;
pub mod device_init;
pub mod dispatch;
pub mod library;
pub mod pipeline;

pub use buffer_ops::MetalBuffer;
pub use device_init::MetalContext;
pub use pipeline::MetalKernel;

use crate::backend::{ComputeBackend, KernelArg};
use crate::error::Result;
use crate::resolver::LibraryResolver;

impl ComputeBackend for MetalContext {
    type Buffer = MetalBuffer;
    type Kernel = MetalKernel;

    fn open(resolver: &LibraryResolver, name_or_path: Option<&str>) -> Result<Self> {
        MetalContext::open(resolver, name_or_path)
    }

    fn device_name(&self) -> String {
        self.device.name().to_string()
    }

    fn function_names(&self) -> Vec<String> {
        library::function_names(&self.library)
    }

    fn build_kernel(&self, name: &str) -> Result<MetalKernel> {
        pipeline::build_kernel(self, name)
    }

    fn buffer_from_slice(&self, data: &[f32]) -> Option<MetalBuffer> {
        MetalBuffer::from_slice(self, data)
    }

    fn run(&self, kernel: &MetalKernel, args: &[KernelArg<'_, MetalBuffer>], threads: usize) -> Result<()> {
        dispatch::run(self, kernel, args, threads)
    }

    fn read_buffer(&self, buffer: &MetalBuffer, out: &mut [f32]) -> Result<()> {
        buffer.read_into(out);
        Ok(())
    }
}
