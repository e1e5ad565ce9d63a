//! Metal buffer operations: host floats in and out of shared GPU memory

use std::ptr::NonNull;

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_metal::{MTLBuffer, MTLDevice, MTLResourceOptions};

use super::device_init::MetalContext;

/// Shared-storage float buffer, released on drop.
pub struct MetalBuffer {
    pub(crate) mtl_buffer: Retained<ProtocolObject<dyn MTLBuffer>>,
    pub(crate) len: usize,
}

impl MetalBuffer {
    /// Create a buffer holding a copy of `data`.
    pub fn from_slice(ctx: &MetalContext, data: &[f32]) -> Option<Self> {
        let byte_size = std::mem::size_of_val(data);
        let mtl_buffer = if byte_size == 0 {
            // Metal rejects zero-length buffers.
            ctx.device
                .newBufferWithLength_options(std::mem::size_of::<f32>(), MTLResourceOptions::StorageModeShared)?
        } else {
            let ptr = NonNull::new(data.as_ptr() as *mut std::ffi::c_void)?;
            unsafe {
                ctx.device.newBufferWithBytes_length_options(
                    ptr,
                    byte_size,
                    MTLResourceOptions::StorageModeShared,
                )
            }?
        };

        Some(MetalBuffer {
            mtl_buffer,
            len: data.len(),
        })
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the first `out.len()` elements back to the host.
    pub fn read_into(&self, out: &mut [f32]) {
        let n = out.len().min(self.len);
        let src = self.mtl_buffer.contents().as_ptr() as *const f32;
        unsafe { std::ptr::copy_nonoverlapping(src, out.as_mut_ptr(), n) };
    }
}
