//! Metal compute kernel dispatch: encodes and submits GPU work.

use std::ffi::c_void;
use std::ptr::NonNull;

use objc2_metal::{
    MTLCommandBuffer, MTLCommandBufferStatus, MTLCommandEncoder, MTLCommandQueue,
    MTLComputeCommandEncoder, MTLSize,
};

use super::buffer_ops::MetalBuffer;
use super::device_init::MetalContext;
use super::pipeline::MetalKernel;
use crate::backend::KernelArg;
use crate::error::{FerrumError, Result};

fn size_1d(width: usize) -> MTLSize {
    MTLSize {
        width,
        height: 1,
        depth: 1,
    }
}

/// Encode `kernel` with `args` bound to slots `0..args.len()` and run
/// `threads` threads, blocking until the command buffer completes.
///
/// Launches a single threadgroup of `threads` when the pipeline allows it,
/// otherwise a grid of `threads` in pipeline-sized groups.
pub fn run(
    ctx: &MetalContext,
    kernel: &MetalKernel,
    args: &[KernelArg<'_, MetalBuffer>],
    threads: usize,
) -> Result<()> {
    if threads == 0 {
        return Ok(());
    }

    let command_buffer = ctx
        .command_queue
        .commandBuffer()
        .ok_or_else(|| FerrumError::DispatchFailed("failed to create command buffer".into()))?;

    let encoder = command_buffer
        .computeCommandEncoder()
        .ok_or_else(|| FerrumError::DispatchFailed("failed to create compute encoder".into()))?;

    encoder.setComputePipelineState(&kernel.pipeline);

    for (index, arg) in args.iter().enumerate() {
        match *arg {
            KernelArg::Buffer(buffer) => unsafe {
                encoder.setBuffer_offset_atIndex(Some(&buffer.mtl_buffer), 0, index);
            },
            KernelArg::Uint(value) => unsafe {
                let bytes = NonNull::from(&value).cast::<c_void>();
                encoder.setBytes_length_atIndex(bytes, std::mem::size_of::<u32>(), index);
            },
            KernelArg::Float(value) => unsafe {
                let bytes = NonNull::from(&value).cast::<c_void>();
                encoder.setBytes_length_atIndex(bytes, std::mem::size_of::<f32>(), index);
            },
        }
    }

    let max_group = kernel.max_threads_per_group.max(1);
    if threads <= max_group {
        encoder.dispatchThreadgroups_threadsPerThreadgroup(size_1d(1), size_1d(threads));
    } else {
        encoder.dispatchThreads_threadsPerThreadgroup(size_1d(threads), size_1d(max_group));
    }

    encoder.endEncoding();
    command_buffer.commit();
    command_buffer.waitUntilCompleted();

    if command_buffer.status() == MTLCommandBufferStatus::Error {
        let message = command_buffer
            .error()
            .map(|e| e.localizedDescription().to_string())
            .unwrap_or_else(|| "command buffer failed".to_string());
        return Err(FerrumError::DispatchFailed(message));
    }

    Ok(())
}
