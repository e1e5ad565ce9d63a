//! Compute pipeline construction: library function → MTLComputePipelineState

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_foundation::NSString;
use objc2_metal::{MTLComputePipelineState, MTLDevice, MTLFunction, MTLLibrary};

use super::device_init::MetalContext;
use crate::error::{FerrumError, KernelStage, Result};

/// A function object and its compiled pipeline, ready for dispatch.
///
/// Field order is drop order: the pipeline goes before its function.
pub struct MetalKernel {
    pub pipeline: Retained<ProtocolObject<dyn MTLComputePipelineState>>,
    pub function: Retained<ProtocolObject<dyn MTLFunction>>,
    /// Maximum threads per threadgroup for this pipeline.
    pub max_threads_per_group: usize,
}

// SAFETY: pipeline states and functions are immutable once created and
// Metal allows using them from any thread.
unsafe impl Send for MetalKernel {}

/// Create the function object for `name` and compile its pipeline.
pub fn build_kernel(ctx: &MetalContext, name: &str) -> Result<MetalKernel> {
    let kernel_err = |stage, message: String| FerrumError::Kernel {
        name: name.to_string(),
        stage,
        message,
    };

    let name_ns = NSString::from_str(name);
    let function = ctx
        .library
        .newFunctionWithName(&name_ns)
        .ok_or_else(|| kernel_err(KernelStage::Function, "not found in library".into()))?;

    let pipeline = ctx
        .device
        .newComputePipelineStateWithFunction_error(&function)
        .map_err(|e| kernel_err(KernelStage::Pipeline, e.localizedDescription().to_string()))?;

    let max_threads_per_group = pipeline.maxTotalThreadsPerThreadgroup() as usize;

    Ok(MetalKernel {
        pipeline,
        function,
        max_threads_per_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metal::device_init::is_available;

    #[test]
    fn test_build_reference_kernel() {
        if !is_available() {
            println!("Metal not available, skipping");
            return;
        }

        let ctx = MetalContext::from_source(&crate::msl::reference_library_source()).unwrap();
        let kernel = build_kernel(&ctx, "vector_add");
        assert!(kernel.is_ok(), "pipeline build failed: {:?}", kernel.err().map(|e| e.to_string()));
        let kernel = kernel.unwrap();
        assert!(kernel.max_threads_per_group > 0);
        println!("max_threads_per_group: {}", kernel.max_threads_per_group);
    }

    #[test]
    fn test_missing_function() {
        if !is_available() {
            println!("Metal not available, skipping");
            return;
        }

        let ctx = MetalContext::from_source(&crate::msl::reference_library_source()).unwrap();
        match build_kernel(&ctx, "vector_nope") {
            Err(FerrumError::Kernel { stage, .. }) => assert_eq!(stage, KernelStage::Function),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("built a kernel for a missing function"),
        }
    }
}
