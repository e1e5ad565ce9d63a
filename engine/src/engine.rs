//! Compute engine: owns the backend and its pipeline cache and runs
//! dispatch descriptors against them.
//!
//! Construction never panics. [`Engine::open`] logs a failed construction
//! and returns an engine in the unusable state, where every dispatch fails
//! with `PipelineUnavailable`; [`Engine::try_open`] returns the error instead.

use std::sync::Arc;

use log::{debug, error, info};

use crate::backend::{ComputeBackend, KernelArg, SystemBackend};
use crate::config::ResolverConfig;
use crate::dispatch::{DispatchDescriptor, Operand, Shape, Slot, View, ViewMut};
use crate::error::{FerrumError, Result};
use crate::pipeline_cache::PipelineCache;
use crate::registry::{FunctionId, FunctionRegistry};
use crate::resolver::LibraryResolver;

/// Scale and shift pairs for the `ffff` families: `a * scale_a + shift_a`
/// and `b * scale_b + shift_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleShift {
    pub scale_a: f32,
    pub shift_a: f32,
    pub scale_b: f32,
    pub shift_b: f32,
}

impl ScaleShift {
    pub fn new(scale_a: f32, shift_a: f32, scale_b: f32, shift_b: f32) -> Self {
        ScaleShift {
            scale_a,
            shift_a,
            scale_b,
            shift_b,
        }
    }
}

// Field order is drop order: pipelines go before the queue, library and device.
struct Loaded<B: ComputeBackend> {
    pipelines: PipelineCache<B::Kernel>,
    backend: B,
}

pub struct Engine<B: ComputeBackend = SystemBackend> {
    loaded: Option<Loaded<B>>,
    init_error: Option<FerrumError>,
    registry: Arc<FunctionRegistry>,
}

impl Engine<SystemBackend> {
    /// Platform engine with the default library search and builtin registry.
    pub fn new(name_or_path: Option<&str>) -> Self {
        let resolver = LibraryResolver::new(ResolverConfig::default());
        Engine::open(&resolver, name_or_path, FunctionRegistry::builtin())
    }

    pub fn try_new(name_or_path: Option<&str>) -> Result<Self> {
        let resolver = LibraryResolver::new(ResolverConfig::default());
        Engine::try_open(&resolver, name_or_path, FunctionRegistry::builtin())
    }
}

impl<B: ComputeBackend> Engine<B> {
    pub fn try_open(
        resolver: &LibraryResolver,
        name_or_path: Option<&str>,
        registry: Arc<FunctionRegistry>,
    ) -> Result<Self> {
        let backend = B::open(resolver, name_or_path)?;
        Engine::with_backend(backend, registry)
    }

    /// Like [`Engine::try_open`], but a failure yields an unusable engine.
    pub fn open(
        resolver: &LibraryResolver,
        name_or_path: Option<&str>,
        registry: Arc<FunctionRegistry>,
    ) -> Self {
        match Engine::try_open(resolver, name_or_path, registry.clone()) {
            Ok(engine) => engine,
            Err(e) => {
                error!("engine initialization failed: {}", e);
                Engine::unusable(e, registry)
            }
        }
    }

    /// Build the pipeline cache for an already opened backend.
    pub fn with_backend(backend: B, registry: Arc<FunctionRegistry>) -> Result<Self> {
        info!("running on device: {}", backend.device_name());
        let pipelines = PipelineCache::build(&backend, &registry)?;
        Ok(Engine {
            loaded: Some(Loaded { pipelines, backend }),
            init_error: None,
            registry,
        })
    }

    pub fn unusable(reason: FerrumError, registry: Arc<FunctionRegistry>) -> Self {
        Engine {
            loaded: None,
            init_error: Some(reason),
            registry,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.loaded.is_some()
    }

    /// Why construction failed, if it did.
    pub fn init_error(&self) -> Option<&FerrumError> {
        self.init_error.as_ref()
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn backend(&self) -> Option<&B> {
        self.loaded.as_ref().map(|l| &l.backend)
    }

    pub fn pipelines(&self) -> Option<&PipelineCache<B::Kernel>> {
        self.loaded.as_ref().map(|l| &l.pipelines)
    }

    /// Resolve a kernel name; unknown names are an illegal argument.
    pub fn function_id(&self, name: &str) -> Result<FunctionId> {
        let id = self.registry.lookup(name);
        if id.is_unknown() {
            return Err(FerrumError::UnrecognizedFunction(name.to_string()));
        }
        Ok(id)
    }

    /// Run one kernel invocation synchronously.
    ///
    /// Buffers are created from host memory for every array operand and the
    /// output, bound in [`DispatchDescriptor::slots`] order, and released on
    /// every exit path. The output and any in/out operands are copied back.
    pub fn dispatch(&self, desc: DispatchDescriptor<'_>) -> Result<()> {
        let function = desc.function;
        let loaded = self
            .loaded
            .as_ref()
            .ok_or(FerrumError::PipelineUnavailable(function))?;
        let kernel = loaded
            .pipelines
            .get(function)
            .ok_or(FerrumError::PipelineUnavailable(function))?;

        let threads = desc.thread_count();
        if threads == 0 {
            debug!("function {}: empty dispatch, nothing to do", function);
            return Ok(());
        }
        let slots = desc.slots();
        let DispatchDescriptor {
            mut operands,
            output,
            ..
        } = desc;
        let backend = &loaded.backend;

        let mut operand_buffers = Vec::with_capacity(operands.len());
        for operand in &operands {
            let data = match operand {
                Operand::Input(view) => Some(view.data),
                Operand::InOut(view) => Some(&*view.data),
                Operand::Scalar(_) => None,
            };
            let buffer = match data {
                Some(data) => Some(
                    backend
                        .buffer_from_slice(data)
                        .ok_or(FerrumError::BufferAllocation)?,
                ),
                None => None,
            };
            operand_buffers.push(buffer);
        }
        let output_buffer = backend
            .buffer_from_slice(output.data)
            .ok_or(FerrumError::BufferAllocation)?;

        {
            let mut args = Vec::with_capacity(slots.len());
            for slot in &slots {
                let arg = match *slot {
                    Slot::Operand(i) => KernelArg::Buffer(
                        operand_buffers
                            .get(i)
                            .and_then(Option::as_ref)
                            .ok_or_else(|| {
                                FerrumError::DispatchFailed(format!("slot bound to non-array operand {i}"))
                            })?,
                    ),
                    Slot::Output => KernelArg::Buffer(&output_buffer),
                    Slot::Uint(v) => KernelArg::Uint(v),
                    Slot::Float(v) => KernelArg::Float(v),
                };
                args.push(arg);
            }
            debug!(
                "dispatching function {} with {} slots over {} threads",
                function,
                args.len(),
                threads
            );
            backend.run(kernel, &args, threads)?;
        }

        backend.read_buffer(&output_buffer, output.data)?;
        for (operand, buffer) in operands.iter_mut().zip(&operand_buffers) {
            if let (Operand::InOut(view), Some(buffer)) = (operand, buffer) {
                backend.read_buffer(buffer, view.data)?;
            }
        }
        Ok(())
    }

    /// `out[i] = a[i] + b[i]` over the contiguous prefix all three share.
    pub fn vect_add(&self, a: &[f32], b: &[f32], out: &mut [f32]) -> Result<()> {
        let id = self.function_id("vector_add")?;
        let len = a.len().min(b.len()).min(out.len());
        let desc = DispatchDescriptor::new(
            id,
            Shape::Vector,
            ViewMut::contiguous(&mut out[..len]),
        )
        .input(View::contiguous(&a[..len]))
        .input(View::contiguous(&b[..len]));
        self.dispatch(desc)
    }
}

// The operand mnemonic is part of each name: `b` input, `B` in/out or
// output, `f` scalar.
#[allow(non_snake_case)]
impl<B: ComputeBackend> Engine<B> {
    /// Zero-input fill: `out = f(sa)`.
    pub fn fB(&self, id: FunctionId, shape: Shape, sa: f32, out: ViewMut<'_>) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).scalar(sa))
    }

    pub fn bB(&self, id: FunctionId, shape: Shape, a: View<'_>, out: ViewMut<'_>) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).input(a))
    }

    pub fn bfB(
        &self,
        id: FunctionId,
        shape: Shape,
        a: View<'_>,
        sa: f32,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).input(a).scalar(sa))
    }

    pub fn fbB(
        &self,
        id: FunctionId,
        shape: Shape,
        sa: f32,
        a: View<'_>,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).scalar(sa).input(a))
    }

    pub fn bbB(
        &self,
        id: FunctionId,
        shape: Shape,
        a: View<'_>,
        b: View<'_>,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).input(a).input(b))
    }

    /// `b` is written by the kernel as well and copied back.
    pub fn bBB(
        &self,
        id: FunctionId,
        shape: Shape,
        a: View<'_>,
        b: ViewMut<'_>,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(DispatchDescriptor::new(id, shape, out).input(a).in_out(b))
    }

    pub fn bffffB(
        &self,
        id: FunctionId,
        shape: Shape,
        a: View<'_>,
        params: ScaleShift,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(
            DispatchDescriptor::new(id, shape, out)
                .input(a)
                .scalar(params.scale_a)
                .scalar(params.shift_a)
                .scalar(params.scale_b)
                .scalar(params.shift_b),
        )
    }

    pub fn bbffffB(
        &self,
        id: FunctionId,
        shape: Shape,
        a: View<'_>,
        b: View<'_>,
        params: ScaleShift,
        out: ViewMut<'_>,
    ) -> Result<()> {
        self.dispatch(
            DispatchDescriptor::new(id, shape, out)
                .input(a)
                .input(b)
                .scalar(params.scale_a)
                .scalar(params.shift_a)
                .scalar(params.scale_b)
                .scalar(params.shift_b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Unavailable;
    use crate::functions::Function;

    #[test]
    fn test_unusable_engine_fails_cleanly() {
        let engine: Engine<Unavailable> =
            Engine::unusable(FerrumError::DeviceUnavailable, FunctionRegistry::builtin());
        assert!(!engine.is_usable());
        assert_eq!(engine.init_error(), Some(&FerrumError::DeviceUnavailable));
        assert!(engine.pipelines().is_none());

        let a = [1.0f32, 2.0];
        let b = [3.0f32, 4.0];
        let mut out = [0.0f32; 2];
        let err = engine.vect_add(&a, &b, &mut out).unwrap_err();
        assert_eq!(err, FerrumError::PipelineUnavailable(Function::VectorAdd.id()));
        assert_eq!(out, [0.0, 0.0]);
    }

    #[test]
    fn test_open_without_device_is_unusable() {
        let resolver = LibraryResolver::without_bundle(ResolverConfig::default());
        let engine: Engine<Unavailable> = Engine::open(&resolver, None, FunctionRegistry::builtin());
        assert!(!engine.is_usable());
        assert!(matches!(
            Engine::<Unavailable>::try_open(&resolver, None, FunctionRegistry::builtin()),
            Err(FerrumError::DeviceUnavailable)
        ));
    }

    #[test]
    fn test_function_id_lookup() {
        let engine: Engine<Unavailable> =
            Engine::unusable(FerrumError::DeviceUnavailable, FunctionRegistry::builtin());
        assert_eq!(engine.function_id("vector_add").unwrap(), Function::VectorAdd.id());
        assert_eq!(
            engine.function_id("vector_nope").unwrap_err(),
            FerrumError::UnrecognizedFunction("vector_nope".into())
        );
    }
}
