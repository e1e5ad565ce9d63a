//! Pipeline cache: one compiled kernel per registry slot.
//!
//! Built once when the engine is constructed and read-only afterwards. A
//! function that fails to build, or that the registry does not know, leaves
//! its slot empty; dispatches against an empty slot fail with
//! `PipelineUnavailable`. Entries are owned, so teardown releases each one
//! exactly once when the cache drops.

use log::{info, warn};

use crate::backend::ComputeBackend;
use crate::error::{FerrumError, Result};
use crate::registry::{FunctionId, FunctionRegistry};

pub struct PipelineCache<K> {
    slots: Vec<Option<K>>,
    failed: Vec<String>,
    skipped: Vec<String>,
}

impl<K> PipelineCache<K> {
    /// Compile every function of the backend's library.
    ///
    /// Fails only when the library has no functions at all.
    pub fn build<B>(backend: &B, registry: &FunctionRegistry) -> Result<Self>
    where
        B: ComputeBackend<Kernel = K>,
    {
        let names = backend.function_names();
        if names.is_empty() {
            return Err(FerrumError::NoFunctions);
        }

        let mut slots: Vec<Option<K>> = std::iter::repeat_with(|| None)
            .take(registry.len())
            .collect();
        let mut failed = Vec::new();
        let mut skipped = Vec::new();

        for name in names {
            let kernel = match backend.build_kernel(&name) {
                Ok(kernel) => kernel,
                Err(e) => {
                    warn!("{}", e);
                    failed.push(name);
                    continue;
                }
            };

            match registry.lookup(&name).index().and_then(|i| slots.get_mut(i)) {
                Some(slot) => *slot = Some(kernel),
                None => {
                    warn!("function '{}' is not in the function registry, skipping", name);
                    skipped.push(name);
                }
            }
        }

        let cache = PipelineCache {
            slots,
            failed,
            skipped,
        };
        info!(
            "pipeline cache: {} loaded, {} failed, {} skipped",
            cache.loaded(),
            cache.failed.len(),
            cache.skipped.len()
        );
        Ok(cache)
    }

    pub fn get(&self, id: FunctionId) -> Option<&K> {
        id.index()
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
    }

    pub fn contains(&self, id: FunctionId) -> bool {
        self.get(id).is_some()
    }

    /// Number of populated slots.
    pub fn loaded(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots (the registry size).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Functions whose function object or pipeline could not be built.
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Library functions the registry has no identifier for.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}
