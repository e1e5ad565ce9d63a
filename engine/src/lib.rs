//! Ferrum - Metal compute bridge for managed-runtime callers
//!
//! Loads a precompiled Metal kernel library, builds one compute pipeline per
//! library function and runs element-wise vector, matrix (`ge_`) and
//! triangular (`uplo_`) kernels over caller-provided float arrays. Ships as a
//! cdylib with a C ABI (see [`ffi`]) and as an rlib for Rust callers (see
//! [`Engine`]).
//!
//! # Symbol registration
//!
//! Hosts that `dlopen` the library can call `ferrum_plugin_init()` for a flat
//! table of every exported entry point instead of resolving them one by one.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod functions;
pub mod msl;
pub mod pipeline_cache;
pub mod registry;
pub mod resolver;
pub mod session;

#[cfg(all(target_os = "macos", feature = "metal-backend"))]
pub mod metal;

pub use backend::{is_available, ComputeBackend, KernelArg, SystemBackend, Unavailable};
pub use config::ResolverConfig;
pub use dispatch::{DispatchDescriptor, Operand, Shape, Slot, View, ViewMut};
pub use engine::{Engine, ScaleShift};
pub use error::{FerrumError, KernelStage, Result};
pub use functions::Function;
pub use pipeline_cache::PipelineCache;
pub use registry::{FunctionId, FunctionRegistry};
pub use resolver::{LibraryResolver, ResourceBundle};

use lazy_static::lazy_static;
use std::ffi::c_void;

/// Symbol table entry for dynamic registration
#[repr(C)]
pub struct SymbolEntry {
    pub name: *const u8,
    pub name_len: usize,
    pub ptr: *const c_void,
}

struct SymbolTable(Vec<SymbolEntry>);

// SAFETY: entries only point at static strings and functions.
unsafe impl Send for SymbolTable {}
unsafe impl Sync for SymbolTable {}

lazy_static! {
    static ref SYMBOLS: SymbolTable = SymbolTable(collect_symbols());
}

/// Returns the flat symbol table. The table lives for the whole process.
#[no_mangle]
pub extern "C" fn ferrum_plugin_init(out_count: *mut usize) -> *const SymbolEntry {
    let symbols = &SYMBOLS.0;
    if !out_count.is_null() {
        unsafe {
            *out_count = symbols.len();
        }
    }
    symbols.as_ptr()
}

macro_rules! symbols {
    ($($f:ident),* $(,)?) => {
        vec![$((stringify!($f), ffi::$f as *const u8)),*]
    };
}

/// Rust-callable API returning runtime symbols.
pub fn get_runtime_symbols() -> Vec<(&'static str, *const u8)> {
    symbols![
        // Engine lifecycle
        ferrum_init,
        ferrum_close,
        ferrum_is_usable,
        ferrum_function_id,
        // Vector family
        ferrum_vect_add,
        ferrum_vect_fB,
        ferrum_vect_bB,
        ferrum_vect_bfB,
        ferrum_vect_fbB,
        ferrum_vect_bbB,
        ferrum_vect_bBB,
        ferrum_vect_bffffB,
        ferrum_vect_bbffffB,
        // Matrix family
        ferrum_ge_bB,
        ferrum_ge_bfB,
        ferrum_ge_fbB,
        ferrum_ge_bbB,
        ferrum_ge_bBB,
        ferrum_ge_bffffB,
        ferrum_ge_bbffffB,
        // Triangular family
        ferrum_uplo_bB,
        ferrum_uplo_bfB,
        ferrum_uplo_fbB,
        ferrum_uplo_bbB,
        ferrum_uplo_bBB,
        ferrum_uplo_bffffB,
        ferrum_uplo_bbffffB,
        // Results and errors
        ferrum_free_array,
        ferrum_last_error_kind,
        ferrum_last_error_message,
    ]
}

fn collect_symbols() -> Vec<SymbolEntry> {
    get_runtime_symbols()
        .into_iter()
        .map(|(name, ptr)| SymbolEntry {
            name: name.as_ptr(),
            name_len: name.len(),
            ptr: ptr as *const c_void,
        })
        .collect()
}
