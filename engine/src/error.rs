//! Error types for the ferrum engine and its C ABI.

use thiserror::Error;

use crate::registry::FunctionId;

/// Result type alias using ferrum's Error
pub type Result<T> = std::result::Result<T, FerrumError>;

/// Stage at which a single kernel failed to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStage {
    /// `newFunctionWithName` returned nothing.
    Function,
    /// The pipeline state could not be compiled.
    Pipeline,
}

impl std::fmt::Display for KernelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelStage::Function => f.write_str("function"),
            KernelStage::Pipeline => f.write_str("pipeline"),
        }
    }
}

/// Errors that can occur while building or driving a compute engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerrumError {
    /// No compute device is present on this host
    #[error("Metal is not supported on this device")]
    DeviceUnavailable,

    /// The kernel library file could not be located
    #[error("failed to find kernel library{}", .0.as_deref().map(|p| format!(" for '{p}'")).unwrap_or_default())]
    LibraryNotFound(Option<String>),

    /// The backend rejected the library file
    #[error("failed to load kernel library: {0}")]
    LibraryLoad(String),

    /// The library loaded but exposes no kernel functions
    #[error("no functions found in library")]
    NoFunctions,

    /// One kernel failed to build; non-fatal during construction
    #[error("{stage} creation failed for '{name}': {message}")]
    Kernel {
        name: String,
        stage: KernelStage,
        message: String,
    },

    /// The function name is not part of the registry
    #[error("unknown function: {0}")]
    UnrecognizedFunction(String),

    /// No compiled pipeline exists for this identifier
    #[error("pipeline not found for function id {0}")]
    PipelineUnavailable(FunctionId),

    /// A GPU buffer could not be created
    #[error("buffer allocation failed")]
    BufferAllocation,

    /// Command buffer, encoder or execution failure
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),

    /// A view or scalar argument is malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The session handle is unknown or already closed
    #[error("invalid engine handle {0}")]
    InvalidHandle(i64),
}

impl FerrumError {
    /// Whether the error should surface as an illegal-argument condition
    /// at the foreign boundary.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(
            self,
            FerrumError::UnrecognizedFunction(_) | FerrumError::InvalidArgument(_)
        )
    }
}
