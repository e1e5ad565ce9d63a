//! C ABI for managed-runtime callers.
//!
//! Engines are referenced by opaque `i64` handles from the session registry.
//! Entry points never unwind: failures return null (or 0 / -1) and record a
//! thread-local last error readable with [`ferrum_last_error_kind`] and
//! [`ferrum_last_error_message`]. Result arrays are `calloc`ed and must be
//! released with [`ferrum_free_array`].
//!
//! Output sizing follows the caller's input arrays:
//! - one array operand: the result has `a`'s backing length and is written
//!   at `a`'s offset and stride
//! - two array operands: the result has the shorter backing length and
//!   uses that array's offset and stride; on a tie `b`'s layout is used

use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::{self, NonNull};

use parking_lot::Mutex;

use crate::backend::{ComputeBackend, SystemBackend};
use crate::config::ResolverConfig;
use crate::dispatch::{Shape, View, ViewMut};
use crate::engine::{Engine, ScaleShift};
use crate::error::{FerrumError, Result};
use crate::registry::{FunctionId, FunctionRegistry};
use crate::resolver::LibraryResolver;
use crate::session::{sessions, SessionRegistry};

pub const FERRUM_ERR_NONE: i32 = 0;
/// Unknown function name or malformed argument.
pub const FERRUM_ERR_ILLEGAL_ARGUMENT: i32 = 1;
/// Engine unusable or no pipeline for the function.
pub const FERRUM_ERR_PIPELINE: i32 = 2;
/// Buffer allocation, encoding or execution failure.
pub const FERRUM_ERR_DISPATCH: i32 = 3;
/// Unknown or closed engine handle.
pub const FERRUM_ERR_HANDLE: i32 = 4;

pub fn error_kind(err: &FerrumError) -> i32 {
    match err {
        e if e.is_illegal_argument() => FERRUM_ERR_ILLEGAL_ARGUMENT,
        FerrumError::InvalidHandle(_) => FERRUM_ERR_HANDLE,
        FerrumError::BufferAllocation | FerrumError::DispatchFailed(_) => FERRUM_ERR_DISPATCH,
        _ => FERRUM_ERR_PIPELINE,
    }
}

struct LastError {
    kind: i32,
    message: String,
}

thread_local! {
    static LAST_ERROR: RefCell<LastError> = RefCell::new(LastError {
        kind: FERRUM_ERR_NONE,
        message: String::new(),
    });
}

fn set_last_error(kind: i32, message: String) {
    LAST_ERROR.with(|state| {
        let mut state = state.borrow_mut();
        state.kind = kind;
        state.message = message;
    });
}

fn record(err: &FerrumError) {
    log::debug!("ffi call failed: {}", err);
    set_last_error(error_kind(err), err.to_string());
}

fn clear_last_error() {
    set_last_error(FERRUM_ERR_NONE, String::new());
}

/// Run `f`, turning errors and panics into last-error state.
fn guard<T>(fallback: T, f: impl FnOnce() -> Result<T>) -> T {
    clear_last_error();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            record(&e);
            fallback
        }
        Err(_) => {
            set_last_error(FERRUM_ERR_DISPATCH, "internal panic in ferrum".to_string());
            fallback
        }
    }
}

/// Like [`guard`] for entry points returning a result array.
unsafe fn guard_array(out_len: *mut i64, f: impl FnOnce() -> Result<ResultArray>) -> *mut f32 {
    let (ptr, len) = match guard(None, || f().map(Some)) {
        Some(array) => array.into_raw(),
        None => (ptr::null_mut(), 0),
    };
    if !out_len.is_null() {
        *out_len = len as i64;
    }
    ptr
}

unsafe fn c_str<'a>(s: *const c_char) -> Result<&'a str> {
    if s.is_null() {
        return Err(FerrumError::InvalidArgument("null string".into()));
    }
    CStr::from_ptr(s)
        .to_str()
        .map_err(|_| FerrumError::InvalidArgument("string is not valid UTF-8".into()))
}

fn checked_len(len: i64) -> Result<usize> {
    usize::try_from(len)
        .map_err(|_| FerrumError::InvalidArgument(format!("negative array length {len}")))
}

/// Caller-owned, read-only float array with its view parameters.
#[derive(Debug, Clone, Copy)]
pub struct RawArray {
    pub ptr: *const f32,
    pub len: i64,
    pub offset: i64,
    pub stride: i64,
}

impl RawArray {
    pub fn new(ptr: *const f32, len: i64, offset: i64, stride: i64) -> Self {
        RawArray {
            ptr,
            len,
            offset,
            stride,
        }
    }

    pub fn from_slice(data: &[f32]) -> Self {
        RawArray::new(data.as_ptr(), data.len() as i64, 0, 1)
    }

    pub fn with_view(self, offset: i64, stride: i64) -> Self {
        RawArray {
            offset,
            stride,
            ..self
        }
    }

    /// # Safety
    /// `ptr` must point to `len` readable floats that outlive `'a`.
    unsafe fn view<'a>(self) -> Result<View<'a>> {
        let len = checked_len(self.len)?;
        let data: &'a [f32] = if len == 0 {
            &[]
        } else if self.ptr.is_null() {
            return Err(FerrumError::InvalidArgument("null array".into()));
        } else {
            std::slice::from_raw_parts(self.ptr, len)
        };
        View::new(data, self.offset, self.stride)
    }
}

/// Caller-owned float array the kernel writes in place.
#[derive(Debug, Clone, Copy)]
pub struct RawArrayMut {
    pub ptr: *mut f32,
    pub len: i64,
    pub offset: i64,
    pub stride: i64,
}

impl RawArrayMut {
    pub fn new(ptr: *mut f32, len: i64, offset: i64, stride: i64) -> Self {
        RawArrayMut {
            ptr,
            len,
            offset,
            stride,
        }
    }

    pub fn from_slice(data: &mut [f32]) -> Self {
        RawArrayMut::new(data.as_mut_ptr(), data.len() as i64, 0, 1)
    }

    /// # Safety
    /// `ptr` must point to `len` writable floats, not aliased for `'a`.
    unsafe fn view<'a>(self) -> Result<ViewMut<'a>> {
        let len = checked_len(self.len)?;
        let data: &'a mut [f32] = if len == 0 {
            &mut []
        } else if self.ptr.is_null() {
            return Err(FerrumError::InvalidArgument("null array".into()));
        } else {
            std::slice::from_raw_parts_mut(self.ptr, len)
        };
        ViewMut::new(data, self.offset, self.stride)
    }
}

/// `calloc`ed float array handed to the caller.
pub struct ResultArray {
    ptr: NonNull<f32>,
    len: usize,
}

impl ResultArray {
    pub fn zeroed(len: usize) -> Result<Self> {
        // Never null on success, even when empty.
        let raw = unsafe { libc::calloc(len.max(1), std::mem::size_of::<f32>()) } as *mut f32;
        let ptr = NonNull::new(raw).ok_or(FerrumError::BufferAllocation)?;
        Ok(ResultArray { ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f32] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Output view placed like the input it was sized from.
    fn view(&mut self, offset: u32, stride: u32) -> Result<ViewMut<'_>> {
        ViewMut::new(self.as_mut_slice(), offset as i64, stride as i64)
    }

    /// Give up ownership; free with [`ferrum_free_array`].
    pub fn into_raw(self) -> (*mut f32, usize) {
        let parts = (self.ptr.as_ptr(), self.len);
        std::mem::forget(self);
        parts
    }
}

impl Drop for ResultArray {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr.as_ptr() as *mut libc::c_void) }
    }
}

/// Result placement for two array operands: the shorter backing array wins,
/// `b` on a tie.
fn placement(a: &View<'_>, b_len: usize, b_offset: u32, b_stride: u32) -> (usize, u32, u32) {
    if a.data.len() < b_len {
        (a.data.len(), a.offset(), a.stride())
    } else {
        (b_len, b_offset, b_stride)
    }
}

/// Marshals raw caller arrays into engine calls against one session registry.
pub struct Bridge<'r, B: ComputeBackend> {
    sessions: &'r Mutex<SessionRegistry<B>>,
}

impl Bridge<'static, SystemBackend> {
    pub fn system() -> Self {
        Bridge::new(sessions())
    }
}

impl<'r, B: ComputeBackend> Bridge<'r, B> {
    pub fn new(sessions: &'r Mutex<SessionRegistry<B>>) -> Self {
        Bridge { sessions }
    }

    /// Construct an engine and register it. Always yields a live handle.
    pub fn open(&self, resolver: &LibraryResolver, name_or_path: Option<&str>) -> i64 {
        let engine = Engine::open(resolver, name_or_path, FunctionRegistry::builtin());
        self.insert(engine)
    }

    pub fn insert(&self, engine: Engine<B>) -> i64 {
        self.sessions.lock().insert(engine)
    }

    pub fn close(&self, handle: i64) {
        self.sessions.lock().remove(handle);
    }

    fn with_engine<T>(&self, handle: i64, f: impl FnOnce(&Engine<B>) -> Result<T>) -> Result<T> {
        // The registry lock is released before the engine lock is taken.
        let shared = self.sessions.lock().get(handle)?;
        let engine = shared.lock();
        f(&engine)
    }

    pub fn is_usable(&self, handle: i64) -> Result<bool> {
        self.with_engine(handle, |engine| Ok(engine.is_usable()))
    }

    pub fn function_id(&self, handle: i64, name: &str) -> Result<FunctionId> {
        self.with_engine(handle, |engine| engine.function_id(name))
    }

    /// `out = f(sa)` over `len` elements, written at `offset`/`stride`.
    #[allow(non_snake_case)]
    pub fn fB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        len: i64,
        offset: i64,
        stride: i64,
        sa: f32,
    ) -> Result<ResultArray> {
        let mut out = ResultArray::zeroed(checked_len(len)?)?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.fB(id, shape, sa, ViewMut::new(out.as_mut_slice(), offset, stride)?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn bB(&self, handle: i64, name: &str, shape: Shape, a: RawArray) -> Result<ResultArray> {
        let a = a.view()?;
        let mut out = ResultArray::zeroed(a.data.len())?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bB(id, shape, a, out.view(a.offset(), a.stride())?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn bfB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        a: RawArray,
        sa: f32,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let mut out = ResultArray::zeroed(a.data.len())?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bfB(id, shape, a, sa, out.view(a.offset(), a.stride())?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn fbB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        sa: f32,
        a: RawArray,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let mut out = ResultArray::zeroed(a.data.len())?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.fbB(id, shape, sa, a, out.view(a.offset(), a.stride())?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn bbB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        a: RawArray,
        b: RawArray,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let b = b.view()?;
        let (len, offset, stride) = placement(&a, b.data.len(), b.offset(), b.stride());
        let mut out = ResultArray::zeroed(len)?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bbB(id, shape, a, b, out.view(offset, stride)?)
        })?;
        Ok(out)
    }

    /// `b` is updated in the caller's memory as well.
    ///
    /// # Safety
    /// Every raw array must describe live caller memory for the call, and
    /// `b` must not overlap `a`.
    #[allow(non_snake_case)]
    pub unsafe fn bBB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        a: RawArray,
        b: RawArrayMut,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let b = b.view()?;
        let (len, offset, stride) = placement(&a, b.data.len(), b.offset(), b.stride());
        let mut out = ResultArray::zeroed(len)?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bBB(id, shape, a, b, out.view(offset, stride)?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn bffffB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        a: RawArray,
        params: ScaleShift,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let mut out = ResultArray::zeroed(a.data.len())?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bffffB(id, shape, a, params, out.view(a.offset(), a.stride())?)
        })?;
        Ok(out)
    }

    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    #[allow(non_snake_case)]
    pub unsafe fn bbffffB(
        &self,
        handle: i64,
        name: &str,
        shape: Shape,
        a: RawArray,
        b: RawArray,
        params: ScaleShift,
    ) -> Result<ResultArray> {
        let a = a.view()?;
        let b = b.view()?;
        let (len, offset, stride) = placement(&a, b.data.len(), b.offset(), b.stride());
        let mut out = ResultArray::zeroed(len)?;
        self.with_engine(handle, |engine| {
            let id = engine.function_id(name)?;
            engine.bbffffB(id, shape, a, b, params, out.view(offset, stride)?)
        })?;
        Ok(out)
    }

    /// Contiguous `a + b` over the common prefix.
    ///
    /// # Safety
    /// Every raw array must describe live caller memory for the call.
    pub unsafe fn vect_add(&self, handle: i64, a: RawArray, b: RawArray) -> Result<ResultArray> {
        let a = a.view()?;
        let b = b.view()?;
        let mut out = ResultArray::zeroed(a.data.len().min(b.data.len()))?;
        self.with_engine(handle, |engine| {
            engine.vect_add(a.data, b.data, out.as_mut_slice())
        })?;
        Ok(out)
    }
}

// Each family gets a vect_, ge_ and uplo_ entry point. The ge_ variants take
// `sd, fd` and the uplo_ variants `sd, unit, bottom` ahead of the operands.
macro_rules! family_entry_points {
    (
        $vect:ident, $ge:ident, $uplo:ident,
        |$bridge:ident, $handle:ident, $name:ident, $shape:ident|
        ($($param:ident: $ty:ty),*) => $call:expr
    ) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $vect(
            $handle: i64,
            $name: *const c_char,
            $($param: $ty,)*
            out_len: *mut i64,
        ) -> *mut f32 {
            guard_array(out_len, || {
                let $bridge = Bridge::system();
                let $name = c_str($name)?;
                let $shape = Shape::Vector;
                unsafe { $call }
            })
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $ge(
            $handle: i64,
            $name: *const c_char,
            sd: i64,
            fd: i64,
            $($param: $ty,)*
            out_len: *mut i64,
        ) -> *mut f32 {
            guard_array(out_len, || {
                let $bridge = Bridge::system();
                let $name = c_str($name)?;
                let $shape = Shape::general(sd, fd)?;
                unsafe { $call }
            })
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "C" fn $uplo(
            $handle: i64,
            $name: *const c_char,
            sd: i64,
            unit: i32,
            bottom: i32,
            $($param: $ty,)*
            out_len: *mut i64,
        ) -> *mut f32 {
            guard_array(out_len, || {
                let $bridge = Bridge::system();
                let $name = c_str($name)?;
                let $shape = Shape::uplo(sd, unit != 0, bottom != 0)?;
                unsafe { $call }
            })
        }
    };
}

family_entry_points!(
    ferrum_vect_bB, ferrum_ge_bB, ferrum_uplo_bB,
    |bridge, handle, name, shape|
    (a: *const f32, a_len: i64, a_offset: i64, a_stride: i64)
    => bridge.bB(handle, name, shape, RawArray::new(a, a_len, a_offset, a_stride))
);

family_entry_points!(
    ferrum_vect_bfB, ferrum_ge_bfB, ferrum_uplo_bfB,
    |bridge, handle, name, shape|
    (a: *const f32, a_len: i64, a_offset: i64, a_stride: i64, sa: f32)
    => bridge.bfB(handle, name, shape, RawArray::new(a, a_len, a_offset, a_stride), sa)
);

family_entry_points!(
    ferrum_vect_fbB, ferrum_ge_fbB, ferrum_uplo_fbB,
    |bridge, handle, name, shape|
    (sa: f32, a: *const f32, a_len: i64, a_offset: i64, a_stride: i64)
    => bridge.fbB(handle, name, shape, sa, RawArray::new(a, a_len, a_offset, a_stride))
);

family_entry_points!(
    ferrum_vect_bbB, ferrum_ge_bbB, ferrum_uplo_bbB,
    |bridge, handle, name, shape|
    (
        a: *const f32, a_len: i64, a_offset: i64, a_stride: i64,
        b: *const f32, b_len: i64, b_offset: i64, b_stride: i64
    )
    => bridge.bbB(
        handle,
        name,
        shape,
        RawArray::new(a, a_len, a_offset, a_stride),
        RawArray::new(b, b_len, b_offset, b_stride),
    )
);

family_entry_points!(
    ferrum_vect_bBB, ferrum_ge_bBB, ferrum_uplo_bBB,
    |bridge, handle, name, shape|
    (
        a: *const f32, a_len: i64, a_offset: i64, a_stride: i64,
        b: *mut f32, b_len: i64, b_offset: i64, b_stride: i64
    )
    => bridge.bBB(
        handle,
        name,
        shape,
        RawArray::new(a, a_len, a_offset, a_stride),
        RawArrayMut::new(b, b_len, b_offset, b_stride),
    )
);

family_entry_points!(
    ferrum_vect_bffffB, ferrum_ge_bffffB, ferrum_uplo_bffffB,
    |bridge, handle, name, shape|
    (
        a: *const f32, a_len: i64, a_offset: i64, a_stride: i64,
        scale_a: f32, shift_a: f32, scale_b: f32, shift_b: f32
    )
    => bridge.bffffB(
        handle,
        name,
        shape,
        RawArray::new(a, a_len, a_offset, a_stride),
        ScaleShift::new(scale_a, shift_a, scale_b, shift_b),
    )
);

family_entry_points!(
    ferrum_vect_bbffffB, ferrum_ge_bbffffB, ferrum_uplo_bbffffB,
    |bridge, handle, name, shape|
    (
        a: *const f32, a_len: i64, a_offset: i64, a_stride: i64,
        b: *const f32, b_len: i64, b_offset: i64, b_stride: i64,
        scale_a: f32, shift_a: f32, scale_b: f32, shift_b: f32
    )
    => bridge.bbffffB(
        handle,
        name,
        shape,
        RawArray::new(a, a_len, a_offset, a_stride),
        RawArray::new(b, b_len, b_offset, b_stride),
        ScaleShift::new(scale_a, shift_a, scale_b, shift_b),
    )
);

/// Open an engine. `path` may be null (default search), a library file or a
/// directory. Always returns a live handle unless the process is out of
/// memory; check [`ferrum_is_usable`].
#[no_mangle]
pub unsafe extern "C" fn ferrum_init(path: *const c_char) -> i64 {
    guard(0, || {
        let bridge = Bridge::system();
        let resolver = LibraryResolver::new(ResolverConfig::default());
        if path.is_null() {
            return Ok(bridge.open(&resolver, None));
        }
        match c_str(path) {
            Ok(path) => Ok(bridge.open(&resolver, Some(path))),
            Err(e) => Ok(bridge.insert(Engine::unusable(e, FunctionRegistry::builtin()))),
        }
    })
}

/// Release an engine. Unknown and already closed handles are ignored.
#[no_mangle]
pub extern "C" fn ferrum_close(handle: i64) {
    guard((), || {
        Bridge::system().close(handle);
        Ok(())
    })
}

/// 1 if the engine came up with a device and pipelines, 0 if not, -1 for a
/// bad handle.
#[no_mangle]
pub extern "C" fn ferrum_is_usable(handle: i64) -> i32 {
    guard(-1, || Bridge::system().is_usable(handle).map(i32::from))
}

/// Registry identifier of `name`, or -1 (`UNKNOWN`) with the error set.
#[no_mangle]
pub unsafe extern "C" fn ferrum_function_id(handle: i64, name: *const c_char) -> i32 {
    guard(FunctionId::UNKNOWN.raw(), || {
        let name = c_str(name)?;
        Bridge::system().function_id(handle, name).map(FunctionId::raw)
    })
}

/// Zero-input fill over a fresh array of `len` elements.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn ferrum_vect_fB(
    handle: i64,
    name: *const c_char,
    len: i64,
    offset: i64,
    stride: i64,
    sa: f32,
    out_len: *mut i64,
) -> *mut f32 {
    guard_array(out_len, || {
        let name = c_str(name)?;
        Bridge::system().fB(handle, name, Shape::Vector, len, offset, stride, sa)
    })
}

/// `a + b` over `min(a_len, b_len)` elements.
#[no_mangle]
pub unsafe extern "C" fn ferrum_vect_add(
    handle: i64,
    a: *const f32,
    a_len: i64,
    b: *const f32,
    b_len: i64,
    out_len: *mut i64,
) -> *mut f32 {
    guard_array(out_len, || unsafe {
        Bridge::system().vect_add(handle, RawArray::new(a, a_len, 0, 1), RawArray::new(b, b_len, 0, 1))
    })
}

/// Free an array returned by any entry point. Null is ignored.
#[no_mangle]
pub unsafe extern "C" fn ferrum_free_array(array: *mut f32) {
    if !array.is_null() {
        libc::free(array as *mut libc::c_void);
    }
}

/// Kind of the last error on this thread, `FERRUM_ERR_NONE` after a
/// successful call.
#[no_mangle]
pub extern "C" fn ferrum_last_error_kind() -> i32 {
    LAST_ERROR.with(|state| state.borrow().kind)
}

/// Copy the last error message into `buf` (NUL-terminated, truncated to
/// `cap - 1` bytes). Returns the full message length in bytes.
#[no_mangle]
pub unsafe extern "C" fn ferrum_last_error_message(buf: *mut c_char, cap: i64) -> i64 {
    LAST_ERROR.with(|state| {
        let state = state.borrow();
        let bytes = state.message.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap as usize - 1);
            ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, n);
            *buf.add(n) = 0;
        }
        bytes.len() as i64
    })
}
