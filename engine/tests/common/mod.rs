//! CPU stand-in for the Metal backend.
//!
//! A "library" is a newline-separated list of function names; a name written
//! as `!name` is listed but fails to build. Kernels execute on the host using
//! the same slot layout the Metal kernels use, and every run is recorded.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ferrum::{ComputeBackend, FerrumError, KernelArg, KernelStage, LibraryResolver, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Buffer(Vec<f32>),
    Uint(u32),
    Float(f32),
}

#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub name: String,
    pub args: Vec<Recorded>,
    pub threads: usize,
}

/// Live object counters shared with a backend after it moves into an engine.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub live_buffers: Arc<AtomicUsize>,
    pub live_kernels: Arc<AtomicUsize>,
}

impl Probe {
    pub fn buffers(&self) -> usize {
        self.live_buffers.load(Ordering::SeqCst)
    }

    pub fn kernels(&self) -> usize {
        self.live_kernels.load(Ordering::SeqCst)
    }
}

pub struct CpuBuffer {
    data: RefCell<Vec<f32>>,
    live: Arc<AtomicUsize>,
}

impl Drop for CpuBuffer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct CpuKernel {
    name: String,
    live: Arc<AtomicUsize>,
}

impl Drop for CpuKernel {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct CpuBackend {
    functions: Vec<String>,
    broken: Vec<String>,
    fail_buffers_after: Option<usize>,
    fail_runs: bool,
    allocated: AtomicUsize,
    runs: Mutex<Vec<RecordedRun>>,
    probe: Probe,
}

impl CpuBackend {
    pub fn with_library(listing: &str) -> Self {
        let mut functions = Vec::new();
        let mut broken = Vec::new();
        for line in listing.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.strip_prefix('!') {
                Some(name) => {
                    functions.push(name.to_string());
                    broken.push(name.to_string());
                }
                None => functions.push(line.to_string()),
            }
        }
        CpuBackend {
            functions,
            broken,
            fail_buffers_after: None,
            fail_runs: false,
            allocated: AtomicUsize::new(0),
            runs: Mutex::new(Vec::new()),
            probe: Probe::default(),
        }
    }

    pub fn with_functions(names: &[&str]) -> Self {
        Self::with_library(&names.join("\n"))
    }

    /// Every function the reference kernels below implement.
    pub fn reference() -> Self {
        Self::with_functions(&[
            "vector_add",
            "vector_sub",
            "vector_mul",
            "vector_div",
            "vector_abs",
            "vector_sqr",
            "vector_copy",
            "vector_set",
            "vector_powx",
            "vector_elu",
            "vector_sincos",
            "vector_scale_shift",
            "vector_linear_frac",
            "ge_add",
            "uplo_add",
        ])
    }

    /// Buffer creation fails once `n` buffers have been handed out.
    pub fn failing_buffers_after(mut self, n: usize) -> Self {
        self.fail_buffers_after = Some(n);
        self
    }

    pub fn failing_runs(mut self) -> Self {
        self.fail_runs = true;
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

fn mnemonic(name: &str) -> Option<&'static str> {
    let op = name
        .strip_prefix("vector_")
        .or_else(|| name.strip_prefix("ge_"))
        .or_else(|| name.strip_prefix("uplo_"))?;
    Some(match op {
        "add" | "sub" | "mul" | "div" => "bbB",
        "abs" | "sqr" | "copy" => "bB",
        "set" => "fB",
        "powx" => "bfB",
        "elu" => "fbB",
        "sincos" => "bBB",
        "scale_shift" => "bffffB",
        "linear_frac" => "bbffffB",
        _ => return None,
    })
}

fn shape_slots(name: &str) -> usize {
    if name.starts_with("ge_") {
        2
    } else if name.starts_with("uplo_") {
        3
    } else {
        0
    }
}

fn uint(arg: &KernelArg<'_, CpuBuffer>) -> usize {
    match arg {
        KernelArg::Uint(v) => *v as usize,
        other => panic!("expected uint slot, got {other:?}"),
    }
}

fn float(arg: &KernelArg<'_, CpuBuffer>) -> f32 {
    match arg {
        KernelArg::Float(v) => *v,
        other => panic!("expected float slot, got {other:?}"),
    }
}

struct Bound<'a> {
    buffer: &'a CpuBuffer,
    offset: usize,
    stride: usize,
}

impl Bound<'_> {
    fn get(&self, i: usize) -> f32 {
        self.buffer.data.borrow()[self.offset + i * self.stride]
    }

    fn set(&self, i: usize, value: f32) {
        self.buffer.data.borrow_mut()[self.offset + i * self.stride] = value;
    }
}

fn bind<'a>(args: &[KernelArg<'a, CpuBuffer>]) -> Bound<'a> {
    match args[0] {
        KernelArg::Buffer(buffer) => Bound {
            buffer,
            offset: uint(&args[1]),
            stride: uint(&args[2]),
        },
        other => panic!("expected buffer slot, got {other:?}"),
    }
}

impl ComputeBackend for CpuBackend {
    type Buffer = CpuBuffer;
    type Kernel = CpuKernel;

    fn open(resolver: &LibraryResolver, name_or_path: Option<&str>) -> Result<Self> {
        let path = resolver.resolve(name_or_path)?;
        let listing =
            std::fs::read_to_string(&path).map_err(|e| FerrumError::LibraryLoad(e.to_string()))?;
        Ok(Self::with_library(&listing))
    }

    fn device_name(&self) -> String {
        "cpu".to_string()
    }

    fn function_names(&self) -> Vec<String> {
        self.functions.clone()
    }

    fn build_kernel(&self, name: &str) -> Result<CpuKernel> {
        if self.broken.iter().any(|b| b == name) {
            return Err(FerrumError::Kernel {
                name: name.to_string(),
                stage: KernelStage::Pipeline,
                message: "injected failure".to_string(),
            });
        }
        self.probe.live_kernels.fetch_add(1, Ordering::SeqCst);
        Ok(CpuKernel {
            name: name.to_string(),
            live: self.probe.live_kernels.clone(),
        })
    }

    fn buffer_from_slice(&self, data: &[f32]) -> Option<CpuBuffer> {
        let n = self.allocated.fetch_add(1, Ordering::SeqCst);
        if self.fail_buffers_after.is_some_and(|limit| n >= limit) {
            return None;
        }
        self.probe.live_buffers.fetch_add(1, Ordering::SeqCst);
        Some(CpuBuffer {
            data: RefCell::new(data.to_vec()),
            live: self.probe.live_buffers.clone(),
        })
    }

    fn run(&self, kernel: &CpuKernel, args: &[KernelArg<'_, CpuBuffer>], threads: usize) -> Result<()> {
        self.runs.lock().unwrap().push(RecordedRun {
            name: kernel.name.clone(),
            args: args
                .iter()
                .map(|arg| match arg {
                    KernelArg::Buffer(b) => Recorded::Buffer(b.data.borrow().clone()),
                    KernelArg::Uint(v) => Recorded::Uint(*v),
                    KernelArg::Float(v) => Recorded::Float(*v),
                })
                .collect(),
            threads,
        });
        if self.fail_runs {
            return Err(FerrumError::DispatchFailed("injected failure".to_string()));
        }

        let layout = mnemonic(&kernel.name)
            .ok_or_else(|| FerrumError::DispatchFailed(format!("no cpu kernel for {}", kernel.name)))?;
        let mut rest = &args[shape_slots(&kernel.name)..];
        let mut arrays = Vec::new();
        let mut scalars = Vec::new();
        for op in layout[..layout.len() - 1].chars() {
            if op == 'f' {
                scalars.push(float(&rest[0]));
                rest = &rest[1..];
            } else {
                arrays.push(bind(rest));
                rest = &rest[3..];
            }
        }
        let out = bind(rest);
        let s = |i: usize| scalars[i];
        let op = kernel.name.split_once('_').map(|(_, op)| op).unwrap_or("");

        for i in 0..threads {
            let a = arrays.first().map(|x| x.get(i)).unwrap_or(0.0);
            let b = arrays.get(1).map(|x| x.get(i)).unwrap_or(0.0);
            let y = match op {
                "add" => a + b,
                "sub" => a - b,
                "mul" => a * b,
                "div" => a / b,
                "abs" => a.abs(),
                "sqr" => a * a,
                "copy" => a,
                "set" => s(0),
                "powx" => a.powf(s(0)),
                "elu" => {
                    if a > 0.0 {
                        a
                    } else {
                        s(0) * (a.exp() - 1.0)
                    }
                }
                "sincos" => {
                    arrays[1].set(i, a.cos());
                    a.sin()
                }
                "scale_shift" => s(0) * a + s(1),
                "linear_frac" => (s(0) * a + s(1)) / (s(2) * b + s(3)),
                _ => unreachable!(),
            };
            out.set(i, y);
        }
        Ok(())
    }

    fn read_buffer(&self, buffer: &CpuBuffer, out: &mut [f32]) -> Result<()> {
        let data = buffer.data.borrow();
        let n = out.len().min(data.len());
        out[..n].copy_from_slice(&data[..n]);
        Ok(())
    }
}
