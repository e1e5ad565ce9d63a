//! Dispatch descriptors: what one kernel invocation reads, writes and binds.
//!
//! A descriptor is backend independent: it lists the shape parameters, the
//! operands in declaration order and the output view, and derives the slot
//! order the kernel expects:
//!
//! ```text
//! [shape...] [operand...] output
//!   ge_:   sd, fd
//!   uplo_: sd, unit, bottom
//!   array operand: buffer, offset, stride
//!   scalar operand: float
//!   output: buffer, offset, stride
//! ```
//!
//! The family mnemonics spell the operand order: `b` input array, `B` in/out
//! or output array, `f` scalar. `fbB` therefore binds the scalar before `a`.

use crate::error::{FerrumError, Result};
use crate::registry::FunctionId;

fn check_view(len: usize, offset: i64, stride: i64) -> Result<(u32, u32)> {
    if stride < 1 {
        return Err(FerrumError::InvalidArgument(format!(
            "stride must be positive, got {stride}"
        )));
    }
    if offset < 0 || offset as u64 > len as u64 {
        return Err(FerrumError::InvalidArgument(format!(
            "offset {offset} out of range for length {len}"
        )));
    }
    let offset = u32::try_from(offset)
        .map_err(|_| FerrumError::InvalidArgument(format!("offset {offset} too large")))?;
    let stride = u32::try_from(stride)
        .map_err(|_| FerrumError::InvalidArgument(format!("stride {stride} too large")))?;
    Ok((offset, stride))
}

/// Number of elements reachable from `offset` in steps of `stride`.
fn logical_len(len: usize, offset: u32, stride: u32) -> usize {
    let offset = offset as usize;
    if offset >= len {
        0
    } else {
        (len - offset - 1) / stride as usize + 1
    }
}

/// Strided, read-only host array.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub data: &'a [f32],
    offset: u32,
    stride: u32,
}

impl<'a> View<'a> {
    pub fn new(data: &'a [f32], offset: i64, stride: i64) -> Result<Self> {
        let (offset, stride) = check_view(data.len(), offset, stride)?;
        Ok(View {
            data,
            offset,
            stride,
        })
    }

    pub fn contiguous(data: &'a [f32]) -> Self {
        View {
            data,
            offset: 0,
            stride: 1,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Logical element count.
    pub fn len(&self) -> usize {
        logical_len(self.data.len(), self.offset, self.stride)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strided, writable host array.
#[derive(Debug)]
pub struct ViewMut<'a> {
    pub data: &'a mut [f32],
    offset: u32,
    stride: u32,
}

impl<'a> ViewMut<'a> {
    pub fn new(data: &'a mut [f32], offset: i64, stride: i64) -> Result<Self> {
        let (offset, stride) = check_view(data.len(), offset, stride)?;
        Ok(ViewMut {
            data,
            offset,
            stride,
        })
    }

    pub fn contiguous(data: &'a mut [f32]) -> Self {
        ViewMut {
            data,
            offset: 0,
            stride: 1,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        logical_len(self.data.len(), self.offset, self.stride)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape parameters bound ahead of the operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `vect_` family: no shape slots.
    Vector,
    /// `ge_` family: square dimension and secondary dimension.
    General { sd: u32, fd: u32 },
    /// `uplo_` family: dimension, unit diagonal, lower (`bottom`) triangle.
    Uplo { sd: u32, unit: bool, bottom: bool },
}

impl Shape {
    pub fn general(sd: i64, fd: i64) -> Result<Self> {
        Ok(Shape::General {
            sd: dimension("sd", sd)?,
            fd: dimension("fd", fd)?,
        })
    }

    pub fn uplo(sd: i64, unit: bool, bottom: bool) -> Result<Self> {
        Ok(Shape::Uplo {
            sd: dimension("sd", sd)?,
            unit,
            bottom,
        })
    }

    /// Values of the leading shape slots, in order.
    pub fn slot_values(&self) -> Vec<u32> {
        match *self {
            Shape::Vector => Vec::new(),
            Shape::General { sd, fd } => vec![sd, fd],
            Shape::Uplo { sd, unit, bottom } => vec![sd, unit as u32, bottom as u32],
        }
    }

    /// Family prefix used in kernel and entry point names.
    pub fn family(&self) -> &'static str {
        match self {
            Shape::Vector => "vect",
            Shape::General { .. } => "ge",
            Shape::Uplo { .. } => "uplo",
        }
    }
}

fn dimension(what: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| FerrumError::InvalidArgument(format!("{what} must be non-negative, got {value}")))
}

/// One operand of a dispatch, in declaration order.
#[derive(Debug)]
pub enum Operand<'a> {
    /// `b`: read-only array.
    Input(View<'a>),
    /// `B` before the output: array the kernel also writes; copied back.
    InOut(ViewMut<'a>),
    /// `f`: scalar parameter.
    Scalar(f32),
}

impl Operand<'_> {
    /// Logical length for array operands.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Operand::Input(view) => Some(view.len()),
            Operand::InOut(view) => Some(view.len()),
            Operand::Scalar(_) => None,
        }
    }
}

/// What each kernel slot is bound to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    /// Device buffer holding operand `i`.
    Operand(usize),
    /// Device buffer holding the output.
    Output,
    Uint(u32),
    Float(f32),
}

/// A complete description of one kernel invocation.
#[derive(Debug)]
pub struct DispatchDescriptor<'a> {
    pub function: FunctionId,
    pub shape: Shape,
    pub operands: Vec<Operand<'a>>,
    pub output: ViewMut<'a>,
}

impl<'a> DispatchDescriptor<'a> {
    pub fn new(function: FunctionId, shape: Shape, output: ViewMut<'a>) -> Self {
        DispatchDescriptor {
            function,
            shape,
            operands: Vec::new(),
            output,
        }
    }

    pub fn input(mut self, view: View<'a>) -> Self {
        self.operands.push(Operand::Input(view));
        self
    }

    pub fn in_out(mut self, view: ViewMut<'a>) -> Self {
        self.operands.push(Operand::InOut(view));
        self
    }

    pub fn scalar(mut self, value: f32) -> Self {
        self.operands.push(Operand::Scalar(value));
        self
    }

    /// Operand mnemonic, e.g. `bbffffB`.
    pub fn mnemonic(&self) -> String {
        let mut s: String = self
            .operands
            .iter()
            .map(|op| match op {
                Operand::Input(_) => 'b',
                Operand::InOut(_) => 'B',
                Operand::Scalar(_) => 'f',
            })
            .collect();
        s.push('B');
        s
    }

    /// One thread per output element, never more than the shortest array
    /// operand provides.
    pub fn thread_count(&self) -> usize {
        self.operands
            .iter()
            .filter_map(Operand::array_len)
            .fold(self.output.len(), usize::min)
    }

    /// Slot bindings in kernel argument order.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self.shape.slot_values().into_iter().map(Slot::Uint).collect();
        for (i, operand) in self.operands.iter().enumerate() {
            match operand {
                Operand::Input(view) => {
                    slots.extend([Slot::Operand(i), Slot::Uint(view.offset), Slot::Uint(view.stride)])
                }
                Operand::InOut(view) => {
                    slots.extend([Slot::Operand(i), Slot::Uint(view.offset), Slot::Uint(view.stride)])
                }
                Operand::Scalar(v) => slots.push(Slot::Float(*v)),
            }
        }
        slots.extend([
            Slot::Output,
            Slot::Uint(self.output.offset),
            Slot::Uint(self.output.stride),
        ]);
        slots
    }
}
