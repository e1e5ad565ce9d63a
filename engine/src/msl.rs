//! Reference Metal Shading Language kernels.
//!
//! The shipped kernel library is built offline; these kernels cover one
//! function per operand family and follow the same slot convention, so the
//! Metal backend can be exercised without a prebuilt `.metallib`:
//!
//! ```metal
//! kernel void vector_add(
//!     device const float* a_buf [[buffer(0)]],
//!     constant uint& a_offset   [[buffer(1)]],
//!     constant uint& a_stride   [[buffer(2)]],
//!     device const float* b_buf [[buffer(3)]],
//!     constant uint& b_offset   [[buffer(4)]],
//!     constant uint& b_stride   [[buffer(5)]],
//!     device float* y_buf       [[buffer(6)]],
//!     constant uint& y_offset   [[buffer(7)]],
//!     constant uint& y_stride   [[buffer(8)]],
//!     uint gid [[thread_position_in_grid]]
//! ) {
//!     float a = a_buf[a_offset + gid * a_stride];
//!     float b = b_buf[b_offset + gid * b_stride];
//!     float y = 0.0f;
//!     y = a + b;
//!     y_buf[y_offset + gid * y_stride] = y;
//! }
//! ```

/// Shape slots a kernel takes ahead of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Vector,
    General,
    Uplo,
}

/// One reference kernel. `mnemonic` lists operands in slot order (`b` input,
/// `B` in/out, `f` scalar) and ends with the output `B`. In `body`, array
/// elements are `a` and `b`, scalars `s0`..`s3`, and the result is `y`.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceKernel {
    pub name: &'static str,
    pub family: Family,
    pub mnemonic: &'static str,
    pub body: &'static str,
}

pub const REFERENCE_KERNELS: &[ReferenceKernel] = &[
    ReferenceKernel { name: "vector_add", family: Family::Vector, mnemonic: "bbB", body: "y = a + b;" },
    ReferenceKernel { name: "vector_sub", family: Family::Vector, mnemonic: "bbB", body: "y = a - b;" },
    ReferenceKernel { name: "vector_mul", family: Family::Vector, mnemonic: "bbB", body: "y = a * b;" },
    ReferenceKernel { name: "vector_div", family: Family::Vector, mnemonic: "bbB", body: "y = a / b;" },
    ReferenceKernel { name: "vector_abs", family: Family::Vector, mnemonic: "bB", body: "y = fabs(a);" },
    ReferenceKernel { name: "vector_sqr", family: Family::Vector, mnemonic: "bB", body: "y = a * a;" },
    ReferenceKernel { name: "vector_sqrt", family: Family::Vector, mnemonic: "bB", body: "y = sqrt(a);" },
    ReferenceKernel { name: "vector_copy", family: Family::Vector, mnemonic: "bB", body: "y = a;" },
    ReferenceKernel { name: "vector_set", family: Family::Vector, mnemonic: "fB", body: "y = s0;" },
    ReferenceKernel { name: "vector_powx", family: Family::Vector, mnemonic: "bfB", body: "y = pow(a, s0);" },
    ReferenceKernel {
        name: "vector_elu",
        family: Family::Vector,
        mnemonic: "fbB",
        body: "y = a > 0.0f ? a : s0 * (exp(a) - 1.0f);",
    },
    ReferenceKernel {
        name: "vector_sincos",
        family: Family::Vector,
        mnemonic: "bBB",
        body: "y = sin(a); b = cos(a);",
    },
    ReferenceKernel {
        name: "vector_scale_shift",
        family: Family::Vector,
        mnemonic: "bffffB",
        body: "y = s0 * a + s1;",
    },
    ReferenceKernel {
        name: "vector_linear_frac",
        family: Family::Vector,
        mnemonic: "bbffffB",
        body: "y = (s0 * a + s1) / (s2 * b + s3);",
    },
    ReferenceKernel { name: "ge_add", family: Family::General, mnemonic: "bbB", body: "y = a + b;" },
    ReferenceKernel { name: "uplo_add", family: Family::Uplo, mnemonic: "bbB", body: "y = a + b;" },
];

fn array_params(name: char, slot: &mut usize, writable: bool) -> String {
    let qualifier = if writable { "device float*" } else { "device const float*" };
    let params = format!(
        "    {qualifier} {name}_buf [[buffer({})]],\n\
         \x20   constant uint& {name}_offset [[buffer({})]],\n\
         \x20   constant uint& {name}_stride [[buffer({})]],\n",
        *slot,
        *slot + 1,
        *slot + 2
    );
    *slot += 3;
    params
}

/// Generate MSL source for one kernel (no `#include` prologue).
pub fn emit_kernel(kernel: &ReferenceKernel) -> String {
    let (mut params, mut slot) = match kernel.family {
        Family::Vector => (String::new(), 0usize),
        Family::General => (
            "    constant uint& sd [[buffer(0)]],\n    constant uint& fd [[buffer(1)]],\n".to_string(),
            2,
        ),
        Family::Uplo => (
            "    constant uint& sd [[buffer(0)]],\n    constant uint& unit [[buffer(1)]],\n    \
             constant uint& bottom [[buffer(2)]],\n"
                .to_string(),
            3,
        ),
    };

    // Everything but the trailing output.
    let operands = &kernel.mnemonic[..kernel.mnemonic.len().saturating_sub(1)];
    let mut arrays = ['a', 'b'].into_iter();
    let mut loads = Vec::new();
    let mut stores = Vec::new();
    let mut scalar = 0;
    for op in operands.chars() {
        match op {
            'f' => {
                params.push_str(&format!("    constant float& s{scalar} [[buffer({slot})]],\n"));
                slot += 1;
                scalar += 1;
            }
            'b' | 'B' => {
                let name = arrays.next().unwrap_or('c');
                params.push_str(&array_params(name, &mut slot, op == 'B'));
                loads.push(name);
                if op == 'B' {
                    stores.push(name);
                }
            }
            _ => {}
        }
    }
    params.push_str(&array_params('y', &mut slot, true));

    let guard = match kernel.family {
        Family::Vector => "",
        Family::General => "    if (gid >= sd * fd) return;\n",
        // Column-major sd x sd; skip the other triangle.
        Family::Uplo => {
            "    uint row = gid % sd;\n    uint col = gid / sd;\n    if (col >= sd) return;\n    \
             if (bottom != 0 ? row < col : row > col) return;\n    \
             if (unit != 0 && row == col) return;\n"
        }
    };
    let load_lines: String = loads
        .iter()
        .map(|name| format!("    float {name} = {name}_buf[{name}_offset + gid * {name}_stride];\n"))
        .collect();
    let store_lines: String = stores
        .iter()
        .map(|name| format!("    {name}_buf[{name}_offset + gid * {name}_stride] = {name};\n"))
        .collect();

    format!(
        "kernel void {name}(\n{params}    uint gid [[thread_position_in_grid]]\n) {{\n\
         {guard}{load_lines}    float y = 0.0f;\n    {body}\n{store_lines}\
         \x20   y_buf[y_offset + gid * y_stride] = y;\n}}\n",
        name = kernel.name,
        body = kernel.body,
    )
}

/// Complete MSL source for every reference kernel.
pub fn reference_library_source() -> String {
    let mut src = String::from("#include <metal_stdlib>\nusing namespace metal;\n");
    for kernel in REFERENCE_KERNELS {
        src.push('\n');
        src.push_str(&emit_kernel(kernel));
    }
    src
}
