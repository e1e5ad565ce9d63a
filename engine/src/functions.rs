// This file is auto-generated by ferrum-gen. Do not edit.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::registry::FunctionId;

/// Kernel functions of the compiled library, in identifier order.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Unknown = -1,
    GeAbs = 0,
    GeAcos = 1,
    GeAcosh = 2,
    GeAdd = 3,
    GeAsin = 4,
    GeAsinh = 5,
    GeAtan = 6,
    GeAtan2 = 7,
    GeAtanh = 8,
    GeCbrt = 9,
    GeCdfNorm = 10,
    GeCdfNormInv = 11,
    GeCeil = 12,
    GeCopysign = 13,
    GeCos = 14,
    GeCosh = 15,
    GeDiv = 16,
    GeElu = 17,
    GeErf = 18,
    GeErfInv = 19,
    GeErfc = 20,
    GeErfcinv = 21,
    GeExp = 22,
    GeExp10 = 23,
    GeExp2 = 24,
    GeExpm1 = 25,
    GeFloor = 26,
    GeFmax = 27,
    GeFmin = 28,
    GeFmod = 29,
    GeFrac = 30,
    GeFrem = 31,
    GeGamma = 32,
    GeHypot = 33,
    GeInv = 34,
    GeInvCbrt = 35,
    GeInvSqrt = 36,
    GeLgamma = 37,
    GeLinearFrac = 38,
    GeLog = 39,
    GeLog10 = 40,
    GeLog1p = 41,
    GeLog2 = 42,
    GeModf = 43,
    GeMul = 44,
    GePow = 45,
    GePow2o3 = 46,
    GePow3o2 = 47,
    GePowx = 48,
    GeRamp = 49,
    GeRelu = 50,
    GeRound = 51,
    GeScaleShift = 52,
    GeSigmoid = 53,
    GeSin = 54,
    GeSincos = 55,
    GeSinh = 56,
    GeSqr = 57,
    GeSqrt = 58,
    GeSub = 59,
    GeTan = 60,
    GeTanh = 61,
    GeTrunc = 62,
    UploAbs = 63,
    UploAcos = 64,
    UploAcosh = 65,
    UploAdd = 66,
    UploAsin = 67,
    UploAsinh = 68,
    UploAtan = 69,
    UploAtan2 = 70,
    UploAtanh = 71,
    UploCbrt = 72,
    UploCdfNorm = 73,
    UploCdfNormInv = 74,
    UploCeil = 75,
    UploCopysign = 76,
    UploCos = 77,
    UploCosh = 78,
    UploDiv = 79,
    UploElu = 80,
    UploErf = 81,
    UploErfInv = 82,
    UploErfc = 83,
    UploErfcInv = 84,
    UploExp = 85,
    UploExp10 = 86,
    UploExp2 = 87,
    UploExpm1 = 88,
    UploFloor = 89,
    UploFmax = 90,
    UploFmin = 91,
    UploFmod = 92,
    UploFrac = 93,
    UploFrem = 94,
    UploGamma = 95,
    UploHypot = 96,
    UploInv = 97,
    UploInvCbrt = 98,
    UploInvSqrt = 99,
    UploLgamma = 100,
    UploLinearFrac = 101,
    UploLog = 102,
    UploLog10 = 103,
    UploLog1p = 104,
    UploLog2 = 105,
    UploModf = 106,
    UploMul = 107,
    UploPow = 108,
    UploPow2o3 = 109,
    UploPow3o2 = 110,
    UploPowx = 111,
    UploRamp = 112,
    UploRelu = 113,
    UploRound = 114,
    UploScaleShift = 115,
    UploSigmoid = 116,
    UploSin = 117,
    UploSincos = 118,
    UploSinh = 119,
    UploSqr = 120,
    UploSqrt = 121,
    UploSub = 122,
    UploTan = 123,
    UploTanh = 124,
    UploTrunc = 125,
    VectorAbs = 126,
    VectorAcos = 127,
    VectorAcosh = 128,
    VectorAdd = 129,
    VectorAsin = 130,
    VectorAsinh = 131,
    VectorAtan = 132,
    VectorAtan2 = 133,
    VectorAtanh = 134,
    VectorCbrt = 135,
    VectorCdfNorm = 136,
    VectorCdfNormInv = 137,
    VectorCeil = 138,
    VectorCopy = 139,
    VectorCopysign = 140,
    VectorCos = 141,
    VectorCosh = 142,
    VectorDiv = 143,
    VectorElu = 144,
    VectorEquals = 145,
    VectorErf = 146,
    VectorErfInv = 147,
    VectorErfc = 148,
    VectorErfcInv = 149,
    VectorExp = 150,
    VectorExp10 = 151,
    VectorExp2 = 152,
    VectorExpm1 = 153,
    VectorFloor = 154,
    VectorFmax = 155,
    VectorFmin = 156,
    VectorFmod = 157,
    VectorFrac = 158,
    VectorFrem = 159,
    VectorGamma = 160,
    VectorHypot = 161,
    VectorInv = 162,
    VectorInvCbrt = 163,
    VectorInvSqrt = 164,
    VectorLgamma = 165,
    VectorLinearFrac = 166,
    VectorLog = 167,
    VectorLog10 = 168,
    VectorLog1p = 169,
    VectorLog2 = 170,
    VectorModf = 171,
    VectorMul = 172,
    VectorPow = 173,
    VectorPow2o3 = 174,
    VectorPow3o2 = 175,
    VectorPowx = 176,
    VectorRamp = 177,
    VectorRelu = 178,
    VectorRound = 179,
    VectorScaleShift = 180,
    VectorSet = 181,
    VectorSigmoid = 182,
    VectorSin = 183,
    VectorSincos = 184,
    VectorSinh = 185,
    VectorSqr = 186,
    VectorSqrt = 187,
    VectorSub = 188,
    VectorSwap = 189,
    VectorTan = 190,
    VectorTanh = 191,
    VectorTrunc = 192,
}

impl Function {
    pub fn id(self) -> FunctionId {
        FunctionId::new(self as i32)
    }

    pub fn from_name(name: &str) -> Function {
        FUNCTION_MAP.get(name).copied().unwrap_or(Function::Unknown)
    }
}

pub const FUNCTION_NAMES: [&str; 193] = [
    "ge_abs",
    "ge_acos",
    "ge_acosh",
    "ge_add",
    "ge_asin",
    "ge_asinh",
    "ge_atan",
    "ge_atan2",
    "ge_atanh",
    "ge_cbrt",
    "ge_cdf_norm",
    "ge_cdf_norm_inv",
    "ge_ceil",
    "ge_copysign",
    "ge_cos",
    "ge_cosh",
    "ge_div",
    "ge_elu",
    "ge_erf",
    "ge_erf_inv",
    "ge_erfc",
    "ge_erfcinv",
    "ge_exp",
    "ge_exp10",
    "ge_exp2",
    "ge_expm1",
    "ge_floor",
    "ge_fmax",
    "ge_fmin",
    "ge_fmod",
    "ge_frac",
    "ge_frem",
    "ge_gamma",
    "ge_hypot",
    "ge_inv",
    "ge_inv_cbrt",
    "ge_inv_sqrt",
    "ge_lgamma",
    "ge_linear_frac",
    "ge_log",
    "ge_log10",
    "ge_log1p",
    "ge_log2",
    "ge_modf",
    "ge_mul",
    "ge_pow",
    "ge_pow2o3",
    "ge_pow3o2",
    "ge_powx",
    "ge_ramp",
    "ge_relu",
    "ge_round",
    "ge_scale_shift",
    "ge_sigmoid",
    "ge_sin",
    "ge_sincos",
    "ge_sinh",
    "ge_sqr",
    "ge_sqrt",
    "ge_sub",
    "ge_tan",
    "ge_tanh",
    "ge_trunc",
    "uplo_abs",
    "uplo_acos",
    "uplo_acosh",
    "uplo_add",
    "uplo_asin",
    "uplo_asinh",
    "uplo_atan",
    "uplo_atan2",
    "uplo_atanh",
    "uplo_cbrt",
    "uplo_cdf_norm",
    "uplo_cdf_norm_inv",
    "uplo_ceil",
    "uplo_copysign",
    "uplo_cos",
    "uplo_cosh",
    "uplo_div",
    "uplo_elu",
    "uplo_erf",
    "uplo_erf_inv",
    "uplo_erfc",
    "uplo_erfc_inv",
    "uplo_exp",
    "uplo_exp10",
    "uplo_exp2",
    "uplo_expm1",
    "uplo_floor",
    "uplo_fmax",
    "uplo_fmin",
    "uplo_fmod",
    "uplo_frac",
    "uplo_frem",
    "uplo_gamma",
    "uplo_hypot",
    "uplo_inv",
    "uplo_inv_cbrt",
    "uplo_inv_sqrt",
    "uplo_lgamma",
    "uplo_linear_frac",
    "uplo_log",
    "uplo_log10",
    "uplo_log1p",
    "uplo_log2",
    "uplo_modf",
    "uplo_mul",
    "uplo_pow",
    "uplo_pow2o3",
    "uplo_pow3o2",
    "uplo_powx",
    "uplo_ramp",
    "uplo_relu",
    "uplo_round",
    "uplo_scale_shift",
    "uplo_sigmoid",
    "uplo_sin",
    "uplo_sincos",
    "uplo_sinh",
    "uplo_sqr",
    "uplo_sqrt",
    "uplo_sub",
    "uplo_tan",
    "uplo_tanh",
    "uplo_trunc",
    "vector_abs",
    "vector_acos",
    "vector_acosh",
    "vector_add",
    "vector_asin",
    "vector_asinh",
    "vector_atan",
    "vector_atan2",
    "vector_atanh",
    "vector_cbrt",
    "vector_cdf_norm",
    "vector_cdf_norm_inv",
    "vector_ceil",
    "vector_copy",
    "vector_copysign",
    "vector_cos",
    "vector_cosh",
    "vector_div",
    "vector_elu",
    "vector_equals",
    "vector_erf",
    "vector_erf_inv",
    "vector_erfc",
    "vector_erfc_inv",
    "vector_exp",
    "vector_exp10",
    "vector_exp2",
    "vector_expm1",
    "vector_floor",
    "vector_fmax",
    "vector_fmin",
    "vector_fmod",
    "vector_frac",
    "vector_frem",
    "vector_gamma",
    "vector_hypot",
    "vector_inv",
    "vector_inv_cbrt",
    "vector_inv_sqrt",
    "vector_lgamma",
    "vector_linear_frac",
    "vector_log",
    "vector_log10",
    "vector_log1p",
    "vector_log2",
    "vector_modf",
    "vector_mul",
    "vector_pow",
    "vector_pow2o3",
    "vector_pow3o2",
    "vector_powx",
    "vector_ramp",
    "vector_relu",
    "vector_round",
    "vector_scale_shift",
    "vector_set",
    "vector_sigmoid",
    "vector_sin",
    "vector_sincos",
    "vector_sinh",
    "vector_sqr",
    "vector_sqrt",
    "vector_sub",
    "vector_swap",
    "vector_tan",
    "vector_tanh",
    "vector_trunc",
];

lazy_static! {
    pub static ref FUNCTION_MAP: HashMap<&'static str, Function> = {
        let mut map = HashMap::with_capacity(193);
        map.insert("ge_abs", Function::GeAbs);
        map.insert("ge_acos", Function::GeAcos);
        map.insert("ge_acosh", Function::GeAcosh);
        map.insert("ge_add", Function::GeAdd);
        map.insert("ge_asin", Function::GeAsin);
        map.insert("ge_asinh", Function::GeAsinh);
        map.insert("ge_atan", Function::GeAtan);
        map.insert("ge_atan2", Function::GeAtan2);
        map.insert("ge_atanh", Function::GeAtanh);
        map.insert("ge_cbrt", Function::GeCbrt);
        map.insert("ge_cdf_norm", Function::GeCdfNorm);
        map.insert("ge_cdf_norm_inv", Function::GeCdfNormInv);
        map.insert("ge_ceil", Function::GeCeil);
        map.insert("ge_copysign", Function::GeCopysign);
        map.insert("ge_cos", Function::GeCos);
        map.insert("ge_cosh", Function::GeCosh);
        map.insert("ge_div", Function::GeDiv);
        map.insert("ge_elu", Function::GeElu);
        map.insert("ge_erf", Function::GeErf);
        map.insert("ge_erf_inv", Function::GeErfInv);
        map.insert("ge_erfc", Function::GeErfc);
        map.insert("ge_erfcinv", Function::GeErfcinv);
        map.insert("ge_exp", Function::GeExp);
        map.insert("ge_exp10", Function::GeExp10);
        map.insert("ge_exp2", Function::GeExp2);
        map.insert("ge_expm1", Function::GeExpm1);
        map.insert("ge_floor", Function::GeFloor);
        map.insert("ge_fmax", Function::GeFmax);
        map.insert("ge_fmin", Function::GeFmin);
        map.insert("ge_fmod", Function::GeFmod);
        map.insert("ge_frac", Function::GeFrac);
        map.insert("ge_frem", Function::GeFrem);
        map.insert("ge_gamma", Function::GeGamma);
        map.insert("ge_hypot", Function::GeHypot);
        map.insert("ge_inv", Function::GeInv);
        map.insert("ge_inv_cbrt", Function::GeInvCbrt);
        map.insert("ge_inv_sqrt", Function::GeInvSqrt);
        map.insert("ge_lgamma", Function::GeLgamma);
        map.insert("ge_linear_frac", Function::GeLinearFrac);
        map.insert("ge_log", Function::GeLog);
        map.insert("ge_log10", Function::GeLog10);
        map.insert("ge_log1p", Function::GeLog1p);
        map.insert("ge_log2", Function::GeLog2);
        map.insert("ge_modf", Function::GeModf);
        map.insert("ge_mul", Function::GeMul);
        map.insert("ge_pow", Function::GePow);
        map.insert("ge_pow2o3", Function::GePow2o3);
        map.insert("ge_pow3o2", Function::GePow3o2);
        map.insert("ge_powx", Function::GePowx);
        map.insert("ge_ramp", Function::GeRamp);
        map.insert("ge_relu", Function::GeRelu);
        map.insert("ge_round", Function::GeRound);
        map.insert("ge_scale_shift", Function::GeScaleShift);
        map.insert("ge_sigmoid", Function::GeSigmoid);
        map.insert("ge_sin", Function::GeSin);
        map.insert("ge_sincos", Function::GeSincos);
        map.insert("ge_sinh", Function::GeSinh);
        map.insert("ge_sqr", Function::GeSqr);
        map.insert("ge_sqrt", Function::GeSqrt);
        map.insert("ge_sub", Function::GeSub);
        map.insert("ge_tan", Function::GeTan);
        map.insert("ge_tanh", Function::GeTanh);
        map.insert("ge_trunc", Function::GeTrunc);
        map.insert("uplo_abs", Function::UploAbs);
        map.insert("uplo_acos", Function::UploAcos);
        map.insert("uplo_acosh", Function::UploAcosh);
        map.insert("uplo_add", Function::UploAdd);
        map.insert("uplo_asin", Function::UploAsin);
        map.insert("uplo_asinh", Function::UploAsinh);
        map.insert("uplo_atan", Function::UploAtan);
        map.insert("uplo_atan2", Function::UploAtan2);
        map.insert("uplo_atanh", Function::UploAtanh);
        map.insert("uplo_cbrt", Function::UploCbrt);
        map.insert("uplo_cdf_norm", Function::UploCdfNorm);
        map.insert("uplo_cdf_norm_inv", Function::UploCdfNormInv);
        map.insert("uplo_ceil", Function::UploCeil);
        map.insert("uplo_copysign", Function::UploCopysign);
        map.insert("uplo_cos", Function::UploCos);
        map.insert("uplo_cosh", Function::UploCosh);
        map.insert("uplo_div", Function::UploDiv);
        map.insert("uplo_elu", Function::UploElu);
        map.insert("uplo_erf", Function::UploErf);
        map.insert("uplo_erf_inv", Function::UploErfInv);
        map.insert("uplo_erfc", Function::UploErfc);
        map.insert("uplo_erfc_inv", Function::UploErfcInv);
        map.insert("uplo_exp", Function::UploExp);
        map.insert("uplo_exp10", Function::UploExp10);
        map.insert("uplo_exp2", Function::UploExp2);
        map.insert("uplo_expm1", Function::UploExpm1);
        map.insert("uplo_floor", Function::UploFloor);
        map.insert("uplo_fmax", Function::UploFmax);
        map.insert("uplo_fmin", Function::UploFmin);
        map.insert("uplo_fmod", Function::UploFmod);
        map.insert("uplo_frac", Function::UploFrac);
        map.insert("uplo_frem", Function::UploFrem);
        map.insert("uplo_gamma", Function::UploGamma);
        map.insert("uplo_hypot", Function::UploHypot);
        map.insert("uplo_inv", Function::UploInv);
        map.insert("uplo_inv_cbrt", Function::UploInvCbrt);
        map.insert("uplo_inv_sqrt", Function::UploInvSqrt);
        map.insert("uplo_lgamma", Function::UploLgamma);
        map.insert("uplo_linear_frac", Function::UploLinearFrac);
        map.insert("uplo_log", Function::UploLog);
        map.insert("uplo_log10", Function::UploLog10);
        map.insert("uplo_log1p", Function::UploLog1p);
        map.insert("uplo_log2", Function::UploLog2);
        map.insert("uplo_modf", Function::UploModf);
        map.insert("uplo_mul", Function::UploMul);
        map.insert("uplo_pow", Function::UploPow);
        map.insert("uplo_pow2o3", Function::UploPow2o3);
        map.insert("uplo_pow3o2", Function::UploPow3o2);
        map.insert("uplo_powx", Function::UploPowx);
        map.insert("uplo_ramp", Function::UploRamp);
        map.insert("uplo_relu", Function::UploRelu);
        map.insert("uplo_round", Function::UploRound);
        map.insert("uplo_scale_shift", Function::UploScaleShift);
        map.insert("uplo_sigmoid", Function::UploSigmoid);
        map.insert("uplo_sin", Function::UploSin);
        map.insert("uplo_sincos", Function::UploSincos);
        map.insert("uplo_sinh", Function::UploSinh);
        map.insert("uplo_sqr", Function::UploSqr);
        map.insert("uplo_sqrt", Function::UploSqrt);
        map.insert("uplo_sub", Function::UploSub);
        map.insert("uplo_tan", Function::UploTan);
        map.insert("uplo_tanh", Function::UploTanh);
        map.insert("uplo_trunc", Function::UploTrunc);
        map.insert("vector_abs", Function::VectorAbs);
        map.insert("vector_acos", Function::VectorAcos);
        map.insert("vector_acosh", Function::VectorAcosh);
        map.insert("vector_add", Function::VectorAdd);
        map.insert("vector_asin", Function::VectorAsin);
        map.insert("vector_asinh", Function::VectorAsinh);
        map.insert("vector_atan", Function::VectorAtan);
        map.insert("vector_atan2", Function::VectorAtan2);
        map.insert("vector_atanh", Function::VectorAtanh);
        map.insert("vector_cbrt", Function::VectorCbrt);
        map.insert("vector_cdf_norm", Function::VectorCdfNorm);
        map.insert("vector_cdf_norm_inv", Function::VectorCdfNormInv);
        map.insert("vector_ceil", Function::VectorCeil);
        map.insert("vector_copy", Function::VectorCopy);
        map.insert("vector_copysign", Function::VectorCopysign);
        map.insert("vector_cos", Function::VectorCos);
        map.insert("vector_cosh", Function::VectorCosh);
        map.insert("vector_div", Function::VectorDiv);
        map.insert("vector_elu", Function::VectorElu);
        map.insert("vector_equals", Function::VectorEquals);
        map.insert("vector_erf", Function::VectorErf);
        map.insert("vector_erf_inv", Function::VectorErfInv);
        map.insert("vector_erfc", Function::VectorErfc);
        map.insert("vector_erfc_inv", Function::VectorErfcInv);
        map.insert("vector_exp", Function::VectorExp);
        map.insert("vector_exp10", Function::VectorExp10);
        map.insert("vector_exp2", Function::VectorExp2);
        map.insert("vector_expm1", Function::VectorExpm1);
        map.insert("vector_floor", Function::VectorFloor);
        map.insert("vector_fmax", Function::VectorFmax);
        map.insert("vector_fmin", Function::VectorFmin);
        map.insert("vector_fmod", Function::VectorFmod);
        map.insert("vector_frac", Function::VectorFrac);
        map.insert("vector_frem", Function::VectorFrem);
        map.insert("vector_gamma", Function::VectorGamma);
        map.insert("vector_hypot", Function::VectorHypot);
        map.insert("vector_inv", Function::VectorInv);
        map.insert("vector_inv_cbrt", Function::VectorInvCbrt);
        map.insert("vector_inv_sqrt", Function::VectorInvSqrt);
        map.insert("vector_lgamma", Function::VectorLgamma);
        map.insert("vector_linear_frac", Function::VectorLinearFrac);
        map.insert("vector_log", Function::VectorLog);
        map.insert("vector_log10", Function::VectorLog10);
        map.insert("vector_log1p", Function::VectorLog1p);
        map.insert("vector_log2", Function::VectorLog2);
        map.insert("vector_modf", Function::VectorModf);
        map.insert("vector_mul", Function::VectorMul);
        map.insert("vector_pow", Function::VectorPow);
        map.insert("vector_pow2o3", Function::VectorPow2o3);
        map.insert("vector_pow3o2", Function::VectorPow3o2);
        map.insert("vector_powx", Function::VectorPowx);
        map.insert("vector_ramp", Function::VectorRamp);
        map.insert("vector_relu", Function::VectorRelu);
        map.insert("vector_round", Function::VectorRound);
        map.insert("vector_scale_shift", Function::VectorScaleShift);
        map.insert("vector_set", Function::VectorSet);
        map.insert("vector_sigmoid", Function::VectorSigmoid);
        map.insert("vector_sin", Function::VectorSin);
        map.insert("vector_sincos", Function::VectorSincos);
        map.insert("vector_sinh", Function::VectorSinh);
        map.insert("vector_sqr", Function::VectorSqr);
        map.insert("vector_sqrt", Function::VectorSqrt);
        map.insert("vector_sub", Function::VectorSub);
        map.insert("vector_swap", Function::VectorSwap);
        map.insert("vector_tan", Function::VectorTan);
        map.insert("vector_tanh", Function::VectorTanh);
        map.insert("vector_trunc", Function::VectorTrunc);
        map
    };
}
