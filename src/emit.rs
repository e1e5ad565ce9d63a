//! Source emitters for the function registry.
//!
//! Both outputs enumerate the same sorted, deduplicated name list with
//! identifiers `0..N` and `UNKNOWN = -1`.

use std::collections::HashMap;

const GENERATED_NOTICE: &str = "This file is auto-generated by ferrum-gen. Do not edit.";

/// `vector_scale_shift` → `VectorScaleShift`.
pub fn camel_case(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// C header with the identifier enumeration.
pub fn emit_header(names: &[String]) -> String {
    let entries: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("    {name} = {i}"))
        .collect();

    let mut out = format!(
        "// {GENERATED_NOTICE}\n\n#ifndef FERRUM_FUNCTIONS_H\n#define FERRUM_FUNCTIONS_H\n\n\
         typedef enum ferrum_function_id {{\n    UNKNOWN = -1,\n"
    );
    if !entries.is_empty() {
        out.push_str(&entries.join(",\n"));
        out.push('\n');
    }
    out.push_str(&format!(
        "}} ferrum_function_id;\n\n#define FERRUM_FUNCTION_COUNT {}\n\n#endif /* FERRUM_FUNCTIONS_H */\n",
        names.len()
    ));
    out
}

/// Rust registry module compiled into the engine as `functions.rs`.
///
/// Fails when two names map to the same enum variant.
pub fn emit_rust(names: &[String]) -> Result<String, String> {
    let variants: Vec<String> = names.iter().map(|n| camel_case(n)).collect();

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (name, variant) in names.iter().zip(&variants) {
        if variant == "Unknown" {
            return Err(format!("function '{name}' collides with the Unknown variant"));
        }
        if let Some(other) = seen.insert(variant, name) {
            return Err(format!(
                "functions '{other}' and '{name}' both map to variant {variant}"
            ));
        }
    }

    let enum_body: String = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| format!("    {variant} = {i},\n"))
        .collect();
    let name_table: String = names.iter().map(|name| format!("    \"{name}\",\n")).collect();
    let map_inserts: String = names
        .iter()
        .zip(&variants)
        .map(|(name, variant)| format!("        map.insert(\"{name}\", Function::{variant});\n"))
        .collect();
    let count = names.len();

    Ok(format!(
        r#"// {GENERATED_NOTICE}

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::registry::FunctionId;

/// Kernel functions of the compiled library, in identifier order.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {{
    Unknown = -1,
{enum_body}}}

impl Function {{
    pub fn id(self) -> FunctionId {{
        FunctionId::new(self as i32)
    }}

    pub fn from_name(name: &str) -> Function {{
        FUNCTION_MAP.get(name).copied().unwrap_or(Function::Unknown)
    }}
}}

pub const FUNCTION_NAMES: [&str; {count}] = [
{name_table}];

lazy_static! {{
    pub static ref FUNCTION_MAP: HashMap<&'static str, Function> = {{
        let mut map = HashMap::with_capacity({count});
{map_inserts}        map
    }};
}}
"#
    ))
}
