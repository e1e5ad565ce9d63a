//! ferrum-gen - generates the function registry from a Metal kernel library
//!
//! # Usage
//!
//! ```bash
//! # Read names from ./lib/libferrum.metallib (or $FERRUM_LIB)
//! ferrum-gen
//!
//! # Custom output locations
//! ferrum-gen -oh include/ferrum_functions.h -os engine/src/functions.rs
//!
//! # Explicit library, or a plain newline-separated name list
//! ferrum-gen --lib build/libferrum.metallib
//! ferrum-gen --names kernels.txt
//! ```

mod emit;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use ferrum::{ComputeBackend, FunctionRegistry, LibraryResolver, ResolverConfig, SystemBackend};
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "ferrum-gen")]
#[command(version = "0.1.0")]
#[command(about = "Generate the ferrum function registry from a Metal kernel library", long_about = None)]
struct Cli {
    /// Output path of the C header
    #[arg(long = "oh", value_name = "HEADER", default_value = "include/ferrum_functions.h")]
    header: PathBuf,

    /// Output path of the Rust registry module
    #[arg(long = "os", value_name = "SOURCE", default_value = "engine/src/functions.rs")]
    source: PathBuf,

    /// Kernel library file or directory (default: $FERRUM_LIB or ./lib)
    #[arg(long, value_name = "PATH", conflicts_with = "names")]
    lib: Option<String>,

    /// Read function names from a newline-separated file instead of a library
    #[arg(long, value_name = "FILE")]
    names: Option<PathBuf>,
}

/// Accept the single-dash `-oh` / `-os` spellings.
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-oh" => "--oh".to_string(),
            "-os" => "--os".to_string(),
            _ => arg,
        })
        .collect()
}

fn parse_name_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn library_names(lib: Option<&str>) -> Result<Vec<String>, String> {
    let resolver = LibraryResolver::new(ResolverConfig::default());
    let backend = SystemBackend::open(&resolver, lib).map_err(|e| e.to_string())?;
    info!("running on device: {}", backend.device_name());
    info!("successfully loaded library");
    Ok(backend.function_names())
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(path, contents).map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
    debug!("wrote {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    let raw = match &cli.names {
        Some(file) => {
            let text = fs::read_to_string(file)
                .map_err(|e| format!("failed to read {}: {}", file.display(), e))?;
            parse_name_list(&text)
        }
        None => library_names(cli.lib.as_deref())?,
    };
    if raw.is_empty() {
        return Err("no functions found in library".to_string());
    }

    let registry = FunctionRegistry::from_names(raw);
    let names = registry.names();
    let source = emit::emit_rust(names)?;
    write_output(&cli.header, &emit::emit_header(names))?;
    write_output(&cli.source, &source)?;

    info!("generated code for {} function names", names.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_from(normalize_args(std::env::args()));
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(normalize_args(args.iter().map(|s| s.to_string())))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["ferrum-gen"]);
        assert_eq!(cli.header, PathBuf::from("include/ferrum_functions.h"));
        assert_eq!(cli.source, PathBuf::from("engine/src/functions.rs"));
        assert!(cli.lib.is_none() && cli.names.is_none());
    }

    #[test]
    fn test_single_dash_outputs() {
        let cli = parse(&["ferrum-gen", "-oh", "out/f.h", "-os", "out/f.rs"]);
        assert_eq!(cli.header, PathBuf::from("out/f.h"));
        assert_eq!(cli.source, PathBuf::from("out/f.rs"));
    }

    #[test]
    fn test_lib_and_names_conflict() {
        let args = normalize_args(
            ["ferrum-gen", "--lib", "a", "--names", "b"].iter().map(|s| s.to_string()),
        );
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_name_list() {
        let names = parse_name_list("vector_sub\n\n# comment\n  vector_add  \n");
        assert_eq!(names, vec!["vector_sub", "vector_add"]);
    }

    #[test]
    fn test_run_from_name_list() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("names.txt");
        fs::write(&list, "vector_sub\nvector_add\nvector_add\n").unwrap();
        let header = dir.path().join("include/ferrum_functions.h");
        let source = dir.path().join("src/functions.rs");

        run(Cli {
            header: header.clone(),
            source: source.clone(),
            lib: None,
            names: Some(list),
        })
        .unwrap();

        let header = fs::read_to_string(header).unwrap();
        assert!(header.contains("UNKNOWN = -1,\n    vector_add = 0,\n    vector_sub = 1\n"));
        let source = fs::read_to_string(source).unwrap();
        assert!(source.contains("VectorAdd = 0,\n    VectorSub = 1,"));
    }

    #[test]
    fn test_empty_name_list_fails() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("names.txt");
        fs::write(&list, "\n# nothing\n").unwrap();
        let err = run(Cli {
            header: dir.path().join("h.h"),
            source: dir.path().join("s.rs"),
            lib: None,
            names: Some(list),
        })
        .unwrap_err();
        assert_eq!(err, "no functions found in library");
        assert!(!dir.path().join("h.h").exists());
    }
}
