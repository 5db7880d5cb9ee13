use propwire_codegen::{
    compile_module, parse_docgen_file, write_single_file, RustConfig, TypeMapping,
};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?).join("schemas");
    println!("cargo:rerun-if-changed={}", schema_dir.display());

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&schema_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mapping = TypeMapping::default();
    let mut schemas = Vec::with_capacity(paths.len());
    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
        schemas.push(parse_docgen_file(path, &mapping)?);
    }

    let output = compile_module(&schemas, &RustConfig::default())?;
    let out_file = PathBuf::from(std::env::var("OUT_DIR")?).join("components.rs");
    write_single_file(&output, &out_file)?;
    Ok(())
}
