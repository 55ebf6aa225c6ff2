//! Library interface for the dtsbind CLI
//!
//! The engine never touches the filesystem. Everything here reads translation
//! units, runs [`ReasonCodegen`] and writes `.re` files.

use anyhow::{bail, Context, Result};
use dtsbind_codegen::error::ErrorEntry;
use dtsbind_codegen::module_path::Specifier;
use dtsbind_codegen::{BatchErrors, Codegen, CodegenConfig, ErrorCategory, ErrorLocation, ReasonCodegen};
use dtsbind_core::{CompiledUnit, Declaration, SymbolTable, TranslationUnit};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Load a TOML codegen configuration, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<CodegenConfig> {
    let Some(path) = path else {
        return Ok(CodegenConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: CodegenConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    debug!(?config, "loaded codegen config");
    Ok(config)
}

pub fn read_unit(path: &Path) -> Result<TranslationUnit> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translation unit: {:?}", path))?;
    TranslationUnit::from_json(&content)
        .with_context(|| format!("Failed to decode translation unit: {:?}", path))
}

/// Translate one unit file, writing to `output` or returning the source for stdout
pub fn handle_translate(
    input: &Path,
    output: Option<&Path>,
    config: CodegenConfig,
) -> Result<CompiledUnit> {
    info!("Translating {:?}", input);
    let unit = read_unit(input)?;
    let compiled = ReasonCodegen::new(config)
        .generate(&unit)
        .with_context(|| format!("Failed to translate {:?}", input))?;

    if let Some(output) = output {
        write_source(output, &compiled.source)?;
        info!("Wrote {:?}", output);
    }
    Ok(compiled)
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub errors: BatchErrors,
}

/// Translate every `*.json` unit under `input_dir` into `output_dir`.
///
/// Without `keep_going` the first failing unit aborts the run. With it,
/// failing units are skipped and reported together in the returned errors.
/// Errors are located by the unit's path relative to `input_dir`.
pub fn handle_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: CodegenConfig,
    keep_going: bool,
) -> Result<BatchReport> {
    if !input_dir.is_dir() {
        bail!("Input directory does not exist: {:?}", input_dir);
    }
    let codegen = ReasonCodegen::new(config);
    let mut report = BatchReport::default();

    for input in unit_files(input_dir)? {
        let relative = input.strip_prefix(input_dir).unwrap_or(&input);
        let output = output_dir.join(relative).with_extension("re");
        report.errors.set_file_context(relative.display().to_string());

        if let Err(entry) = translate_one(&codegen, &input, &output) {
            warn!("Failed to translate {:?}: {}", input, entry.message);
            report.errors.add(entry);
            if !keep_going {
                bail!("{}", report.errors.format_summary());
            }
            continue;
        }
        report.written.push(output);
    }
    report.errors.clear_context();

    info!(
        "Translated {} unit(s), {} failed",
        report.written.len(),
        report.errors.count()
    );
    Ok(report)
}

fn translate_one(codegen: &ReasonCodegen, input: &Path, output: &Path) -> Result<(), ErrorEntry> {
    let unit = read_unit(input)
        .map_err(|e| ErrorEntry::new(ErrorCategory::Input, format!("{:#}", e)))?;

    let mut location = ErrorLocation::new();
    if let Declaration::Module { name, .. } = &unit.root {
        let module = Specifier::parse(name).map_or_else(|| name.clone(), |specifier| specifier.path);
        location = location.in_module(module);
    }

    let compiled = codegen
        .generate(&unit)
        .map_err(|e| ErrorEntry::from(&e).at(location.clone()))?;
    write_source(output, &compiled.source)
        .map_err(|e| ErrorEntry::new(ErrorCategory::Other, format!("{:#}", e)).at(location))
}

fn unit_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    debug!("Found {} unit file(s) in {:?}", files.len(), dir);
    Ok(files)
}

fn write_source(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(path, source).with_context(|| format!("Failed to write {:?}", path))
}

/// The unit's symbol table as pretty JSON, collected when the unit has none
pub fn handle_symbols(input: &Path) -> Result<String> {
    let unit = read_unit(input)?;
    let symbols: SymbolTable = unit.resolved_symbols();
    debug!("{} symbol(s) in {:?}", symbols.len(), input);
    serde_json::to_string_pretty(&symbols).context("Failed to serialize symbol table")
}
