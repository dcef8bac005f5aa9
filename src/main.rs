//! tsdocs: generate structured documentation from TypeScript sources.
//!
//! ```text
//! tsdocs src/                       # JSON for every .ts file in src/ to stdout
//! tsdocs -f markdown -o API.md 'src/**/*.ts'
//! tsdocs --project tsdocs.json --exclude-name '/^_/'
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tsdocs::{
    extract_from_files, file_list_from_json, logging, render, CompilerOptions,
    DocumentationOptions, PartialOptions, Pattern, TagStrategy,
};

#[derive(Parser)]
#[command(
    name = "tsdocs",
    version,
    about = "Extract documentation entries from TypeScript interfaces, classes and variables"
)]
struct Cli {
    /// Input files, directories or glob patterns
    files: Vec<String>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), markdown
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Exclude entries and members whose name matches. `/re/` for a regex.
    /// Can be specified multiple times.
    #[arg(long = "exclude-name", value_name = "PATTERN")]
    exclude_names: Vec<Pattern>,

    /// Exclude files whose path matches. `/re/` for a regex.
    /// Can be specified multiple times.
    #[arg(long = "exclude-path", value_name = "PATTERN")]
    exclude_paths: Vec<Pattern>,

    /// Also document declarations from .d.ts files
    #[arg(long)]
    include_definition_files: bool,

    /// List built-in members of string, number and boolean variables
    #[arg(long)]
    include_basic_type_properties: bool,

    /// Skip class declarations
    #[arg(long)]
    no_classes: bool,

    /// Leave the bundled standard library out of the program
    #[arg(long)]
    no_lib: bool,

    /// Read @default/@deprecated/@internal from the raw comment text and
    /// strip every directive from the documentation
    #[arg(long)]
    strip_tags: bool,

    /// Make file names relative to this directory (default: current directory)
    #[arg(long)]
    root_dir: Option<PathBuf>,

    /// JSON file with extraction options; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON project file whose "files" array lists the inputs
    #[arg(long)]
    project: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.files.is_empty() && cli.project.is_none() {
        bail!("no input files; pass files, directories, globs or --project");
    }

    let partial = load_config(cli.config.as_deref())?.merge(cli_options(&cli));
    let options = DocumentationOptions::from_partial(partial);
    let compiler_options = CompilerOptions { no_lib: cli.no_lib };

    let mut files = expand_globs(&cli.files)?;
    if let Some(ref project) = cli.project {
        files.extend(project_files(project)?);
    }
    info!(files = files.len(), "resolved input files");

    let entries = extract_from_files(Some(files.as_slice()), &compiler_options, &options)?;
    let renderer = render::create_renderer(&cli.format)?;
    let output = renderer.render(&entries);

    match cli.output {
        Some(ref path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }
    Ok(())
}

/// Options set on the command line. Unset flags stay `None` so the config
/// file value survives the merge.
fn cli_options(cli: &Cli) -> PartialOptions {
    PartialOptions {
        exclude_names: Some(cli.exclude_names.clone()),
        exclude_paths: Some(cli.exclude_paths.clone()),
        include_definition_files: cli.include_definition_files.then_some(true),
        ignore_definitions: None,
        include_basic_type_properties: cli.include_basic_type_properties.then_some(true),
        include_classes: cli.no_classes.then_some(false),
        tag_strategy: cli.strip_tags.then_some(TagStrategy::StripToken),
        root_dir: cli.root_dir.clone(),
    }
}

fn load_config(path: Option<&Path>) -> Result<PartialOptions> {
    let Some(path) = path else {
        return Ok(PartialOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config: {}", path.display()))
}

/// Files listed by a project file, relative to the project file's directory.
fn project_files(path: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read project: {}", path.display()))?;
    let project: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid project: {}", path.display()))?;
    let files = file_list_from_json(project.get("files"))
        .with_context(|| format!("invalid \"files\" in {}", path.display()))?;
    let base = path.parent().unwrap_or(Path::new(""));
    Ok(files.into_iter().map(|f| base.join(f)).collect())
}

/// File name endings recognized as TypeScript sources.
const SUPPORTED_SUFFIXES: &[&str] = &[".ts", ".tsx", ".d.ts"];

fn is_supported(path: &Path) -> bool {
    let name = path.to_string_lossy();
    SUPPORTED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && is_supported(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
