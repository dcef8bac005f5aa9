//! Extraction pipeline.
//!
//! [`Documentation`] walks the program's source files, serializes each
//! candidate symbol and applies the name filter to the result. The pipeline
//! only reads from the [`ProgramModel`]; every call is an independent pass.

pub mod filter;
pub mod serialize;
pub mod tags;
pub mod walker;

use crate::config::{CompilerOptions, DocumentationOptions};
use crate::error::{Error, Result};
use crate::model::InterfaceEntry;
use crate::program::{ProgramModel, SourceProgram};
use filter::Filter;
use serde_json::Value;
use serialize::Serializer;
use std::path::{Path, PathBuf};
use tracing::info;
use walker::CandidateKind;

pub struct Documentation<'a, P: ProgramModel + ?Sized> {
    program: &'a P,
    options: &'a DocumentationOptions,
}

impl<'a, P: ProgramModel + ?Sized> Documentation<'a, P> {
    pub fn new(program: &'a P, options: &'a DocumentationOptions) -> Self {
        Documentation { program, options }
    }

    /// Entries in traversal order: program file order, then declaration
    /// order within each file.
    pub fn extract(&self) -> Vec<InterfaceEntry> {
        let filter = Filter::new(self.options);
        let serializer = Serializer::new(self.program, self.options, filter);

        let candidates = walker::collect_candidates(self.program, self.options, &filter);
        let total = candidates.len();
        let entries: Vec<InterfaceEntry> = candidates
            .into_iter()
            .map(|c| match c.kind {
                CandidateKind::Interface => serializer.serialize_interface(c.symbol, &c.file_name),
                CandidateKind::Class => serializer.serialize_class(c.symbol, &c.file_name),
                CandidateKind::Variable => serializer.serialize_variable(c.symbol, &c.file_name),
            })
            .filter(|entry| filter.accepts_entry(entry))
            .collect();

        info!(
            files = self.program.source_files().len(),
            candidates = total,
            entries = entries.len(),
            "extracted documentation"
        );
        entries
    }
}

/// Extract documentation from an already-built program model.
pub fn extract_from_program<P: ProgramModel + ?Sized>(
    program: &P,
    options: &DocumentationOptions,
) -> Vec<InterfaceEntry> {
    Documentation::new(program, options).extract()
}

/// Build a [`SourceProgram`] from `files` and extract from it.
///
/// `None` stands for a missing file list and is rejected; an empty list
/// yields no entries.
pub fn extract_from_files<S: AsRef<Path>>(
    files: Option<&[S]>,
    compiler_options: &CompilerOptions,
    options: &DocumentationOptions,
) -> Result<Vec<InterfaceEntry>> {
    let files = files.ok_or_else(|| Error::expected_file_array("undefined"))?;
    let program = SourceProgram::from_files(files, compiler_options)?;
    Ok(extract_from_program(&program, options))
}

/// Validate a file list received as JSON.
///
/// Anything but an array of strings is an [`Error::InvalidArgument`] naming
/// the received JSON type the way JavaScript's `typeof` would.
pub fn file_list_from_json(value: Option<&Value>) -> Result<Vec<PathBuf>> {
    let items = match value {
        Some(Value::Array(items)) => items,
        other => return Err(Error::expected_file_array(type_name(other))),
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(path) => Ok(PathBuf::from(path)),
            other => Err(Error::InvalidArgument(format!(
                "expected array of file paths, received array containing {}",
                type_name(Some(other))
            ))),
        })
        .collect()
}

fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
    }
}
