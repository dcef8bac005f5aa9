//! tsdocs: extract structured documentation entries from TypeScript
//! declarations.
//!
//! The pipeline in [`extract`] reads a [`program::ProgramModel`] and produces
//! [`model::InterfaceEntry`] values for every documented interface, class and
//! variable. [`program::SourceProgram`] is the bundled model, built from
//! `.ts` files on disk.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod program;
pub mod render;

pub use config::{CompilerOptions, DocumentationOptions, PartialOptions, Pattern, TagStrategy};
pub use error::{Error, Result};
pub use extract::{extract_from_files, extract_from_program, file_list_from_json, Documentation};
pub use model::{DocEntry, InterfaceEntry, PropertyEntry, TagValue, Tags};
pub use program::{ProgramModel, SourceProgram};
