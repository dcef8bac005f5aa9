//! Declaration walker.
//!
//! Visits the top-level statements of each source file, descending only into
//! namespace bodies, and yields one [`Candidate`] per documentable symbol.

use super::filter::Filter;
use crate::config::DocumentationOptions;
use crate::program::{Declaration, ProgramModel, Statement, SymbolId};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Interface,
    Variable,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub symbol: SymbolId,
    /// Owning file, relative to the extraction root.
    pub file_name: String,
}

pub fn collect_candidates<P: ProgramModel + ?Sized>(
    program: &P,
    options: &DocumentationOptions,
    filter: &Filter<'_>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for file in program.source_files() {
        let file_name = relative_file_name(&file.file_name, &options.root_dir);
        if file.is_declaration_file() && !options.include_definition_files {
            debug!(file = %file_name, "skipping declaration file");
            continue;
        }
        if filter.excludes_path(&file_name) {
            debug!(file = %file_name, "file excluded by path pattern");
            continue;
        }
        let walker = Walker {
            program,
            options,
            file_name: &file_name,
        };
        let before = out.len();
        walker.visit(&file.statements, &mut out);
        debug!(file = %file_name, candidates = out.len() - before, "walked file");
    }
    out
}

struct Walker<'a, P: ProgramModel + ?Sized> {
    program: &'a P,
    options: &'a DocumentationOptions,
    file_name: &'a str,
}

impl<P: ProgramModel + ?Sized> Walker<'_, P> {
    fn visit(&self, statements: &[Statement], out: &mut Vec<Candidate>) {
        for statement in statements {
            match statement {
                Statement::Interface(decl) => self.push(CandidateKind::Interface, decl, out),
                Statement::Variable(decls) => {
                    for decl in decls {
                        self.push(CandidateKind::Variable, decl, out);
                    }
                }
                Statement::Class(decl) => {
                    if self.options.include_classes {
                        self.push(CandidateKind::Class, decl, out);
                    }
                }
                Statement::Namespace(body) => self.visit(body, out),
                Statement::Other => {}
            }
        }
    }

    fn push(&self, kind: CandidateKind, decl: &Declaration, out: &mut Vec<Candidate>) {
        match self.program.symbol_at_location(decl.node) {
            Some(symbol) => out.push(Candidate {
                kind,
                symbol,
                file_name: self.file_name.to_string(),
            }),
            None => debug!(name = %decl.name, file = %self.file_name, "unresolved declaration"),
        }
    }
}

/// `path` relative to `root`, with `/` separators.
///
/// Only absolute paths are rebased; a relative path is taken to already be
/// relative to the root.
pub fn relative_file_name(path: &Path, root: &Path) -> String {
    let rebased = if path.is_absolute() && root.is_absolute() {
        diff_paths(path, root)
    } else {
        path.to_path_buf()
    };
    rebased
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn diff_paths(path: &Path, root: &Path) -> PathBuf {
    let path: Vec<Component> = path.components().collect();
    let root: Vec<Component> = root.components().collect();
    let common = path
        .iter()
        .zip(root.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..root.len() {
        out.push("..");
    }
    for component in &path[common..] {
        out.push(component.as_os_str());
    }
    out
}
