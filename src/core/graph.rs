//! Dependency graph construction
//!
//! Builds the symbol table (one owner per symbol) and the file-level
//! dependency graph from scanned sources. Files are identified by their
//! discovery index.

use std::collections::HashMap;

use crate::core::config::BuildConfig;
use crate::core::walker::SourceFile;
use crate::error::ResolveError;

/// Symbol -> index of the file providing it
#[derive(Debug, Default)]
pub struct SymbolTable {
    owners: HashMap<String, usize>,
}

impl SymbolTable {
    /// Build the table, visiting files in discovery order
    ///
    /// A symbol provided twice is an error naming both files, even when both
    /// provides are in the same file.
    pub fn build(files: &[SourceFile]) -> Result<Self, ResolveError> {
        let mut owners: HashMap<String, usize> = HashMap::new();
        for (idx, file) in files.iter().enumerate() {
            for symbol in &file.provides {
                if let Some(&first) = owners.get(symbol) {
                    return Err(ResolveError::DuplicateProvider {
                        symbol: symbol.clone(),
                        first: files[first].path.clone(),
                        second: file.path.clone(),
                    });
                }
                owners.insert(symbol.clone(), idx);
            }
        }
        Ok(Self { owners })
    }

    /// File index owning a symbol
    pub fn owner(&self, symbol: &str) -> Option<usize> {
        self.owners.get(symbol).copied()
    }

    /// Number of provided symbols
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Check if no symbols are provided
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// File dependency graph
///
/// `edges[a]` lists the files `a` depends on, deduplicated, in the order
/// their symbols are first required by `a`. Self-references are dropped.
#[derive(Debug)]
pub struct DependencyGraph {
    files: Vec<SourceFile>,
    edges: Vec<Vec<usize>>,
    symbols: SymbolTable,
}

impl DependencyGraph {
    /// Build the graph from scanned files in discovery order
    pub fn build(files: Vec<SourceFile>, build: &BuildConfig) -> Result<Self, ResolveError> {
        let symbols = SymbolTable::build(&files)?;
        let mut edges = Vec::with_capacity(files.len());

        for (idx, file) in files.iter().enumerate() {
            let mut deps: Vec<usize> = Vec::new();
            for symbol in &file.requires {
                match symbols.owner(symbol) {
                    Some(owner) if owner == idx => {}
                    Some(owner) => {
                        if !deps.contains(&owner) {
                            deps.push(owner);
                        }
                    }
                    None if build.is_extern(symbol) => {
                        tracing::trace!("{} requires extern {symbol}", file.label());
                    }
                    None => {
                        return Err(ResolveError::UnresolvedSymbol {
                            file: file.label(),
                            symbol: symbol.clone(),
                        });
                    }
                }
            }
            edges.push(deps);
        }

        Ok(Self {
            files,
            edges,
            symbols,
        })
    }

    /// Files in discovery order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Files the given file depends on
    pub fn dependencies(&self, idx: usize) -> &[usize] {
        self.edges.get(idx).map_or(&[], Vec::as_slice)
    }

    /// Symbol table used to build the graph
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the graph has no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Give up ownership of the files
    pub(crate) fn into_files(self) -> Vec<SourceFile> {
        self.files
    }
}
