//! Import Accumulation
//!
//! Collects the imports one conversion needs. The deduplication key is the
//! import path; statements come out one per path in first-registered order.

use std::fmt;

use tracing::debug;

/// One imported symbol, optionally renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSymbol {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportSymbol {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for ImportSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.name, alias),
            None => f.write_str(&self.name),
        }
    }
}

/// A set of symbols required from a single module path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNeed {
    pub path: String,
    pub symbols: Vec<ImportSymbol>,
}

impl ImportNeed {
    pub fn new(path: impl Into<String>, symbols: Vec<ImportSymbol>) -> Self {
        Self {
            path: path.into(),
            symbols,
        }
    }

    /// Render as a single TypeScript import statement
    pub fn statement(&self) -> String {
        let symbols: Vec<String> = self.symbols.iter().map(ToString::to_string).collect();
        format!("import {{ {} }} from '{}';", symbols.join(", "), self.path)
    }
}

/// Per-conversion import accumulator
#[derive(Debug, Default)]
pub struct ImportRegistry {
    imports: Vec<ImportNeed>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an import need.
    ///
    /// Returns `true` when the path was not seen before. A repeated path does
    /// not add a statement; any symbols the earlier registration lacked are
    /// appended to it.
    pub fn register(&mut self, need: ImportNeed) -> bool {
        let Some(existing) = self.imports.iter_mut().find(|i| i.path == need.path) else {
            self.imports.push(need);
            return true;
        };

        let before = existing.symbols.len();
        for symbol in need.symbols {
            if !existing.symbols.contains(&symbol) {
                existing.symbols.push(symbol);
            }
        }
        let added = existing.symbols.len() - before;
        if added > 0 {
            debug!(path = %existing.path, added, "merged import symbols for repeated path");
        }
        false
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportNeed> {
        self.imports.iter()
    }

    /// Statements in first-registered order
    pub fn statements(&self) -> Vec<String> {
        self.imports.iter().map(ImportNeed::statement).collect()
    }

    pub fn into_imports(self) -> Vec<ImportNeed> {
        self.imports
    }
}
