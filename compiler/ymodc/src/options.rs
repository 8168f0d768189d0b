use std::path::PathBuf;

use indexmap::IndexMap;

use ymc_ast::Value;
use ymc_resolve::Schema;

/// Which modules' `%PRIVATE` paths are stripped from the value they expose,
/// both to an importer's `import.*` traversal and to the driver's own
/// returned output (`SPEC_FULL.md` §6.1).
#[derive(Clone, Debug)]
pub enum IgnorePrivate {
    /// Every module hides its private paths.
    All,
    /// Only the module passed as `CompileOptions::filepath` does.
    /// Normalized away by [`CompileOptions::normalize`] into `Named` with
    /// that module's effective filename, since nested compiles no longer
    /// have a notion of "the current one".
    Current,
    /// Only modules whose effective filename (the `%FILENAME` directive's
    /// value, or the option/import-supplied fallback) appears in this list.
    Named(Vec<String>),
}

impl Default for IgnorePrivate {
    fn default() -> Self {
        IgnorePrivate::Named(Vec::new())
    }
}

/// The entry driver's configuration surface (`SPEC_FULL.md` §6.1) — the
/// library-level equivalent of a CLI's flags.
pub struct CompileOptions {
    pub base_path: PathBuf,
    pub unsafe_mode: bool,
    pub filepath: PathBuf,
    pub filename: Option<String>,
    pub params: IndexMap<String, Value>,
    pub universal_params: IndexMap<String, Value>,
    pub ignore_private: IgnorePrivate,
    pub ignore_tags: bool,
    pub schema: Schema,
}

impl CompileOptions {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        CompileOptions {
            base_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            unsafe_mode: false,
            filepath: filepath.into(),
            filename: None,
            params: IndexMap::new(),
            universal_params: IndexMap::new(),
            ignore_private: IgnorePrivate::default(),
            ignore_tags: false,
            schema: Schema::new(),
        }
    }

    /// Resolves `ignorePrivate: "current"` into the concrete filename list
    /// it stands for, using the root module's own resolved filename
    /// (falling back to its path's file name if no `filename` option and no
    /// `%FILENAME` directive apply).
    pub(crate) fn normalize_ignore_private(&self, root_filename: &str) -> IgnorePrivate {
        match &self.ignore_private {
            IgnorePrivate::Current => IgnorePrivate::Named(vec![root_filename.to_string()]),
            other => other.clone(),
        }
    }

    pub(crate) fn fallback_filename(&self) -> String {
        self.filename.clone().unwrap_or_else(|| {
            self.filepath
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.filepath.to_string_lossy().into_owned())
        })
    }
}
