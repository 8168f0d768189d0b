//! The directive scanner (C3, `SPEC_FULL.md` §4.3): a line-oriented
//! tokeniser and validator that turns `%`-prefixed lines into the seven
//! typed directive variants from §3.3/§3.5.
//!
//! Sandbox verification and dependency-graph registration for `%IMPORT`
//! are deliberately *not* done here — they need the base path, the current
//! module's directory, and the shared dependency graph, none of which this
//! purely lexical pass has. The entry driver (C8) performs that step when
//! it pre-loads each import (`SPEC_FULL.md` §4.7); see `DESIGN.md`.

mod scan;
mod token;
mod types;
mod validate;

pub use scan::scan_directives;
pub use token::RawToken;
pub use types::{
    Directives, DirectiveBase, FilenameDirective, ImportDirective, ImportParamValue,
    LocalDirective, ParamDirective, PrivateDirective, PrivatePath, TagDirective, YamlDirective,
};
