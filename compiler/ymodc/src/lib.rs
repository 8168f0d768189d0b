//! Extended YAML module compiler: directives, scalar expressions, imports,
//! and private filtering, layered over a plain YAML 1.2 parse.

mod config;
mod driver;
mod dump;
mod options;
mod sandbox;
pub mod tracing_setup;
mod watch;

pub use config::{ConfigError, YmodConfig};
pub use driver::{compile, compile_with_state, CompileOutput, CompileState};
pub use dump::{dump_to_string, DumpOptions};
pub use options::{CompileOptions, IgnorePrivate};
pub use sandbox::{verify_path, VerifiedPath};
pub use watch::{watch, WatchEvent};
