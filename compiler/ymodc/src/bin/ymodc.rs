//! `ymodc` — the extended YAML module compiler CLI (C10, `SPEC_FULL.md`
//! §4.9): `compile`, `dump`, and `watch` over the library's driver.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;

use ymc_diagnostic::emitter::{render_plain, render_terminal};
use ymc_diagnostic::DiagnosticQueue;
use ymodc::{compile, dump_to_string, watch, CompileOptions, DumpOptions, IgnorePrivate, YmodConfig};

#[derive(Parser)]
#[command(name = "ymodc", about = "Extended YAML module compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a module and print its resolved value as JSON.
    Compile(SharedArgs),
    /// Compile a module and print the re-dumped YAML.
    Dump {
        #[command(flatten)]
        shared: SharedArgs,
        /// Sort map keys lexicographically instead of preserving source order.
        #[arg(long)]
        sort_keys: bool,
    },
    /// Compile, then recompile on every change to the module or its imports.
    Watch(SharedArgs),
}

#[derive(Args)]
struct SharedArgs {
    /// The entry module to compile.
    filepath: PathBuf,
    /// Directory imports may not escape. Defaults to the current directory.
    #[arg(long)]
    base_path: Option<PathBuf>,
    /// Disable the sandbox containment check.
    #[arg(long)]
    unsafe_mode: bool,
    /// Strip `%PRIVATE` paths from every module, the entry module only, or none.
    #[arg(long, value_name = "all|current|name,...")]
    ignore_private: Option<String>,
    /// Ignore `%TAG`/tag annotations entirely.
    #[arg(long)]
    ignore_tags: bool,
    /// `key=value` parameters passed to the entry module, repeatable.
    #[arg(long = "param", value_name = "key=value")]
    params: Vec<String>,
    /// Disable ANSI color in diagnostic output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    ymodc::tracing_setup::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Compile(shared) => run_compile(shared),
        Command::Dump { shared, sort_keys } => run_dump(shared, sort_keys),
        Command::Watch(shared) => run_watch(shared),
    };
    std::process::exit(exit_code);
}

fn run_compile(shared: SharedArgs) -> i32 {
    let options = build_options(&shared);
    let output = compile(&options);
    print_diagnostics(&output.errors, !shared.no_color);
    if !output.has_errors() {
        match serde_json::to_string_pretty(&output.value.to_json()) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("failed to serialize output: {err}"),
        }
    }
    i32::from(output.has_errors())
}

fn run_dump(shared: SharedArgs, sort_keys: bool) -> i32 {
    let options = build_options(&shared);
    let output = compile(&options);
    print_diagnostics(&output.errors, !shared.no_color);
    if !output.has_errors() {
        println!("{}", dump_to_string(&output.value, DumpOptions { sort_keys }));
    }
    i32::from(output.has_errors())
}

fn run_watch(shared: SharedArgs) -> i32 {
    let options = build_options(&shared);
    let debounce_ms = config_for(&shared).watch_debounce_ms.unwrap_or(200);
    let color = !shared.no_color;

    let result = watch(&options, Duration::from_millis(debounce_ms), |event| {
        print_diagnostics(&event.output.errors, color);
        if !event.output.has_errors() {
            match serde_json::to_string_pretty(&event.output.value.to_json()) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("failed to serialize output: {err}"),
            }
        }
        println!("---");
    });

    if let Err(err) = result {
        eprintln!("watch failed: {err}");
        return 1;
    }
    0
}

fn config_for(shared: &SharedArgs) -> YmodConfig {
    let dir = shared
        .base_path
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    YmodConfig::load(&dir).unwrap_or_else(|err| {
        eprintln!("warning: {err}");
        YmodConfig::default()
    })
}

/// Builds [`CompileOptions`] from config-file defaults overridden by CLI
/// flags, per the precedence in `SPEC_FULL.md` §3.11: defaults < config file < CLI flags.
fn build_options(shared: &SharedArgs) -> CompileOptions {
    let config = config_for(shared);
    let mut options = CompileOptions::new(shared.filepath.clone());

    if let Some(base) = config.base_path {
        options.base_path = base;
    }
    if let Some(base) = &shared.base_path {
        options.base_path = base.clone();
    }

    options.unsafe_mode = shared.unsafe_mode;
    options.ignore_tags = config.ignore_tags.unwrap_or(false) || shared.ignore_tags;

    let ignore_private = shared.ignore_private.clone().or(config.ignore_private);
    if let Some(raw) = ignore_private {
        options.ignore_private = parse_ignore_private(&raw);
    }

    options.params = parse_params(&shared.params);
    options
}

fn parse_ignore_private(raw: &str) -> IgnorePrivate {
    match raw {
        "all" => IgnorePrivate::All,
        "current" => IgnorePrivate::Current,
        names => IgnorePrivate::Named(names.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()),
    }
}

fn parse_params(raw: &[String]) -> IndexMap<String, ymc_ast::Value> {
    let mut params = IndexMap::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            eprintln!("warning: ignoring malformed --param `{entry}` (expected key=value)");
            continue;
        };
        params.insert(key.to_string(), ymc_resolve::yaml_scalar_value(value, false));
    }
    params
}

fn print_diagnostics(errors: &[ymc_diagnostic::Diagnostic], color: bool) {
    if errors.is_empty() {
        return;
    }
    let mut queue = DiagnosticQueue::new();
    queue.extend(errors.iter().cloned());
    let rendered = if color && std::io::stderr().is_terminal() {
        render_terminal(&queue, true)
    } else {
        render_plain(&queue)
    };
    eprint!("{rendered}");
}
