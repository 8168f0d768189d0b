//! Live loader (C11, `SPEC_FULL.md` §4.10): debounced recompilation of an
//! entry module whenever it or any of its current imports changes on disk.
//! Watches are re-registered after every compile, since the dependency set
//! a module pulls in can itself change.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};

use crate::driver::{compile_with_state, CompileOutput, CompileState};
use crate::options::CompileOptions;

/// One recompilation, either the initial one or triggered by a debounced
/// filesystem event.
pub struct WatchEvent {
    pub output: CompileOutput,
}

/// Watches `options.filepath` and its live dependency set, calling `on_change`
/// after the initial compile and after every subsequent debounced change.
/// Blocks the calling thread; intended to run on a dedicated thread or as
/// the body of a `watch` CLI subcommand.
pub fn watch(options: &CompileOptions, debounce: Duration, mut on_change: impl FnMut(WatchEvent)) -> notify::Result<()> {
    let mut state = CompileState::new();
    let output = compile_with_state(&mut state, options);
    let mut watched = state.dependency_paths();

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(debounce, tx)?;
    register_watches(&mut debouncer, &watched);
    on_change(WatchEvent { output });

    for result in rx {
        let Ok(events) = result else { continue };
        let changed = events
            .iter()
            .any(|event| event.kind != DebouncedEventKind::AnyContinuous && watched.iter().any(|w| w == &event.path));
        if !changed {
            continue;
        }

        let output = compile_with_state(&mut state, options);
        let new_watched = state.dependency_paths();
        if new_watched != watched {
            unregister_watches(&mut debouncer, &watched);
            register_watches(&mut debouncer, &new_watched);
            watched = new_watched;
        }
        on_change(WatchEvent { output });
    }

    Ok(())
}

fn register_watches(debouncer: &mut notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>, paths: &[PathBuf]) {
    for path in paths {
        let _ = debouncer.watcher().watch(path, RecursiveMode::NonRecursive);
    }
}

fn unregister_watches(debouncer: &mut notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>, paths: &[PathBuf]) {
    for path in paths {
        let _ = debouncer.watcher().unwatch(path);
    }
}
