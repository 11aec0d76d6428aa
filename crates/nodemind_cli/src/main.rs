//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `nodemind_core` linkage.
//! - Optionally open a store file and print its totals.
//!
//! Usage: `nodemind_cli [DB_PATH]`

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("nodemind_core ping={}", nodemind_core::ping());
    println!("nodemind_core version={}", nodemind_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    let store = match nodemind_core::Store::open_sqlite(&path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open store at {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let totals = nodemind_core::summary(store.state());
    let today = nodemind_core::day_of(store.now_ms());
    let progress = nodemind_core::day_progress(store.state(), today);
    println!(
        "tasks={} completed={} maps={} nodes={} focus_minutes={:.1}",
        totals.total_tasks,
        totals.completed_tasks,
        store.maps().len(),
        totals.total_nodes,
        totals.total_focus_minutes
    );
    println!(
        "today={} done={}/{} focus_state={:?}",
        today,
        progress.completed,
        progress.total,
        store.focus_state()
    );
    ExitCode::SUCCESS
}
