//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `omnistudy_core` linkage without the UI shell.
//! - Print a deterministic summary of the persisted state at a database path.
//!
//! Usage: `omnistudy_cli [DB_PATH]` (falls back to `OMNISTUDY_DB_PATH`).

use omnistudy_core::{PlanStore, SqliteKvStore, StoreOptions};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("omnistudy_core ping={}", omnistudy_core::ping());
    println!("omnistudy_core version={}", omnistudy_core::core_version());

    let Some(db_path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("OMNISTUDY_DB_PATH").ok())
        .filter(|path| !path.trim().is_empty())
    else {
        return ExitCode::SUCCESS;
    };

    let storage = match SqliteKvStore::open(db_path.trim()) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("state db open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = PlanStore::initialize(storage, StoreOptions::default());
    let profile = store.profile();
    println!("user name={} plan_type={}", profile.name, profile.plan_type);

    match store.plan() {
        None => println!("plan none"),
        Some(plan) => {
            println!(
                "plan selected={} variants={}",
                plan.selected_intensity,
                plan.variants.len()
            );
            for (intensity, variant) in &plan.variants {
                let progress = variant.progress();
                println!(
                    "variant {intensity} days={} tasks={}/{} ({}%)",
                    variant.schedule.len(),
                    progress.completed,
                    progress.total,
                    progress.percent()
                );
            }
        }
    }

    ExitCode::SUCCESS
}
