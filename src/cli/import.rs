//! Import command: load a coursework snapshot as the LMS sync would

use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::Arc;

use gradestake::economy::{CourseworkRepository, CourseworkSnapshot, EconomyManager, TracingSink};

use super::Context;

pub fn import_command(ctx: &Context, file: &Path, reset: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read snapshot: {}", file.display()))?;
    let snapshot: CourseworkSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", file.display()))?;

    let db = ctx.open_db()?;
    if reset {
        db.reset_user(&snapshot.user_id)?;
        tracing::info!(user_id = %snapshot.user_id, "Cleared achievements and wagers");
    }
    CourseworkRepository::new(db.clone()).apply_snapshot(&snapshot)?;

    // A sync is when new grades show up, so evaluate and settle right away
    let economy = EconomyManager::from_db(db, ctx.config.economy.clone(), Arc::new(TracingSink));
    let report = economy.evaluate_achievements(&snapshot.user_id)?;
    let resolved = economy.resolve_pending_wagers(&snapshot.user_id)?;

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "user_id": snapshot.user_id,
            "courses": snapshot.courses.len(),
            "assignments": snapshot.assignments.len(),
            "achievements": report,
            "resolved": resolved,
        }));
    }

    println!(
        "Imported {} courses, {} assignments for {}",
        snapshot.courses.len(),
        snapshot.assignments.len(),
        snapshot.user_id
    );
    for unlocked in &report.unlocked {
        println!("  Unlocked: {} (+{})", unlocked.title, unlocked.points);
    }
    if report.degraded {
        println!("  Warning: coursework could not be read, achievements not recomputed");
    }
    for r in &resolved {
        println!(
            "  Wager {} {}: grade {:.1} vs {:.1} required",
            r.wager_id,
            if r.won { "won" } else { "lost" },
            r.actual_grade,
            r.required_score
        );
    }

    Ok(())
}
