//! Resolve command implementation

use anyhow::Result;

use super::Context;

pub fn resolve_command(ctx: &Context, user: &str, wager: Option<&str>) -> Result<()> {
    let economy = ctx.economy()?;

    let results: Vec<_> = match wager {
        Some(id) => economy.resolve_wager(user, id)?.into_iter().collect(),
        None => economy.resolve_pending_wagers(user)?,
    };

    if ctx.json {
        return ctx.print_json(&results);
    }

    if results.is_empty() {
        println!("Nothing to resolve.");
        return Ok(());
    }

    for r in &results {
        if r.won {
            println!(
                "  {} won: {:.1} >= {:.1}, +{:.1} pts",
                r.wager_id, r.actual_grade, r.required_score, r.points_awarded
            );
        } else {
            println!(
                "  {} lost: {:.1} < {:.1}",
                r.wager_id, r.actual_grade, r.required_score
            );
        }
    }

    Ok(())
}
