//! Estimate command implementation

use anyhow::Result;

use gradestake::economy::Scope;

use super::Context;

pub fn estimate_command(ctx: &Context, user: &str, course: Option<String>) -> Result<()> {
    let scope = match course {
        Some(id) => Scope::Course(id),
        None => Scope::Overall,
    };
    let estimate = ctx.economy()?.get_score_estimate(user, &scope)?;

    if ctx.json {
        return ctx.print_json(&estimate);
    }

    println!("Base score: {:.0}", estimate.base_score);
    println!(
        "Confidence: {:.0}% ({} graded)",
        estimate.confidence * 100.0,
        estimate.sample_size
    );
    for factor in &estimate.factors {
        println!("  - {}", factor);
    }

    Ok(())
}
