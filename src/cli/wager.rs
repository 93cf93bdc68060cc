//! Wager command implementation

use anyhow::Result;

use super::Context;

pub fn wager_command(
    ctx: &Context,
    user: &str,
    item: &str,
    amount: f64,
    multiplier: f64,
) -> Result<()> {
    let wager = ctx.economy()?.create_wager(user, item, amount, multiplier)?;

    if ctx.json {
        return ctx.print_json(&wager);
    }

    println!("Wager placed: {}", wager.id);
    println!(
        "  {:.1} pts on {} at {:.2}x (pays {:.1})",
        wager.amount,
        wager.item_id,
        wager.multiplier,
        wager.potential_payout()
    );
    println!(
        "  Need {:.1} or better (base {:.0})",
        wager.required_score, wager.base_score
    );

    Ok(())
}
