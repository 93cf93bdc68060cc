//! Points command implementation

use anyhow::Result;

use gradestake::economy::Level;

use super::Context;

pub fn points_command(ctx: &Context, user: &str) -> Result<()> {
    let economy = ctx.economy()?;
    let balance = economy.get_balance(user)?;
    let level = economy.get_level(user)?;

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "balance": balance,
            "level": level,
        }));
    }

    println!(
        "Total:     {:.1} ({:.1} achievements, {:+.1} settled wagers)",
        balance.total, balance.achievements, balance.settled
    );
    println!(
        "Staked:    {:.1} ({} open {})",
        balance.staked,
        balance.open_wagers,
        if balance.open_wagers == 1 { "wager" } else { "wagers" }
    );
    println!("Spendable: {:.1}", balance.spendable);
    println!("Winnings:  {:.1}", balance.winnings);

    match level.points_to_next {
        Some(remaining) => println!(
            "Level {}/{} {} ({:.0}% to next, {:.1} pts to go)",
            level.level,
            Level::max_level(),
            level.title,
            level.progress * 100.0,
            remaining
        ),
        None => println!("Level {} {} (max)", level.level, level.title),
    }

    Ok(())
}
