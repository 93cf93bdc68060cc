//! Odds command implementation

use anyhow::{bail, Result};

use super::Context;

pub fn odds_command(
    ctx: &Context,
    user: &str,
    item: &str,
    multiplier: Option<f64>,
    target: Option<f64>,
) -> Result<()> {
    let economy = ctx.economy()?;

    match (multiplier, target) {
        (Some(multiplier), _) => {
            let quote = economy.quote(user, item, multiplier)?;
            if ctx.json {
                return ctx.print_json(&quote);
            }
            println!(
                "{} at {:.2}x: need {:.1} (base {:.0}, {} tier, cap {:.1}x)",
                quote.item_id,
                quote.multiplier,
                quote.required_score,
                quote.estimate.base_score,
                quote.tier.as_str(),
                quote.max_multiplier
            );
            if quote.multiplier > quote.max_multiplier {
                println!("  Over the tier cap; this wager would be rejected");
            }
        }
        (None, Some(target)) => {
            let quote = economy.multiplier_for_target(user, item, target)?;
            if ctx.json {
                return ctx.print_json(&quote);
            }
            println!(
                "{} aiming for {:.1}: {:.2}x (base {:.0})",
                quote.item_id, quote.target_score, quote.multiplier, quote.estimate.base_score
            );
            if !quote.within_tier_cap {
                println!(
                    "  Above the {} tier cap of {:.1}x",
                    quote.tier.as_str(),
                    quote.max_multiplier
                );
            }
        }
        (None, None) => bail!("Pass --multiplier or --target"),
    }

    Ok(())
}
