//! Wagers command implementation

use anyhow::Result;

use gradestake::economy::WagerStatus;

use super::Context;

pub fn wagers_command(ctx: &Context, user: &str) -> Result<()> {
    let wagers = ctx.economy()?.get_wagers(user)?;

    if ctx.json {
        return ctx.print_json(&wagers);
    }

    if wagers.is_empty() {
        println!("No wagers found.");
        return Ok(());
    }

    println!("Wagers ({}):\n", wagers.len());

    for w in &wagers {
        let status = w.status();
        println!(
            "  {} [{}] {} {:.1} pts at {:.2}x, need {:.1}",
            w.id,
            status.label(),
            w.item_id,
            w.amount,
            w.multiplier,
            w.required_score
        );
        match status {
            WagerStatus::Won => println!("    +{:.1} pts", w.points_awarded),
            WagerStatus::Lost => {
                if let Some(grade) = w.actual_grade {
                    println!("    Graded {:.1}", grade);
                }
            }
            WagerStatus::Pending => {}
        }
    }

    Ok(())
}
