//! Achievements command implementation

use anyhow::Result;

use gradestake::economy::{Achievement, AchievementCategory, AchievementId, AchievementRecord};

use super::Context;

pub fn achievements_command(ctx: &Context, user: &str) -> Result<()> {
    let rows = ctx.economy()?.get_achievements(user)?;

    if ctx.json {
        return ctx.print_json(&rows);
    }

    let unlocked = rows.iter().filter(|r| r.unlocked).count();
    let earned: f64 = rows.iter().map(AchievementRecord::earned_points).sum();
    println!(
        "Achievements ({}/{} unlocked, {:.1}/{} pts):",
        unlocked,
        Achievement::total_count(),
        earned,
        Achievement::total_points()
    );

    for category in AchievementCategory::ALL {
        let in_category: Vec<(&AchievementRecord, &Achievement)> = rows
            .iter()
            .filter_map(|row| {
                AchievementId::from_str(&row.id)
                    .and_then(Achievement::get)
                    .filter(|a| a.category == category)
                    .map(|a| (row, a))
            })
            .collect();
        if in_category.is_empty() {
            continue;
        }

        println!("\n{}", category.label());
        for (row, achievement) in in_category {
            let marker = if row.unlocked { "[x]" } else { "[ ]" };
            println!(
                "  {} {:<18} {:>3}%  {:>6.1}/{} pts",
                marker,
                row.title,
                row.progress,
                row.earned_points(),
                row.points
            );
            println!("      {}", achievement.description);
        }
    }

    Ok(())
}
