use anyhow::Result;

use flashdeck_lib::flashcards::algorithm::format_interval;
use flashdeck_lib::now_millis;

use crate::app::App;
use crate::render::terminal::render_learning_stats;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let unit = app.require_active_unit()?;
    let session = &app.session;
    let stats = session.learning_stats(now_millis());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "unit": unit,
                "filter": session.filter(),
                "stats": stats,
                "intervalsMinutes": session.intervals().as_slice(),
                "masteryLevel": app.config.mastery_level,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} ({}, filter: {})", unit.name, unit.id, session.filter());
            println!("{}", render_learning_stats(&stats, use_color));

            let schedule: Vec<String> = session
                .intervals()
                .as_slice()
                .iter()
                .enumerate()
                .map(|(level, &minutes)| format!("L{} {}", level, format_interval(minutes)))
                .collect();
            println!("Schedule: {}", schedule.join(" · "));
        }
    }

    Ok(())
}
