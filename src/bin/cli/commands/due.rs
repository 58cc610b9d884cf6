use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{level_pips, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, limit: usize, format: &OutputFormat, use_color: bool) -> Result<()> {
    let unit = app.require_active_unit()?;
    let session = &app.session;
    let cards = session.cards();
    let due: Vec<_> = session.queue().iter().take(limit).map(|&i| &cards[i]).collect();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "unit": unit.id,
                "filter": session.filter(),
                "total": session.remaining(),
                "cards": due,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due in {} ({}). All caught up.", unit.name, session.filter());
                return Ok(());
            }

            println!("{} of {} due in {}:", due.len(), session.remaining(), unit.name);
            for card in due {
                println!(
                    "  {}  {}  {}",
                    level_pips(card.level, session.intervals()),
                    card.front,
                    paint(&card.back, Color::GRAY, use_color)
                );
            }
        }
    }

    Ok(())
}
