use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let units = app.list_units()?;
    let active = app.session.active_unit();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = units
                .iter()
                .map(|unit| {
                    serde_json::json!({
                        "id": unit.id,
                        "name": unit.name,
                        "count": unit.count,
                        "createdAt": unit.created_at,
                        "isActive": Some(unit.id.as_str()) == active,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if units.is_empty() {
                println!("No units.");
                return Ok(());
            }

            let name_width = units.iter().map(|u| u.name.chars().count()).max().unwrap_or(4).clamp(4, 40);
            for unit in &units {
                let marker = if Some(unit.id.as_str()) == active { "* " } else { "  " };
                println!(
                    "{}{:<nw$}  {:>4} cards  {}",
                    marker,
                    unit.name,
                    unit.count,
                    paint(&unit.id, Color::GRAY, use_color),
                    nw = name_width
                );
            }
            println!("{}", paint(&format!("Data: {}", app.data_dir.display()), Color::DIM, use_color));
        }
    }

    Ok(())
}
