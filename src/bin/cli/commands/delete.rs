use anyhow::{bail, Context, Result};

use flashdeck_lib::now_millis;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, query: &str, yes: bool, format: &OutputFormat) -> Result<()> {
    let unit = app.find_unit(query)?;

    if !yes {
        bail!(
            "This deletes '{}' and its progress. Re-run with --yes to confirm.",
            unit.name
        );
    }

    app.session
        .delete_unit(&unit.id, now_millis())
        .with_context(|| format!("Failed to delete unit '{}'", unit.name))?;
    let active = app.active_unit()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "deleted",
                "id": unit.id,
                "active": active.as_ref().map(|u| &u.id),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted {} ({}).", unit.name, unit.id);
            match active {
                Some(next) => println!("Active unit: {}", next.name),
                None => println!("No units left."),
            }
        }
    }

    Ok(())
}
