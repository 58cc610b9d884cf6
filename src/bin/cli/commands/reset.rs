use anyhow::{bail, Result};

use flashdeck_lib::now_millis;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, yes: bool, format: &OutputFormat) -> Result<()> {
    let unit = app.require_active_unit()?;

    if !yes {
        bail!(
            "This resets all progress in '{}' ({} cards). Re-run with --yes to confirm.",
            unit.name,
            app.session.cards().len()
        );
    }

    app.session.reset_unit(now_millis());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "reset",
                "unit": unit.id,
                "cards": app.session.cards().len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Reset {} cards in {}.", app.session.cards().len(), unit.name);
        }
    }

    Ok(())
}
