use anyhow::{Context, Result};

use studydeck_lib::DeckOrigin;

use crate::app::App;
use crate::OutputFormat;

pub fn show(app: &App, format: &OutputFormat) -> Result<()> {
    let pointer = app.active_id();
    let deck = app.active_deck();

    match format {
        OutputFormat::Json => {
            let (source, id) = match &deck.origin {
                DeckOrigin::Sample => ("sample", None),
                DeckOrigin::StudySet { id, .. } => ("studySet", Some(id.as_str())),
            };
            let output = serde_json::json!({
                "activeSetId": pointer,
                "source": source,
                "id": id,
                "label": deck.label(),
                "cardCount": deck.cards.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} ({} cards)", deck.label(), deck.cards.len());
            // Pointer is set but resolution fell back
            if let (Some(id), DeckOrigin::Sample) = (&pointer, &deck.origin) {
                println!("Active set {} is unavailable; using the sample deck", id);
            }
        }
    }

    Ok(())
}

pub fn set(app: &App, query: &str) -> Result<()> {
    let set = app.find_set(query)?;
    app.active
        .set(&set.id)
        .with_context(|| format!("Failed to save active set in {}", app.data_dir.display()))?;
    println!("Now studying {} ({})", set.title, set.id);
    Ok(())
}

pub fn clear(app: &App) -> Result<()> {
    app.active.clear().context("Failed to clear active set")?;
    println!("Using the sample deck");
    Ok(())
}
