use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use studydeck_lib::{Card, NewStudySet, StudySetUpdate};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

/// Separator between a card's front and back on the command line
const CARD_SEPARATOR: &str = "::";

/// Parse `FRONT::BACK` into a card
pub fn parse_card(raw: &str) -> Result<Card> {
    let Some((front, back)) = raw.split_once(CARD_SEPARATOR) else {
        bail!("Card '{}' must look like FRONT{}BACK", raw, CARD_SEPARATOR);
    };
    let card = Card::new(front.trim(), back.trim());
    if !card.is_complete() {
        bail!("Card '{}' needs text on both sides", raw);
    }
    Ok(card)
}

/// Collect cards from `--card` flags and an optional JSON file
fn gather_cards(raw_cards: &[String], cards_file: Option<&Path>) -> Result<Vec<Card>> {
    let mut cards = raw_cards.iter().map(|s| parse_card(s)).collect::<Result<Vec<_>>>()?;

    if let Some(path) = cards_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cards file {}", path.display()))?;
        let from_file: Vec<Card> = serde_json::from_str(&content).with_context(|| {
            format!("Cards file {} is not a JSON array of cards", path.display())
        })?;
        cards.extend(from_file);
    }

    Ok(cards)
}

pub fn list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sets = app.list_sets()?;
    let active = app.active_id();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = sets
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "title": s.title,
                        "description": s.description,
                        "cardCount": s.cards.len(),
                        "isActive": active.as_deref() == Some(s.id.as_str()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("(no study sets)");
            }
            for set in &sets {
                let is_active = active.as_deref() == Some(set.id.as_str());
                println!("{}", terminal::set_summary(set, is_active, use_color));
            }
        }
    }

    Ok(())
}

pub fn show(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(query)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set)?),
        OutputFormat::Plain => println!("{}", terminal::render_set(&set, use_color)),
    }

    Ok(())
}

pub fn create(
    app: &App,
    title: &str,
    description: Option<&str>,
    raw_cards: &[String],
    cards_file: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let cards = gather_cards(raw_cards, cards_file)?;
    if cards.is_empty() {
        bail!("Give at least one --card FRONT{}BACK or a --cards-file", CARD_SEPARATOR);
    }

    let new = NewStudySet {
        title: title.to_string(),
        description: description.unwrap_or_default().to_string(),
        cards,
    };
    let id = app.client.create_set(&new).context("Failed to create study set")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
        OutputFormat::Plain => println!("Created study set {}", id),
    }

    Ok(())
}

pub fn edit(
    app: &App,
    query: &str,
    title: Option<String>,
    description: Option<String>,
    raw_cards: &[String],
    cards_file: Option<&Path>,
) -> Result<()> {
    let set = app.find_set(query)?;

    let cards = gather_cards(raw_cards, cards_file)?;
    let update = StudySetUpdate {
        title,
        description,
        // New cards replace the whole list
        cards: if cards.is_empty() { None } else { Some(cards) },
    };
    if update.title.is_none() && update.description.is_none() && update.cards.is_none() {
        bail!("Nothing to change; pass --title, --description, --card or --cards-file");
    }

    app.client
        .update_set(&set.id, &update)
        .with_context(|| format!("Failed to update study set {}", set.id))?;
    println!("Updated study set {}", set.id);

    Ok(())
}

pub fn delete(app: &App, query: &str) -> Result<()> {
    let set = app.find_set(query)?;

    app.client
        .delete_set(&set.id)
        .with_context(|| format!("Failed to delete study set {}", set.id))?;

    if app.active_id().as_deref() == Some(set.id.as_str()) {
        app.active.clear().context("Failed to clear active set")?;
        println!("Deleted study set {} (was active; back to the sample deck)", set.id);
    } else {
        println!("Deleted study set {}", set.id);
    }

    Ok(())
}
