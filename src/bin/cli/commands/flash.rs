use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;

use studydeck_lib::quiz::FlashSession;
use studydeck_lib::ActiveDeck;

use super::{prompt, PlayOptions};
use crate::render::terminal::{self, Color};

const HELP: &str = "[n]ext  [p]rev  [f]lip  [s]huffle  [q]uit > ";

pub fn run<R: BufRead, W: Write, G: Rng>(
    deck: ActiveDeck,
    opts: PlayOptions,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
) -> Result<()> {
    let label = deck.label();
    let mut session = FlashSession::new(deck.cards)?;
    writeln!(output, "{}", terminal::paint(&label, Color::BOLD, opts.use_color))?;

    loop {
        let (pos, total) = session.position();
        let side = if session.is_flipped() { "back" } else { "front" };
        writeln!(
            output,
            "\n{}",
            terminal::paint(
                &format!("Card {}/{} ({})", pos, total, side),
                Color::GRAY,
                opts.use_color
            )
        )?;
        for line in terminal::wrap_lines(session.visible_text(), "  ", 80) {
            writeln!(output, "{}", line)?;
        }

        let Some(command) = prompt(input, output, HELP)? else {
            break;
        };
        match command.as_str() {
            "" | "n" | "next" => session.next(),
            "p" | "prev" => session.prev(),
            "f" | "flip" => session.flip(),
            "s" | "shuffle" => {
                session.shuffle(rng);
                writeln!(output, "Shuffled {} cards", session.position().1)?;
            }
            other => writeln!(output, "Unknown command '{}'", other)?,
        }
    }

    Ok(())
}
