use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;

use studydeck_lib::quiz::{
    IdentifyOptions, IdentifySource, QuizError, RoundSession, RoundState, IDENTIFY_FEEDBACK_DELAY,
};
use studydeck_lib::ActiveDeck;

use super::{prompt, PlayOptions};
use crate::render::terminal::{self, Color};

pub fn run<R: BufRead, W: Write, G: Rng>(
    deck: ActiveDeck,
    options: IdentifyOptions,
    opts: PlayOptions,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
) -> Result<()> {
    let label = deck.label();
    let mut session = RoundSession::new(IdentifySource::new(deck.cards, options));

    match session.start(rng) {
        Ok(()) => {}
        Err(QuizError::InsufficientCards { needed, available }) => {
            writeln!(
                output,
                "{} has {} cards; identify needs at least {}. Add more cards or lower --choices.",
                label, available, needed
            )?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    writeln!(output, "{}", terminal::paint(&label, Color::BOLD, opts.use_color))?;

    loop {
        let RoundState::InProgress { index, score } = session.state() else {
            writeln!(output, "No more questions could be drawn.")?;
            break;
        };
        let total = session.questions().len();
        let Some(question) = session.current().cloned() else {
            break;
        };

        writeln!(
            output,
            "\n{}",
            terminal::paint(
                &format!(
                    "Round {}  Question {}/{}  Score {}",
                    session.round(),
                    index + 1,
                    total,
                    score
                ),
                Color::GRAY,
                opts.use_color
            )
        )?;
        let prompt_text = terminal::paint(&question.prompt, Color::CYAN, opts.use_color);
        writeln!(output, "Which matches: {}", prompt_text)?;
        writeln!(output, "{}", terminal::numbered(&question.choices))?;

        let choice = loop {
            let Some(line) = prompt(input, output, "Your answer (q to quit) > ")? else {
                return Ok(());
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=question.choices.len()).contains(&n) => break n - 1,
                _ => writeln!(output, "Enter a number between 1 and {}", question.choices.len())?,
            }
        };

        let submission = session.submit(&choice, rng)?;
        writeln!(
            output,
            "{}",
            terminal::feedback(
                submission.correct,
                "Correct!",
                &format!("Wrong! The answer was: {}", question.correct_choice()),
                opts.use_color
            )
        )?;
        if let Some(end) = submission.round_end {
            writeln!(output, "\n{}", terminal::round_end(end, opts.use_color))?;
        }

        opts.pause(IDENTIFY_FEEDBACK_DELAY);
    }

    Ok(())
}
