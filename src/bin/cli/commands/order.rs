use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use rand::Rng;

use studydeck_lib::quiz::{
    Difficulty, OrderFixture, QuizError, RoundSession, RoundState, ORDER_FEEDBACK_DELAY,
};

use super::{prompt, PlayOptions};
use crate::render::terminal::{self, Color};

/// Parse "2 1 3" (or "2,1,3") into 0-based indices forming a permutation of
/// `0..count`
pub fn parse_order(line: &str, count: usize) -> std::result::Result<Vec<usize>, String> {
    let mut picked = Vec::with_capacity(count);
    for token in line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        let n: usize = token
            .parse()
            .map_err(|_| format!("'{}' is not a step number", token))?;
        if n == 0 || n > count {
            return Err(format!("Step numbers run from 1 to {}", count));
        }
        if picked.contains(&(n - 1)) {
            return Err(format!("Step {} is listed twice", n));
        }
        picked.push(n - 1);
    }

    if picked.len() != count {
        return Err(format!("List all {} steps, e.g. {}", count, example_order(count)));
    }
    Ok(picked)
}

fn example_order(count: usize) -> String {
    (1..=count).rev().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn run<R: BufRead, W: Write, G: Rng>(
    fixture: &OrderFixture,
    difficulty: Difficulty,
    opts: PlayOptions,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
) -> Result<()> {
    let mut session = RoundSession::new(fixture.source(difficulty));

    match session.start(rng) {
        Ok(()) => {}
        Err(QuizError::NoQuestions(d)) => {
            let available: Vec<String> = fixture.difficulties().map(|d| d.to_string()).collect();
            bail!(
                "No {} order questions. Available difficulties: {}",
                d,
                available.join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    }

    loop {
        let RoundState::InProgress { index, score } = session.state() else {
            writeln!(output, "No more questions could be drawn.")?;
            break;
        };
        let total = session.questions().len();
        let Some(question) = session.current().cloned() else {
            break;
        };
        let shown = question.display_steps(rng);

        writeln!(
            output,
            "\n{}",
            terminal::paint(
                &format!(
                    "Round {}  Question {}/{}  Score {}  ({})",
                    session.round(),
                    index + 1,
                    total,
                    score,
                    session.source().difficulty()
                ),
                Color::GRAY,
                opts.use_color
            )
        )?;
        for line in terminal::wrap_lines(&question.scenario, "", 80) {
            writeln!(output, "{}", terminal::paint(&line, Color::CYAN, opts.use_color))?;
        }
        writeln!(output, "{}", terminal::numbered(&shown))?;

        let picked = loop {
            let Some(line) = prompt(input, output, "Order the steps (q to quit) > ")? else {
                return Ok(());
            };
            match parse_order(&line, shown.len()) {
                Ok(picked) => break picked,
                Err(message) => writeln!(output, "{}", message)?,
            }
        };

        let submitted: Vec<String> = picked.iter().map(|&i| shown[i].clone()).collect();
        let submission = session.submit(submitted.as_slice(), rng)?;

        if submission.correct {
            writeln!(output, "{}", terminal::feedback(true, "Correct order!", "", opts.use_color))?;
        } else {
            let miss = "Not quite. The right order is:";
            writeln!(output, "{}", terminal::feedback(false, "", miss, opts.use_color))?;
            let expected: Vec<String> =
                question.expected_order().into_iter().map(String::from).collect();
            writeln!(output, "{}", terminal::numbered(&expected))?;
        }
        if let Some(end) = submission.round_end {
            writeln!(output, "\n{}", terminal::round_end(end, opts.use_color))?;
        }

        opts.pause(ORDER_FEEDBACK_DELAY);
    }

    Ok(())
}
