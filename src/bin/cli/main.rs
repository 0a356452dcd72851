mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use studydeck_lib::quiz::{Difficulty, IdentifyOptions, OrderFixture};

use commands::PlayOptions;

#[derive(Parser)]
#[command(name = "studydeck-cli", about = "Study sets, flashcards and quizzes", version)]
struct Cli {
    /// Study set server URL
    #[arg(long, global = true, env = "STUDYDECK_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Directory holding the active set pointer
    #[arg(long, global = true, env = "STUDYDECK_HOME")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Skip the pause after answering a question
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage study sets on the server
    #[command(subcommand)]
    Sets(SetsCommand),

    /// Choose which study set the quizzes use
    #[command(subcommand)]
    Active(ActiveCommand),

    /// Browse the active deck as flashcards
    Flash,

    /// Multiple-choice quiz on the active deck
    Identify {
        /// Questions per round
        #[arg(
            long,
            default_value_t = IdentifyOptions::default().question_count,
            value_parser = positive_count
        )]
        questions: usize,
        /// Choices per question
        #[arg(
            long,
            default_value_t = IdentifyOptions::default().choice_count,
            value_parser = positive_count
        )]
        choices: usize,
    },

    /// Put the steps of a scenario in order
    Order {
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,
        /// Order questions JSON (defaults to the bundled set)
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SetsCommand {
    /// List study sets
    List,

    /// Show a study set's cards
    Show {
        /// Set id or title (case-insensitive prefix match)
        set: String,
    },

    /// Create a study set
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Card as FRONT::BACK (repeatable)
        #[arg(long = "card")]
        cards: Vec<String>,
        /// JSON array of {"front", "back"} objects
        #[arg(long)]
        cards_file: Option<PathBuf>,
    },

    /// Change a study set; cards given here replace the existing ones
    Edit {
        /// Set id or title (case-insensitive prefix match)
        set: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Card as FRONT::BACK (repeatable)
        #[arg(long = "card")]
        cards: Vec<String>,
        /// JSON array of {"front", "back"} objects
        #[arg(long)]
        cards_file: Option<PathBuf>,
    },

    /// Delete a study set
    Delete {
        /// Set id or title (case-insensitive prefix match)
        set: String,
    },
}

#[derive(Subcommand)]
enum ActiveCommand {
    /// Show which deck the quizzes use
    Show,
    /// Quiz on a study set instead of the sample deck
    Set {
        /// Set id or title (case-insensitive prefix match)
        set: String,
    },
    /// Go back to the sample deck
    Clear,
}

/// A count of at least one
fn positive_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let play = PlayOptions {
        use_color,
        fast: cli.fast,
    };
    let app = app::App::new(&cli.server, cli.data_dir)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut rng = rand::thread_rng();

    match cli.command {
        Command::Sets(SetsCommand::List) => {
            commands::sets::list(&app, &cli.format, use_color)?;
        }
        Command::Sets(SetsCommand::Show { set }) => {
            commands::sets::show(&app, &set, &cli.format, use_color)?;
        }
        Command::Sets(SetsCommand::Create { title, description, cards, cards_file }) => {
            commands::sets::create(
                &app,
                &title,
                description.as_deref(),
                &cards,
                cards_file.as_deref(),
                &cli.format,
            )?;
        }
        Command::Sets(SetsCommand::Edit { set, title, description, cards, cards_file }) => {
            commands::sets::edit(&app, &set, title, description, &cards, cards_file.as_deref())?;
        }
        Command::Sets(SetsCommand::Delete { set }) => {
            commands::sets::delete(&app, &set)?;
        }
        Command::Active(ActiveCommand::Show) => {
            commands::active::show(&app, &cli.format)?;
        }
        Command::Active(ActiveCommand::Set { set }) => {
            commands::active::set(&app, &set)?;
        }
        Command::Active(ActiveCommand::Clear) => {
            commands::active::clear(&app)?;
        }
        Command::Flash => {
            commands::flash::run(
                app.active_deck(),
                play,
                &mut stdin.lock(),
                &mut stdout.lock(),
                &mut rng,
            )?;
        }
        Command::Identify { questions, choices } => {
            let options = IdentifyOptions {
                question_count: questions,
                choice_count: choices,
            };
            commands::identify::run(
                app.active_deck(),
                options,
                play,
                &mut stdin.lock(),
                &mut stdout.lock(),
                &mut rng,
            )?;
        }
        Command::Order { difficulty, fixture } => {
            let fixture = match fixture {
                Some(path) => OrderFixture::load(&path).with_context(|| {
                    format!("Failed to load order questions from {}", path.display())
                })?,
                None => OrderFixture::embedded().context("Bundled order questions are invalid")?,
            };
            commands::order::run(
                &fixture,
                difficulty,
                play,
                &mut stdin.lock(),
                &mut stdout.lock(),
                &mut rng,
            )?;
        }
    }

    Ok(())
}
