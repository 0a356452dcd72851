pub mod active;
pub mod flash;
pub mod identify;
pub mod order;
pub mod sets;

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;

/// Terminal settings shared by the interactive modes
#[derive(Debug, Clone, Copy)]
pub struct PlayOptions {
    pub use_color: bool,
    /// Skip the pause after each answer
    pub fast: bool,
}

impl PlayOptions {
    pub fn pause(&self, delay: Duration) {
        if !self.fast {
            std::thread::sleep(delay);
        }
    }
}

/// Print a prompt and read one trimmed line. `None` on EOF or `q`.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }

    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}
