use studydeck_lib::quiz::RoundEnd;
use studydeck_lib::StudySet;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when color output is on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// One-line summary of a study set for listings
pub fn set_summary(set: &StudySet, active: bool, use_color: bool) -> String {
    let marker = if active { "* " } else { "  " };
    let title = paint(&set.title, Color::BOLD, use_color);
    let id = paint(&set.id, Color::GRAY, use_color);
    format!("{}{} ({} cards) {}", marker, title, set.cards.len(), id)
}

/// Full listing of a set's cards
pub fn render_set(set: &StudySet, use_color: bool) -> String {
    let mut lines = vec![paint(&set.title, Color::BOLD, use_color)];
    if !set.description.is_empty() {
        lines.extend(wrap_lines(&set.description, "", 80));
    }
    lines.push(paint(&format!("id: {}", set.id), Color::GRAY, use_color));
    lines.push(String::new());

    for (i, card) in set.cards.iter().enumerate() {
        lines.push(format!("{:>3}. {}", i + 1, paint(&card.front, Color::CYAN, use_color)));
        lines.extend(wrap_lines(&card.back, "     ", 80));
    }

    lines.join("\n")
}

/// Numbered options, one per line
pub fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn feedback(correct: bool, right_text: &str, wrong_text: &str, use_color: bool) -> String {
    if correct {
        paint(right_text, Color::GREEN, use_color)
    } else {
        paint(wrong_text, Color::RED, use_color)
    }
}

/// Message shown when a round finishes
pub fn round_end(end: RoundEnd, use_color: bool) -> String {
    match end {
        RoundEnd::Perfect { total } => paint(
            &format!("*** Perfect round! You got all {} correct! ***", total),
            Color::YELLOW,
            use_color,
        ),
        RoundEnd::Completed { score, total } => {
            format!("Round completed! Score: {}/{}", score, total)
        }
    }
}

/// Simple word wrap
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.len() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
        } else {
            let mut current_line = String::new();
            for word in line.split_whitespace() {
                if current_line.is_empty() {
                    current_line = word.to_string();
                } else if current_line.len() + 1 + word.len() <= effective_width {
                    current_line.push(' ');
                    current_line.push_str(word);
                } else {
                    lines.push(format!("{}{}", prefix, current_line));
                    current_line = word.to_string();
                }
            }
            if !current_line.is_empty() {
                lines.push(format!("{}{}", prefix, current_line));
            }
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}
