//! Clipboard text for finished or abandoned games.
use crate::feedback::GuessRow;
use crate::footballer::GameMode;

/// Share text for `rows` (most recent first, as displayed).
///
/// Classic shares one line of coloured squares per guess; the image modes
/// share the guessed names, since their rows carry no feedback.
#[must_use]
pub fn share_text(mode: GameMode, rows: &[GuessRow], solved: bool, url: &str) -> String {
    let link = format!("{}/{}", url.trim_end_matches('/'), mode.key());
    let tries = rows.len();
    let (header, lines): (String, Vec<String>) = if mode.shows_feedback() {
        let header = if solved {
            format!("Footle {} solved in {tries} tries", mode.label())
        } else {
            format!("Footle {} X/?", mode.label())
        };
        let grid: Vec<String> = rows
            .iter()
            .map(|row| row.colors().iter().map(|c| c.emoji()).collect())
            .collect();
        (header, grid)
    } else {
        let score = if solved {
            tries.to_string()
        } else {
            "X".to_string()
        };
        let names: Vec<String> = rows.iter().map(|row| row.footballer.fullname.clone()).collect();
        (format!("Footle {} {score}/?", mode.label()), names)
    };

    let mut text = header;
    for line in lines {
        text.push('\n');
        text.push_str(&line);
    }
    text.push('\n');
    text.push_str(&link);
    text
}
