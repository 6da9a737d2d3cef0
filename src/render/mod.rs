//! Plain-text views of a demo snapshot for the terminal.

use crate::engine::PlaybackSnapshot;
use crate::plan::{CandidateRow, Transcript, Visual};

const BAR_CELLS: usize = 20;

/// `####....` bar for a width in percent
pub fn bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_CELLS + 50) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

pub fn input_line(t: &Transcript) -> String {
    let caret = if t.typing { "_" } else { "" };
    format!("> {}{caret}", t.input)
}

pub fn answer_line(t: &Transcript) -> String {
    let cursor = if t.cursor_visible { "|" } else { "" };
    let status = if t.final_status { "  [final]" } else { "" };
    format!("assistant: {}{cursor}{status}", t.answer)
}

fn row_line(index: usize, row: &CandidateRow, t: &Transcript) -> String {
    let marker = if t.chosen == Some(index) { '*' } else { ' ' };
    let token = if row.token.is_empty() { "-" } else { &row.token };
    format!("{marker} {token:<10} {} {:>3}%", bar(row.bar), row.bar)
}

/// Full multi-line view: chat thread, candidate table, input box.
pub fn render_transcript(t: &Transcript) -> String {
    let mut lines = Vec::new();
    if let Some(prompt) = &t.prompt {
        lines.push(format!("user: {prompt}"));
        lines.push(answer_line(t));
    }
    if t.rows.iter().any(|row| !row.token.is_empty()) {
        lines.push(String::new());
        for (index, row) in t.rows.iter().enumerate() {
            lines.push(row_line(index, row, t));
        }
    }
    lines.push(input_line(t));
    lines.join("\n")
}

/// One-line playback status for the bottom of the screen.
pub fn status_line<S>(snapshot: &PlaybackSnapshot<S>) -> String {
    let phase = if snapshot.finished {
        "finished"
    } else if snapshot.replaying {
        "replaying"
    } else if snapshot.paused {
        "paused"
    } else if snapshot.running {
        "playing"
    } else {
        "idle"
    };
    format!(
        "[{}] {phase} step {}/{} checkpoint {}/{}",
        snapshot.mode.as_str(),
        snapshot.cursor,
        snapshot.length,
        snapshot.checkpoint_index,
        snapshot.checkpoints.len().saturating_sub(1),
    )
}

pub fn visual_line(visual: &Visual) -> Option<String> {
    match visual {
        Visual::StarBurst { stars, .. } => Some(format!("  {}", "*".repeat(stars.len()))),
        Visual::FlyingToken { token, .. } => Some(format!("  -> {token}")),
        Visual::Finished => None,
    }
}
