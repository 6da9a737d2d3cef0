use serde::{Deserialize, Serialize};

/// Number of candidate rows shown per generation round
pub const CANDIDATE_ROWS: usize = 3;

/// One row of the candidate table: a token and its probability bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub token: String,
    /// Bar width in percent
    pub bar: u8,
}

/// Everything the demo timeline accumulates.
///
/// Only deterministic step actions write here, so replaying history
/// rebuilds it exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Text in the chat input box
    pub input: String,
    pub typing: bool,
    /// Submitted user message
    pub prompt: Option<String>,
    /// Generated answer so far
    pub answer: String,
    pub rows: [CandidateRow; CANDIDATE_ROWS],
    pub chosen: Option<usize>,
    pub fading: bool,
    pub cursor_visible: bool,
    pub final_status: bool,
}

impl Transcript {
    pub fn clear_rows(&mut self) {
        for row in &mut self.rows {
            row.token.clear();
            row.bar = 0;
        }
        self.chosen = None;
    }

    /// Append a generated token, spacing it against what is already there.
    pub fn append_token(&mut self, token: &str) {
        let chunk = answer_chunk(token, !self.answer.trim().is_empty());
        self.answer.push_str(&chunk);
    }
}

/// Text to append for `token`. Punctuation attaches directly; anything else
/// after existing text gets a leading space.
pub fn answer_chunk(token: &str, has_existing_text: bool) -> String {
    if !has_existing_text {
        return token.to_string();
    }
    match token {
        "." | "," => token.to_string(),
        _ => format!(" {token}"),
    }
}
