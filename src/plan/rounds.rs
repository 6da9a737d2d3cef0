//! Built-in script for the "capital of France" generation demo.

use super::transcript::CANDIDATE_ROWS;

pub const DEFAULT_PROMPT: &str = "What is the capital of France";

/// One generation round: words flashed while "thinking", then the settled
/// candidates with their probability bars. Row 0 is always the pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub cycle: [&'static [&'static str]; CANDIDATE_ROWS],
    pub tokens: [&'static str; CANDIDATE_ROWS],
    pub bars: [u8; CANDIDATE_ROWS],
}

/// Marker token that ends generation
pub const EOS: &str = "<EOS>";

pub fn default_rounds() -> Vec<Round> {
    vec![
        Round {
            cycle: [
                &["Paris", "London", "Berlin", "The", "A", "France"],
                &["It", "An", "A", "This", "A", "France"],
                &["city", "country", "Europe", "capital", "The", "France"],
            ],
            tokens: ["The", "A", "France"],
            bars: [92, 62, 40],
        },
        Round {
            cycle: [
                &["capital", "city", "nation", "capital", "capital"],
                &["city", "world", "state", "city", "world"],
                &["world", "country", "place", "world", "world"],
            ],
            tokens: ["capital", "city", "world"],
            bars: [90, 64, 38],
        },
        Round {
            cycle: [
                &["of", "city", "Rome", "of", "of"],
                &["city", "Rome", "nation", "city", "Rome"],
                &["Rome", "Paris", "Berlin", "Rome", "Rome"],
            ],
            tokens: ["of", "city", "Rome"],
            bars: [88, 58, 34],
        },
        Round {
            cycle: [
                &["France", "England", "computers", "France", "France"],
                &["England", "France", "world", "England", "England"],
                &["computers", "code", "machines", "computers", "computers"],
            ],
            tokens: ["France", "England", "computers"],
            bars: [91, 60, 31],
        },
        Round {
            cycle: [
                &["is", "was", "can", "is", "is"],
                &["was", "is", "could", "was", "was"],
                &["can", "will", "may", "can", "can"],
            ],
            tokens: ["is", "was", "can"],
            bars: [89, 57, 36],
        },
        Round {
            cycle: [
                &["Paris", "not", "world", "Paris", "Paris"],
                &["not", "Paris", "never", "not", "not"],
                &["world", "city", "planet", "world", "world"],
            ],
            tokens: ["Paris", "not", "world"],
            bars: [93, 41, 30],
        },
        Round {
            cycle: [
                &[".", ",", " ", ".", "."],
                &[",", ".", ";", ",", ","],
                &[" ", ".", "!", " ", " "],
            ],
            tokens: [".", ",", " "],
            bars: [87, 44, 25],
        },
        Round {
            cycle: [
                &[EOS, " but", " and", EOS, EOS],
                &[" but", " and", EOS, " but", " but"],
                &[" and", " but", ",", " and", " and"],
            ],
            tokens: [EOS, " but", " and"],
            bars: [94, 27, 23],
        },
    ]
}
