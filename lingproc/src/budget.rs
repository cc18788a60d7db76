//! Word budget checks for spoken scripts.
//!
//! A script is read aloud at roughly [`WORDS_PER_MINUTE`], so a podcast of
//! `D` minutes may contain at most `D * WORDS_PER_MINUTE` words.

use serde::Serialize;
use tracing::trace;

/// Average speaking rate.
pub const WORDS_PER_MINUTE: usize = 150;

/// Largest word count that fits in `minutes` of speech.
pub fn max_words(minutes: u32) -> usize {
    minutes as usize * WORDS_PER_MINUTE
}

/// Number of maximal non-whitespace runs in `text`.
///
/// Empty and whitespace-only text count as zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Outcome of measuring a text against a [`WordBudget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetCheck {
    pub words: usize,
    pub limit: usize,
}

impl BudgetCheck {
    /// Whether the text fits the budget.
    pub fn within(&self) -> bool {
        self.words <= self.limit
    }
}

/// Spoken-length budget for a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBudget {
    minutes: u32,
}

impl WordBudget {
    pub fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn max_words(&self) -> usize {
        max_words(self.minutes)
    }

    /// Count the words of `text` and compare them to the limit.
    pub fn check(&self, text: &str) -> BudgetCheck {
        let check = BudgetCheck {
            words: word_count(text),
            limit: self.max_words(),
        };
        trace!(words = check.words, limit = check.limit, "word budget checked");
        check
    }
}
