//! The slice of deck state that survives a restart.
//!
//! Only the front index is persisted.  Offsets and animations are transient
//! and always come back idle at zero.  The text form is a single
//! `selected_index = N` line so it can live alongside other `key = value`
//! settings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const KEY: &str = "selected_index";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("no `selected_index` entry in saved state")]
    Missing,
    #[error("invalid `selected_index` value {0:?}")]
    InvalidIndex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedState {
    pub selected_index: usize,
}

impl fmt::Display for SavedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{KEY} = {}", self.selected_index)
    }
}

impl FromStr for SavedState {
    type Err = RestoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != KEY {
                continue;
            }
            let value = value.trim();
            return value
                .parse()
                .map(|selected_index| SavedState { selected_index })
                .map_err(|_| RestoreError::InvalidIndex(value.to_string()));
        }
        Err(RestoreError::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form() {
        let saved = SavedState { selected_index: 7 };
        assert_eq!(saved.to_string(), "selected_index = 7\n");
        assert_eq!(saved.to_string().parse::<SavedState>(), Ok(saved));
    }

    #[test]
    fn tolerates_comments_and_other_keys() {
        let text = "# deck\nendless = true\n  selected_index=12  \n";
        assert_eq!(text.parse(), Ok(SavedState { selected_index: 12 }));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<SavedState>(), Err(RestoreError::Missing));
        assert_eq!(
            "selected_index = -3".parse::<SavedState>(),
            Err(RestoreError::InvalidIndex("-3".into()))
        );
    }
}
