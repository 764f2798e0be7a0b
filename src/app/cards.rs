//! Deck content: captioned cards, the built-in sample deck, and a loader
//! for user-supplied decks.

use std::path::Path;

use anyhow::{bail, Context};

use swipe_deck::ui::card_stack::CardView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub caption: String,
    pub detail: String,
}

impl Card {
    pub fn new(caption: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            detail: detail.into(),
        }
    }
}

impl CardView for Card {
    fn title(&self) -> &str {
        &self.caption
    }

    fn body(&self) -> &str {
        &self.detail
    }
}

/// Deck shown when no `--items` file is given.
pub fn sample_deck() -> Vec<Card> {
    vec![
        Card::new(
            "Mount Bromo, Indonesia",
            "An active volcano in East Java, rising out of a sea of sand inside the Tengger caldera.",
        ),
        Card::new(
            "Le Phare du Petit Minou, France",
            "A lighthouse at the mouth of the Brest roadstead, reached by a narrow stone causeway.",
        ),
        Card::new(
            "Rickenbacker Causeway, United States",
            "The road linking Miami to Key Biscayne across Biscayne Bay.",
        ),
        Card::new(
            "Wanaka, New Zealand",
            "A lakeside town in Otago, known for the lone willow standing in the water.",
        ),
        Card::new(
            "Black Forest, Germany",
            "Wooded mountain range in Baden-Württemberg, bordered by the Rhine valley.",
        ),
    ]
}

/// Read a deck file: one card per line as `caption | detail`.  The detail
/// is optional; blank lines and `#` comments are skipped.
pub fn load_deck(path: &Path) -> anyhow::Result<Vec<Card>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading deck file {}", path.display()))?;
    let cards = parse_deck(&contents);
    if cards.is_empty() {
        bail!("deck file {} has no cards", path.display());
    }
    Ok(cards)
}

fn parse_deck(s: &str) -> Vec<Card> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (caption, detail) = line.split_once('|').unwrap_or((line, ""));
            let caption = caption.trim();
            (!caption.is_empty()).then(|| Card::new(caption, detail.trim()))
        })
        .collect()
}
