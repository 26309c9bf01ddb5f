//! Cards and decks: the immutable content a stack section reveals.
//!
//! A deck is supplied once when a section mounts and never changes after.
//! Cards beyond the fifth are dropped at construction time so nothing
//! downstream has to re-check the cap.

use std::path::Path;

use tracing::warn;

use super::progress::MAX_CARDS;
use crate::error::{StackError, StackResult};

/// Fallback backgrounds, cycled by card index.
pub const DEFAULT_BACKGROUNDS: &[&str] = &["indigo", "teal", "crimson"];

/// One displayable item in the stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    /// Pre-rendered body; when present it replaces title/subtitle.
    pub content: Option<String>,
    /// Background reference (a palette name for terminal renderers).
    pub background: Option<String>,
    /// Small label pinned to the card's top-right corner.
    pub badge: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }
}

/// Ordered, capped collection of cards for one section.
#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    cards: Vec<Card>,
}

impl CardDeck {
    pub fn new(mut cards: Vec<Card>) -> Self {
        if cards.len() > MAX_CARDS {
            warn!(
                supplied = cards.len(),
                kept = MAX_CARDS,
                "card deck truncated"
            );
            cards.truncate(MAX_CARDS);
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// The card's own background, or the default for its position.
    pub fn background_for(&self, index: usize) -> &str {
        self.cards
            .get(index)
            .and_then(|c| c.background.as_deref())
            .unwrap_or(DEFAULT_BACKGROUNDS[index % DEFAULT_BACKGROUNDS.len()])
    }

    /// Load a deck from a card file.
    pub fn load(path: &Path) -> StackResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(parse_cards(&contents)?))
    }
}

/// Parse the card file format:
///
/// ```text
/// # comment
/// [card]
/// title = Giglance
/// subtitle = Open-source freelancing platform
/// badge = Source Code
/// ```
pub fn parse_cards(s: &str) -> StackResult<Vec<Card>> {
    let mut cards = Vec::new();
    // (card, line where its block started)
    let mut current: Option<(Card, usize)> = None;

    for (i, raw) in s.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "[card]" {
            if let Some((card, start)) = current.take() {
                cards.push(finish_card(card, start)?);
            }
            current = Some((Card::default(), line_no));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(StackError::card_file(line_no, "expected `key = value`"));
        };
        let Some((card, _)) = current.as_mut() else {
            return Err(StackError::card_file(line_no, "field outside a [card] block"));
        };
        let value = value.trim().trim_matches('"').to_string();
        match key.trim() {
            "title" => card.title = value,
            "subtitle" => card.subtitle = Some(value),
            "content" => card.content = Some(value.replace("\\n", "\n")),
            "background" => card.background = Some(value),
            "badge" => card.badge = Some(value),
            other => {
                return Err(StackError::card_file(line_no, format!("unknown field `{other}`")));
            }
        }
    }

    if let Some((card, start)) = current {
        cards.push(finish_card(card, start)?);
    }
    Ok(cards)
}

fn finish_card(card: Card, start: usize) -> StackResult<Card> {
    if card.title.trim().is_empty() {
        return Err(StackError::card_file(start, "card has no title"));
    }
    Ok(card)
}
