use crate::library::Track;

/// The two buttons every card carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardButton {
    Play,
    Queue,
}

/// One rendered card: a copy of the item and its index at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub track: Track,
    pub index: usize,
}

/// A button pressed on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAction {
    pub button: CardButton,
    pub track: Track,
    pub index: usize,
}

/// A display-agnostic list of cards with a cursor.
///
/// Every `render` throws away the previous cards and builds new ones from the
/// given items. Actions resolve against the snapshot taken at render time, not
/// against whatever the source list holds now.
#[derive(Debug, Default)]
pub struct CardList {
    cards: Vec<Card>,
    cursor: usize,
    notice: Option<String>,
}

impl CardList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, items: &[Track]) {
        self.cards = items
            .iter()
            .enumerate()
            .map(|(index, track)| Card {
                track: track.clone(),
                index,
            })
            .collect();
        self.notice = None;
        self.cursor = self.cursor.min(self.cards.len().saturating_sub(1));
    }

    /// Replace the cards with a message.
    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.cards.clear();
        self.cursor = 0;
        self.notice = Some(msg.into());
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&Card> {
        self.cards.get(self.cursor)
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.cards.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.cards.len().saturating_sub(1);
    }

    /// Press `button` on the card under the cursor.
    pub fn action(&self, button: CardButton) -> Option<CardAction> {
        self.selected().map(|card| CardAction {
            button,
            track: card.track.clone(),
            index: card.index,
        })
    }
}
