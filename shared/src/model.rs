use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::GalleryConfig;
use crate::AppError;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(UserId);
typed_id!(CardId);

// --- Remote records ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub about: String,
    pub avatar: String,
}

/// A shared image card. `likes` keeps the server's order; membership is what counts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub image_url: String,
    pub caption: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub likes: Vec<UserId>,
}

impl Card {
    #[must_use]
    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

// --- Dialog payloads ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub about: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AvatarUpdate {
    pub avatar: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewCard {
    pub image_url: String,
    pub caption: String,
}

/// Which modal form is showing. Only one can be open at a time.
#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogState {
    #[default]
    Closed,
    EditingProfile,
    AddingPlace,
    EditingAvatar,
}

#[derive(Default, Debug)]
pub struct Model {
    pub cards: Vec<Card>,
    pub current_user: Option<User>,
    pub dialog: DialogState,
    pub selected_card: Option<Card>,
    /// Set while a dialog submission is awaiting the collection service.
    pub loading: bool,
    pub last_error: Option<AppError>,
    pub config: GalleryConfig,
}

impl Model {
    #[must_use]
    pub fn current_user_id(&self) -> Option<&UserId> {
        self.current_user.as_ref().map(|u| &u.id)
    }

    #[must_use]
    pub fn find_card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == card_id)
    }

    /// Replaces the card with the same id in place. Returns `false` if no such card is held.
    pub fn replace_card(&mut self, card: Card) -> bool {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    /// Removes by id. Returns `false` if no such card is held.
    pub fn remove_card(&mut self, card_id: &CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| &c.id != card_id);
        self.cards.len() != before
    }

    /// Puts `card` at the front, dropping any older entry with the same id.
    pub fn prepend_card(&mut self, card: Card) {
        self.cards.retain(|c| c.id != card.id);
        self.cards.insert(0, card);
    }

    /// Replaces the whole collection, keeping the first occurrence of each id.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        let mut unique: Vec<Card> = Vec::with_capacity(cards.len());
        for card in cards {
            if unique.iter().any(|c| c.id == card.id) {
                tracing::debug!(card_id = %card.id, "dropping duplicate card from fetch");
                continue;
            }
            unique.push(card);
        }
        self.cards = unique;
    }

    pub fn open_dialog(&mut self, dialog: DialogState) {
        self.dialog = dialog;
    }

    pub fn close_all_dialogs(&mut self) {
        self.dialog = DialogState::Closed;
        self.selected_card = None;
    }
}
