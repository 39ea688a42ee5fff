use serde::{Deserialize, Serialize};

use crate::capabilities::CollectionError;
use crate::config::GalleryConfig;
use crate::model::{AvatarUpdate, Card, CardId, NewCard, ProfileUpdate, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Event {
    #[default]
    Noop,

    /// Mount: loads the card collection and the current user.
    Initialize,
    Configure(GalleryConfig),

    // Card interactions
    ToggleLike(Card),
    DeleteCard(Card),
    SelectCard(Card),

    // Dialog submissions
    UpdateProfile(ProfileUpdate),
    UpdateAvatar(AvatarUpdate),
    AddCard(NewCard),

    OpenEditProfile,
    OpenAddPlace,
    OpenEditAvatar,
    CloseAllDialogs,
    DismissError,

    // Collection responses. Never sent by the shell directly.
    #[serde(skip)]
    CardsFetched(Result<Vec<Card>, CollectionError>),
    #[serde(skip)]
    CurrentUserFetched(Result<User, CollectionError>),
    #[serde(skip)]
    LikeStatusChanged {
        card_id: CardId,
        result: Result<Card, CollectionError>,
    },
    #[serde(skip)]
    CardDeleted {
        card_id: CardId,
        result: Result<(), CollectionError>,
    },
    #[serde(skip)]
    ProfileUpdated(Result<User, CollectionError>),
    #[serde(skip)]
    AvatarUpdated(Result<User, CollectionError>),
    #[serde(skip)]
    CardCreated(Result<Card, CollectionError>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Initialize => "initialize",
            Self::Configure(_) => "configure",
            Self::ToggleLike(_) => "toggle_like",
            Self::DeleteCard(_) => "delete_card",
            Self::SelectCard(_) => "select_card",
            Self::UpdateProfile(_) => "update_profile",
            Self::UpdateAvatar(_) => "update_avatar",
            Self::AddCard(_) => "add_card",
            Self::OpenEditProfile => "open_edit_profile",
            Self::OpenAddPlace => "open_add_place",
            Self::OpenEditAvatar => "open_edit_avatar",
            Self::CloseAllDialogs => "close_all_dialogs",
            Self::DismissError => "dismiss_error",
            Self::CardsFetched(_) => "cards_fetched",
            Self::CurrentUserFetched(_) => "current_user_fetched",
            Self::LikeStatusChanged { .. } => "like_status_changed",
            Self::CardDeleted { .. } => "card_deleted",
            Self::ProfileUpdated(_) => "profile_updated",
            Self::AvatarUpdated(_) => "avatar_updated",
            Self::CardCreated(_) => "card_created",
        }
    }

    /// Dialog submissions that set `loading` and are refused while one is in flight.
    #[must_use]
    pub const fn is_dialog_submission(&self) -> bool {
        matches!(
            self,
            Self::UpdateProfile(_) | Self::UpdateAvatar(_) | Self::AddCard(_)
        )
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Noop
                | Self::CardsFetched(_)
                | Self::CurrentUserFetched(_)
                | Self::LikeStatusChanged { .. }
                | Self::CardDeleted { .. }
                | Self::ProfileUpdated(_)
                | Self::AvatarUpdated(_)
                | Self::CardCreated(_)
        )
    }
}
