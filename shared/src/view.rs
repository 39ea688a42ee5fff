use serde::{Deserialize, Serialize};

use crate::model::{Card, DialogState, Model, User, UserId};
use crate::AppError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub about: String,
    pub avatar: String,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            about: user.about.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub image_url: String,
    pub caption: String,
    pub like_count: usize,
    pub is_liked: bool,
    /// Only the owner gets a delete button.
    pub is_own: bool,
}

impl CardView {
    fn build(card: &Card, viewer: Option<&UserId>) -> Self {
        Self {
            id: card.id.0.clone(),
            image_url: card.image_url.clone(),
            caption: card.caption.clone(),
            like_count: card.like_count(),
            is_liked: viewer.is_some_and(|id| card.is_liked_by(id)),
            is_own: viewer.is_some_and(|id| card.is_owned_by(id)),
        }
    }
}

/// Props for one modal form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogView {
    pub is_open: bool,
    pub loading: bool,
    pub submit_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageViewerView {
    pub image_url: String,
    pub caption: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub profile: Option<ProfileView>,
    pub cards: Vec<CardView>,
    pub edit_profile: DialogView,
    pub add_place: DialogView,
    pub edit_avatar: DialogView,
    pub image_viewer: Option<ImageViewerView>,
    pub loading: bool,
    pub error: Option<UserFacingError>,
}

impl ViewModel {
    pub(crate) fn build(model: &Model) -> Self {
        let viewer = model.current_user_id();
        let config = &model.config;

        let dialog = |state: DialogState, idle_label: &str| DialogView {
            is_open: model.dialog == state,
            loading: model.loading,
            submit_label: if model.loading {
                config.saving_label.clone()
            } else {
                idle_label.to_string()
            },
        };

        Self {
            profile: model.current_user.as_ref().map(ProfileView::from),
            cards: model
                .cards
                .iter()
                .map(|card| CardView::build(card, viewer))
                .collect(),
            edit_profile: dialog(DialogState::EditingProfile, &config.save_label),
            add_place: dialog(DialogState::AddingPlace, &config.create_label),
            edit_avatar: dialog(DialogState::EditingAvatar, &config.save_label),
            image_viewer: model.selected_card.as_ref().map(|card| ImageViewerView {
                image_url: card.image_url.clone(),
                caption: card.caption.clone(),
            }),
            loading: model.loading,
            error: model
                .last_error
                .as_ref()
                .filter(|_| config.surface_errors)
                .map(UserFacingError::from),
        }
    }
}
