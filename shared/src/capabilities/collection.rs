use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AvatarUpdate, Card, CardId, NewCard, ProfileUpdate, User};

/// Remote CRUD over cards and the current user's profile, performed by the shell.
#[derive(Capability)]
pub struct Collection<Ev> {
    context: CapabilityContext<CollectionOperation, Ev>,
}

impl<Ev> Collection<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<CollectionOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn fetch_cards<F>(&self, callback: F)
    where
        F: FnOnce(Result<Vec<Card>, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::FetchCards, |output| match output {
            CollectionOutput::Cards(cards) => Ok(cards),
            other => Err(CollectionError::unexpected(&other)),
        }, callback);
    }

    pub fn fetch_current_user<F>(&self, callback: F)
    where
        F: FnOnce(Result<User, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::FetchCurrentUser, expect_user, callback);
    }

    pub fn set_like_status<F>(&self, card_id: CardId, liked: bool, callback: F)
    where
        F: FnOnce(Result<Card, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(
            CollectionOperation::SetLikeStatus { card_id, liked },
            expect_card,
            callback,
        );
    }

    pub fn delete_card<F>(&self, card_id: CardId, callback: F)
    where
        F: FnOnce(Result<(), CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::DeleteCard { card_id }, |output| match output {
            CollectionOutput::Deleted => Ok(()),
            other => Err(CollectionError::unexpected(&other)),
        }, callback);
    }

    pub fn update_profile<F>(&self, fields: ProfileUpdate, callback: F)
    where
        F: FnOnce(Result<User, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::UpdateProfile(fields), expect_user, callback);
    }

    pub fn update_avatar<F>(&self, fields: AvatarUpdate, callback: F)
    where
        F: FnOnce(Result<User, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::UpdateAvatar(fields), expect_user, callback);
    }

    pub fn create_card<F>(&self, fields: NewCard, callback: F)
    where
        F: FnOnce(Result<Card, CollectionError>) -> Ev + Send + 'static,
    {
        self.request(CollectionOperation::CreateCard(fields), expect_card, callback);
    }

    fn request<T, M, F>(&self, operation: CollectionOperation, extract: M, callback: F)
    where
        M: FnOnce(CollectionOutput) -> Result<T, CollectionError> + Send + 'static,
        F: FnOnce(Result<T, CollectionError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(callback(result.and_then(extract)));
        });
    }
}

fn expect_user(output: CollectionOutput) -> Result<User, CollectionError> {
    match output {
        CollectionOutput::User(user) => Ok(user),
        other => Err(CollectionError::unexpected(&other)),
    }
}

fn expect_card(output: CollectionOutput) -> Result<Card, CollectionError> {
    match output {
        CollectionOutput::Card(card) => Ok(card),
        other => Err(CollectionError::unexpected(&other)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CollectionOperation {
    FetchCards,
    FetchCurrentUser,
    SetLikeStatus { card_id: CardId, liked: bool },
    DeleteCard { card_id: CardId },
    UpdateProfile(ProfileUpdate),
    UpdateAvatar(AvatarUpdate),
    CreateCard(NewCard),
}

/// Payload-free tag for a [`CollectionOperation`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FetchCards,
    FetchCurrentUser,
    SetLikeStatus,
    DeleteCard,
    UpdateProfile,
    UpdateAvatar,
    CreateCard,
}

impl OperationKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FetchCards => "fetch_cards",
            Self::FetchCurrentUser => "fetch_current_user",
            Self::SetLikeStatus => "set_like_status",
            Self::DeleteCard => "delete_card",
            Self::UpdateProfile => "update_profile",
            Self::UpdateAvatar => "update_avatar",
            Self::CreateCard => "create_card",
        }
    }
}

impl CollectionOperation {
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::FetchCards => OperationKind::FetchCards,
            Self::FetchCurrentUser => OperationKind::FetchCurrentUser,
            Self::SetLikeStatus { .. } => OperationKind::SetLikeStatus,
            Self::DeleteCard { .. } => OperationKind::DeleteCard,
            Self::UpdateProfile(_) => OperationKind::UpdateProfile,
            Self::UpdateAvatar(_) => OperationKind::UpdateAvatar,
            Self::CreateCard(_) => OperationKind::CreateCard,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().name()
    }
}

impl Operation for CollectionOperation {
    type Output = CollectionResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CollectionOutput {
    Cards(Vec<Card>),
    User(User),
    Card(Card),
    Deleted,
}

impl CollectionOutput {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Cards(_) => "cards",
            Self::User(_) => "user",
            Self::Card(_) => "card",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CollectionError {
    #[error("network failure: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("malformed response: {reason}")]
    Malformed { reason: String },
}

impl CollectionError {
    fn unexpected(output: &CollectionOutput) -> Self {
        Self::Malformed {
            reason: format!("unexpected {} output", output.kind()),
        }
    }
}

pub type CollectionResult = Result<CollectionOutput, CollectionError>;
