//! The remote collection service the shell talks to on the core's behalf.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use crate::capabilities::{
    CollectionError, CollectionOperation, CollectionOutput, CollectionResult, OperationKind,
};
use crate::model::{AvatarUpdate, Card, CardId, NewCard, ProfileUpdate, User};

/// Remote CRUD over cards and the user profile. Transport and wire format are up to
/// the implementor.
#[async_trait]
pub trait CollectionService: Send + Sync {
    async fn fetch_cards(&self) -> Result<Vec<Card>, CollectionError>;

    async fn fetch_current_user(&self) -> Result<User, CollectionError>;

    /// Returns the card as the server now sees it.
    async fn set_like_status(&self, card_id: &CardId, liked: bool) -> Result<Card, CollectionError>;

    async fn delete_card(&self, card_id: &CardId) -> Result<(), CollectionError>;

    async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, CollectionError>;

    async fn update_avatar(&self, fields: &AvatarUpdate) -> Result<User, CollectionError>;

    async fn create_card(&self, fields: &NewCard) -> Result<Card, CollectionError>;
}

/// Executes one effect against `service`.
pub async fn perform<S>(service: &S, operation: CollectionOperation) -> CollectionResult
where
    S: CollectionService + ?Sized,
{
    match operation {
        CollectionOperation::FetchCards => service.fetch_cards().await.map(CollectionOutput::Cards),
        CollectionOperation::FetchCurrentUser => {
            service.fetch_current_user().await.map(CollectionOutput::User)
        }
        CollectionOperation::SetLikeStatus { card_id, liked } => service
            .set_like_status(&card_id, liked)
            .await
            .map(CollectionOutput::Card),
        CollectionOperation::DeleteCard { card_id } => service
            .delete_card(&card_id)
            .await
            .map(|()| CollectionOutput::Deleted),
        CollectionOperation::UpdateProfile(fields) => {
            service.update_profile(&fields).await.map(CollectionOutput::User)
        }
        CollectionOperation::UpdateAvatar(fields) => {
            service.update_avatar(&fields).await.map(CollectionOutput::User)
        }
        CollectionOperation::CreateCard(fields) => {
            service.create_card(&fields).await.map(CollectionOutput::Card)
        }
    }
}

#[derive(Debug)]
struct Store {
    user: User,
    cards: Vec<Card>,
    next_id: u64,
    failures: HashMap<OperationKind, CollectionError>,
    calls: Vec<CollectionOperation>,
}

/// A process-local collection. Only the owner may delete a card.
#[derive(Debug)]
pub struct InMemoryCollection {
    store: Mutex<Store>,
}

impl InMemoryCollection {
    #[must_use]
    pub fn new(user: User, cards: Vec<Card>) -> Self {
        Self {
            store: Mutex::new(Store {
                user,
                cards,
                next_id: 1,
                failures: HashMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Makes the next call of `operation` fail with `error`.
    pub async fn fail_next(&self, operation: OperationKind, error: CollectionError) {
        self.store.lock().await.failures.insert(operation, error);
    }

    /// Every operation received so far, in arrival order.
    pub async fn calls(&self) -> Vec<CollectionOperation> {
        self.store.lock().await.calls.clone()
    }

    pub async fn cards(&self) -> Vec<Card> {
        self.store.lock().await.cards.clone()
    }

    async fn begin(
        &self,
        operation: CollectionOperation,
    ) -> Result<MutexGuard<'_, Store>, CollectionError> {
        let mut store = self.store.lock().await;
        let kind = operation.kind();
        store.calls.push(operation);
        if let Some(error) = store.failures.remove(&kind) {
            return Err(error);
        }
        Ok(store)
    }
}

fn missing(card_id: &CardId) -> CollectionError {
    CollectionError::NotFound {
        resource: format!("card {card_id}"),
    }
}

#[async_trait]
impl CollectionService for InMemoryCollection {
    async fn fetch_cards(&self) -> Result<Vec<Card>, CollectionError> {
        let store = self.begin(CollectionOperation::FetchCards).await?;
        Ok(store.cards.clone())
    }

    async fn fetch_current_user(&self) -> Result<User, CollectionError> {
        let store = self.begin(CollectionOperation::FetchCurrentUser).await?;
        Ok(store.user.clone())
    }

    async fn set_like_status(&self, card_id: &CardId, liked: bool) -> Result<Card, CollectionError> {
        let mut store = self
            .begin(CollectionOperation::SetLikeStatus {
                card_id: card_id.clone(),
                liked,
            })
            .await?;
        let user_id = store.user.id.clone();
        let card = store
            .cards
            .iter_mut()
            .find(|c| &c.id == card_id)
            .ok_or_else(|| missing(card_id))?;

        card.likes.retain(|id| id != &user_id);
        if liked {
            card.likes.push(user_id);
        }
        Ok(card.clone())
    }

    async fn delete_card(&self, card_id: &CardId) -> Result<(), CollectionError> {
        let mut store = self
            .begin(CollectionOperation::DeleteCard {
                card_id: card_id.clone(),
            })
            .await?;
        let position = store
            .cards
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or_else(|| missing(card_id))?;

        if store.cards[position].owner_id != store.user.id {
            return Err(CollectionError::Forbidden {
                reason: format!("card {card_id} belongs to another user"),
            });
        }
        store.cards.remove(position);
        Ok(())
    }

    async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, CollectionError> {
        let mut store = self
            .begin(CollectionOperation::UpdateProfile(fields.clone()))
            .await?;
        store.user.name.clone_from(&fields.name);
        store.user.about.clone_from(&fields.about);
        Ok(store.user.clone())
    }

    async fn update_avatar(&self, fields: &AvatarUpdate) -> Result<User, CollectionError> {
        let mut store = self
            .begin(CollectionOperation::UpdateAvatar(fields.clone()))
            .await?;
        store.user.avatar.clone_from(&fields.avatar);
        Ok(store.user.clone())
    }

    async fn create_card(&self, fields: &NewCard) -> Result<Card, CollectionError> {
        let mut store = self
            .begin(CollectionOperation::CreateCard(fields.clone()))
            .await?;
        let id = CardId::new(format!("card-{}", store.next_id));
        store.next_id += 1;

        let card = Card {
            id,
            image_url: fields.image_url.clone(),
            caption: fields.caption.clone(),
            owner_id: store.user.id.clone(),
            likes: Vec::new(),
        };
        store.cards.insert(0, card.clone());
        Ok(card)
    }
}
