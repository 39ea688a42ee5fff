//! The gallery orchestrator: owns all UI state and mediates every request to the
//! collection service. Nothing is committed locally until the service confirms it;
//! failures are logged, recorded as `last_error`, and otherwise leave state as it was.

use tracing::{debug, trace, warn};

use crate::capabilities::{Capabilities, CollectionError};
use crate::event::Event;
use crate::model::{Card, CardId, DialogState, Model, User};
use crate::view::ViewModel;
use crate::{AppError, AppResult, ErrorKind};

#[derive(Default)]
pub struct App;

impl App {
    fn apply_fetched_cards(
        model: &mut Model,
        result: Result<Vec<Card>, CollectionError>,
    ) -> AppResult<()> {
        model.set_cards(result?);
        Ok(())
    }

    fn apply_current_user(
        model: &mut Model,
        result: Result<User, CollectionError>,
    ) -> AppResult<()> {
        model.current_user = Some(result?);
        Ok(())
    }

    fn apply_like_status(
        model: &mut Model,
        card_id: &CardId,
        result: Result<Card, CollectionError>,
    ) -> AppResult<()> {
        let card = result?;
        if &card.id != card_id {
            return Err(AppError::new(
                ErrorKind::Deserialization,
                "like response describes a different card",
            )
            .with_context("requested", card_id.as_str())
            .with_context("returned", card.id.as_str()));
        }
        if !model.replace_card(card) {
            debug!(%card_id, "liked card is no longer in the collection");
        }
        Ok(())
    }

    fn apply_card_deleted(
        model: &mut Model,
        card_id: &CardId,
        result: Result<(), CollectionError>,
    ) -> AppResult<()> {
        result?;
        if !model.remove_card(card_id) {
            debug!(%card_id, "deleted card was already gone");
        }
        Ok(())
    }

    fn apply_user_update(
        model: &mut Model,
        result: Result<User, CollectionError>,
    ) -> AppResult<()> {
        model.current_user = Some(result?);
        model.close_all_dialogs();
        Ok(())
    }

    fn apply_card_created(
        model: &mut Model,
        result: Result<Card, CollectionError>,
    ) -> AppResult<()> {
        model.prepend_card(result?);
        model.close_all_dialogs();
        Ok(())
    }

    fn settle(operation: &'static str, outcome: AppResult<()>, model: &mut Model) {
        if let Err(error) = outcome {
            warn!(
                operation,
                error_code = error.code(),
                error = %error,
                "collection request failed"
            );
            model.last_error = Some(error);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            debug!(event = event_name, "user action");
        } else {
            trace!(event = event_name, "collection response");
        }

        if event.is_dialog_submission() && model.loading {
            debug!(event = event_name, "submission already in flight, ignoring");
            return;
        }

        match event {
            Event::Noop => {}

            Event::Initialize => {
                caps.collection.fetch_cards(Event::CardsFetched);
                caps.collection.fetch_current_user(Event::CurrentUserFetched);
            }

            Event::Configure(config) => {
                model.config = config;
                caps.render.render();
            }

            Event::ToggleLike(card) => {
                let liked = model
                    .current_user_id()
                    .is_some_and(|user_id| card.is_liked_by(user_id));
                let card_id = card.id.clone();
                caps.collection.set_like_status(card.id, !liked, move |result| {
                    Event::LikeStatusChanged { card_id, result }
                });
            }

            Event::DeleteCard(card) => {
                let card_id = card.id.clone();
                caps.collection
                    .delete_card(card.id, move |result| Event::CardDeleted { card_id, result });
            }

            Event::SelectCard(card) => {
                model.selected_card = Some(card);
                caps.render.render();
            }

            Event::UpdateProfile(fields) => {
                model.loading = true;
                caps.collection.update_profile(fields, Event::ProfileUpdated);
                caps.render.render();
            }

            Event::UpdateAvatar(fields) => {
                model.loading = true;
                caps.collection.update_avatar(fields, Event::AvatarUpdated);
                caps.render.render();
            }

            Event::AddCard(fields) => {
                model.loading = true;
                caps.collection.create_card(fields, Event::CardCreated);
                caps.render.render();
            }

            Event::OpenEditProfile => {
                model.open_dialog(DialogState::EditingProfile);
                caps.render.render();
            }

            Event::OpenAddPlace => {
                model.open_dialog(DialogState::AddingPlace);
                caps.render.render();
            }

            Event::OpenEditAvatar => {
                model.open_dialog(DialogState::EditingAvatar);
                caps.render.render();
            }

            Event::CloseAllDialogs => {
                model.close_all_dialogs();
                model.last_error = None;
                caps.render.render();
            }

            Event::DismissError => {
                model.last_error = None;
                caps.render.render();
            }

            Event::CardsFetched(result) => {
                let outcome = Self::apply_fetched_cards(model, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }

            Event::CurrentUserFetched(result) => {
                let outcome = Self::apply_current_user(model, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }

            Event::LikeStatusChanged { card_id, result } => {
                let outcome = Self::apply_like_status(model, &card_id, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }

            Event::CardDeleted { card_id, result } => {
                let outcome = Self::apply_card_deleted(model, &card_id, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }

            Event::ProfileUpdated(result) | Event::AvatarUpdated(result) => {
                model.loading = false;
                let outcome = Self::apply_user_update(model, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }

            Event::CardCreated(result) => {
                model.loading = false;
                let outcome = Self::apply_card_created(model, result);
                Self::settle(event_name, outcome, model);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::build(model)
    }
}
