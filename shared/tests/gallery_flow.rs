use crux_core::testing::AppTester;
use crux_core::Request;
use shared::capabilities::CollectionResult;
use shared::{
    App, AvatarUpdate, Card, CardId, CollectionError, CollectionOperation, CollectionOutput,
    CruxApp, DialogState, Effect, Event, GalleryConfig, Model, NewCard, ProfileUpdate, User,
    UserId,
};

type Tester = AppTester<App, Effect>;

fn user(id: &str) -> User {
    User {
        id: UserId::new(id),
        name: "Jacques".into(),
        about: "Sailor".into(),
        avatar: "https://img.example/jacques.png".into(),
    }
}

fn card(id: &str, owner: &str, likes: &[&str]) -> Card {
    Card {
        id: CardId::new(id),
        image_url: format!("https://img.example/{id}.jpg"),
        caption: format!("place {id}"),
        owner_id: UserId::new(owner),
        likes: likes.iter().map(|l| UserId::new(*l)).collect(),
    }
}

fn seeded_model() -> Model {
    let mut model = Model::default();
    model.current_user = Some(user("u1"));
    model.set_cards(vec![
        card("3", "u1", &[]),
        card("5", "u2", &[]),
        card("7", "u2", &["u1", "u3"]),
    ]);
    model
}

fn collection_requests(effects: Vec<Effect>) -> Vec<Request<CollectionOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Collection(request) => Some(request),
            Effect::Render(_) => None,
        })
        .collect()
}

fn send(app: &Tester, model: &mut Model, event: Event) -> Vec<Request<CollectionOperation>> {
    collection_requests(app.update(event, model).effects)
}

fn resolve(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<CollectionOperation>,
    output: CollectionResult,
) {
    let update = app.resolve(request, output).expect("request should resolve");
    for event in update.events {
        app.update(event, model);
    }
}

fn card_ids(model: &Model) -> Vec<&str> {
    model.cards.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn initialize_requests_cards_and_user_without_loading() {
    let app = Tester::default();
    let mut model = Model::default();

    let update = app.update(Event::Initialize, &mut model);
    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    let requests = collection_requests(update.effects);
    let operations: Vec<_> = requests.iter().map(|r| r.operation.clone()).collect();
    assert_eq!(
        operations,
        vec![CollectionOperation::FetchCards, CollectionOperation::FetchCurrentUser]
    );
    assert!(!model.loading);
}

#[test]
fn initialize_survives_card_fetch_failure() {
    let app = Tester::default();
    let mut model = Model::default();

    let mut requests = send(&app, &mut model, Event::Initialize);
    let (cards_request, user_request) = requests.split_at_mut(1);

    resolve(
        &app,
        &mut model,
        &mut user_request[0],
        Ok(CollectionOutput::User(user("u1"))),
    );
    resolve(
        &app,
        &mut model,
        &mut cards_request[0],
        Err(CollectionError::Network {
            message: "connection refused".into(),
        }),
    );

    assert!(model.cards.is_empty());
    assert_eq!(model.current_user, Some(user("u1")));
    assert!(model.last_error.is_some());
    assert!(App.view(&model).error.is_none());
}

#[test]
fn toggle_like_sends_opposite_membership_and_adopts_server_card() {
    let app = Tester::default();
    let mut model = seeded_model();
    let before = model.cards.clone();

    let target = card("5", "u2", &[]);
    let mut requests = send(&app, &mut model, Event::ToggleLike(target));
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].operation,
        CollectionOperation::SetLikeStatus {
            card_id: CardId::new("5"),
            liked: true,
        }
    );

    let from_server = card("5", "u2", &["u1"]);
    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Ok(CollectionOutput::Card(from_server.clone())),
    );

    assert_eq!(model.cards.len(), before.len());
    assert_eq!(card_ids(&model), ["3", "5", "7"]);
    assert_eq!(model.cards[1], from_server);
    assert_eq!(model.cards[0], before[0]);
    assert_eq!(model.cards[2], before[2]);
}

#[test]
fn toggle_like_on_liked_card_requests_unlike() {
    let app = Tester::default();
    let mut model = seeded_model();

    let requests = send(&app, &mut model, Event::ToggleLike(card("7", "u2", &["u1", "u3"])));
    assert_eq!(
        requests[0].operation,
        CollectionOperation::SetLikeStatus {
            card_id: CardId::new("7"),
            liked: false,
        }
    );
}

#[test]
fn toggle_like_failure_leaves_collection_unchanged() {
    let app = Tester::default();
    let mut model = seeded_model();
    let before = model.cards.clone();

    let mut requests = send(&app, &mut model, Event::ToggleLike(card("5", "u2", &[])));
    resolve(&app, &mut model, &mut requests[0], Err(CollectionError::Timeout));

    assert_eq!(model.cards, before);
}

#[test]
fn overlapping_likes_apply_in_resolution_order() {
    let app = Tester::default();
    let mut model = seeded_model();

    let mut first = send(&app, &mut model, Event::ToggleLike(card("5", "u2", &[])));
    let mut second = send(&app, &mut model, Event::ToggleLike(card("5", "u2", &[])));

    resolve(
        &app,
        &mut model,
        &mut second[0],
        Ok(CollectionOutput::Card(card("5", "u2", &["u1"]))),
    );
    resolve(
        &app,
        &mut model,
        &mut first[0],
        Ok(CollectionOutput::Card(card("5", "u2", &["u1", "u9"]))),
    );

    assert_eq!(model.cards[1].like_count(), 2);
}

#[test]
fn delete_removes_by_id_even_with_stale_reference() {
    let app = Tester::default();
    let mut model = seeded_model();

    let mut stale = card("5", "u2", &[]);
    stale.caption = "edited elsewhere".into();

    let mut requests = send(&app, &mut model, Event::DeleteCard(stale));
    assert_eq!(
        requests[0].operation,
        CollectionOperation::DeleteCard {
            card_id: CardId::new("5")
        }
    );
    resolve(&app, &mut model, &mut requests[0], Ok(CollectionOutput::Deleted));

    assert_eq!(card_ids(&model), ["3", "7"]);
    assert!(model.find_card(&CardId::new("5")).is_none());
}

#[test]
fn delete_failure_keeps_card() {
    let app = Tester::default();
    let mut model = seeded_model();

    let mut requests = send(&app, &mut model, Event::DeleteCard(card("3", "u1", &[])));
    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Err(CollectionError::Forbidden {
            reason: "not yours".into(),
        }),
    );

    assert_eq!(card_ids(&model), ["3", "5", "7"]);
}

#[test]
fn add_card_prepends_and_closes_everything() {
    let app = Tester::default();
    let mut model = seeded_model();

    app.update(Event::SelectCard(card("7", "u2", &[])), &mut model);
    app.update(Event::OpenAddPlace, &mut model);
    assert_eq!(model.dialog, DialogState::AddingPlace);

    let fields = NewCard {
        image_url: "https://img.example/new.jpg".into(),
        caption: "Harbour".into(),
    };
    let mut requests = send(&app, &mut model, Event::AddCard(fields.clone()));
    assert!(model.loading);
    assert_eq!(App.view(&model).add_place.submit_label, "Saving...");
    assert_eq!(requests[0].operation, CollectionOperation::CreateCard(fields));

    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Ok(CollectionOutput::Card(card("9", "u1", &[]))),
    );

    assert_eq!(card_ids(&model), ["9", "3", "5", "7"]);
    assert_eq!(model.dialog, DialogState::Closed);
    assert!(model.selected_card.is_none());
    assert!(!model.loading);
}

#[test]
fn failed_profile_update_keeps_dialog_open_for_retry() {
    let app = Tester::default();
    let mut model = seeded_model();
    app.update(Event::OpenEditProfile, &mut model);

    let mut requests = send(
        &app,
        &mut model,
        Event::UpdateProfile(ProfileUpdate {
            name: "Ann".into(),
            about: "Explorer".into(),
        }),
    );
    assert!(model.loading);

    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Err(CollectionError::Rejected {
            status: 500,
            message: "server error".into(),
        }),
    );

    assert_eq!(model.current_user, Some(user("u1")));
    assert_eq!(model.dialog, DialogState::EditingProfile);
    assert!(!model.loading);

    let view = App.view(&model);
    assert!(view.edit_profile.is_open);
    assert_eq!(view.edit_profile.submit_label, "Save");

    // the user may retry
    let retry = send(
        &app,
        &mut model,
        Event::UpdateProfile(ProfileUpdate {
            name: "Ann".into(),
            about: "Explorer".into(),
        }),
    );
    assert_eq!(retry.len(), 1);
}

#[test]
fn avatar_update_replaces_user_and_closes_dialog() {
    let app = Tester::default();
    let mut model = seeded_model();
    app.update(Event::OpenEditAvatar, &mut model);

    let mut requests = send(
        &app,
        &mut model,
        Event::UpdateAvatar(AvatarUpdate {
            avatar: "https://img.example/new-face.png".into(),
        }),
    );

    let mut updated = user("u1");
    updated.avatar = "https://img.example/new-face.png".into();
    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Ok(CollectionOutput::User(updated.clone())),
    );

    assert_eq!(model.current_user, Some(updated));
    assert_eq!(model.dialog, DialogState::Closed);
    assert!(!model.loading);
}

#[test]
fn repeat_submission_while_loading_is_ignored() {
    let app = Tester::default();
    let mut model = seeded_model();
    app.update(Event::OpenEditProfile, &mut model);

    let fields = ProfileUpdate {
        name: "Ann".into(),
        about: "Explorer".into(),
    };
    let first = send(&app, &mut model, Event::UpdateProfile(fields.clone()));
    let second = app.update(Event::UpdateProfile(fields), &mut model);
    let third = app.update(
        Event::AddCard(NewCard {
            image_url: "https://img.example/x.jpg".into(),
            caption: "x".into(),
        }),
        &mut model,
    );

    assert_eq!(first.len(), 1);
    assert!(second.effects.is_empty());
    assert!(third.effects.is_empty());
    assert!(model.loading);
}

#[test]
fn opening_a_dialog_replaces_the_open_one() {
    let app = Tester::default();
    let mut model = Model::default();

    app.update(Event::OpenEditProfile, &mut model);
    app.update(Event::OpenAddPlace, &mut model);
    assert_eq!(model.dialog, DialogState::AddingPlace);

    let view = App.view(&model);
    assert!(!view.edit_profile.is_open);
    assert!(view.add_place.is_open);
    assert!(!view.edit_avatar.is_open);
}

#[test]
fn close_all_dialogs_is_idempotent() {
    let app = Tester::default();
    let mut model = seeded_model();
    app.update(Event::OpenEditAvatar, &mut model);
    app.update(Event::SelectCard(card("3", "u1", &[])), &mut model);

    app.update(Event::CloseAllDialogs, &mut model);
    let once = App.view(&model);
    app.update(Event::CloseAllDialogs, &mut model);
    let twice = App.view(&model);

    assert_eq!(once, twice);
    assert_eq!(model.dialog, DialogState::Closed);
    assert!(twice.image_viewer.is_none());
}

#[test]
fn configured_core_surfaces_failures() {
    let app = Tester::default();
    let mut model = seeded_model();
    app.update(
        Event::Configure(GalleryConfig {
            surface_errors: true,
            ..GalleryConfig::default()
        }),
        &mut model,
    );

    let mut requests = send(&app, &mut model, Event::DeleteCard(card("5", "u2", &[])));
    resolve(
        &app,
        &mut model,
        &mut requests[0],
        Err(CollectionError::NotFound {
            resource: "card 5".into(),
        }),
    );

    let error = App.view(&model).error.expect("error should be visible");
    assert_eq!(error.error_code, "NOT_FOUND");

    app.update(Event::DismissError, &mut model);
    assert!(App.view(&model).error.is_none());
}
