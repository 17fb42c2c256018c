#![forbid(unsafe_code)]

//! Quiz-taker sessions against the player's control strip.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flashcard_core::{BoxId, ControlsPosition, DisplayedState, GroupId, NullPresentation};
use flashcard_player::{ControlKind, ControlStyle, PlayerError, QuizPlayer};
use proptest::prelude::*;
use serde_json::json;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ── Helpers ─────────────────────────────────────────────────────────────

fn capitals_json() -> String {
    json!({
        "image": "europe.png",
        "imageDisplayDimensions": { "width": 800, "height": 600 },
        "groups": {
            "capitals": { "name": "Capitals", "color": "#ef4444" },
            "rivers": { "name": "Rivers", "color": "#3b82f6" },
            "empty": { "name": "Empty", "color": "#000000" }
        },
        "boxes": [
            { "id": "box1", "label": "", "answer": "Paris", "x": 10, "y": 10, "width": 10, "height": 5,
              "group": "capitals", "useGroupLabel": true },
            { "id": "box2", "label": "", "answer": "", "x": 30, "y": 10, "width": 10, "height": 5,
              "group": "capitals", "useGroupLabel": true },
            { "id": "box3", "label": "River", "answer": "Seine", "x": 50, "y": 10, "width": 10, "height": 5,
              "group": "rivers", "useGroupLabel": false }
        ],
        "linkGroups": [["box1", "box3"]],
        "controlsPosition": "left",
        "controlsOffsetX": 8,
        "controlsOffsetY": -2
    })
    .to_string()
}

fn shown_player() -> QuizPlayer {
    let mut player = QuizPlayer::from_json(&capitals_json()).unwrap();
    player.toggle_quiz_visibility();
    player
}

fn caption_of(player: &QuizPlayer, kind: &ControlKind) -> String {
    player
        .controls()
        .into_iter()
        .find(|c| &c.kind == kind)
        .map(|c| c.caption)
        .unwrap()
}

// ── Visibility ──────────────────────────────────────────────────────────

#[test]
fn quiz_starts_hidden_with_only_the_visibility_button() {
    let player = QuizPlayer::from_json(&capitals_json()).unwrap();
    assert!(!player.is_visible());
    let controls = player.controls();
    assert_eq!(controls[0].kind, ControlKind::Visibility);
    assert_eq!(controls[0].caption, "Show Image Quiz");
    assert_eq!(controls[0].style, ControlStyle::Show);
    assert!(controls[0].visible);
    assert!(controls[1..].iter().all(|c| !c.visible));
}

#[test]
fn showing_the_quiz_reveals_every_control() {
    let mut player = QuizPlayer::from_json(&capitals_json()).unwrap();
    assert_eq!(player.toggle_quiz_visibility(), "Hide Quiz");
    let controls = player.controls();
    let kinds: Vec<_> = controls.iter().map(|c| c.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ControlKind::Visibility,
            ControlKind::Reset,
            ControlKind::ToggleAll,
            ControlKind::Group(GroupId::new("capitals")),
            ControlKind::Group(GroupId::new("rivers")),
        ]
    );
    assert!(controls.iter().all(|c| c.visible));
    assert_eq!(controls[3].caption, "Show Capitals");
    assert_eq!(controls[3].color.as_deref(), Some("#ef4444"));
    assert_eq!(controls[2].caption, "Show All");

    assert_eq!(player.toggle_quiz_visibility(), "Show Image Quiz");
}

#[test]
fn hidden_quiz_ignores_clicks_and_rejects_controls() {
    let mut player = QuizPlayer::from_json(&capitals_json()).unwrap();
    let view = &mut NullPresentation;
    assert!(!player.click_box(&BoxId::new("box1"), view).unwrap());
    assert_eq!(
        player.activate(&ControlKind::ToggleAll, view).unwrap_err(),
        PlayerError::QuizHidden
    );
    assert_eq!(player.reset(view).unwrap_err(), PlayerError::QuizHidden);
    assert_eq!(
        player.quiz().state(&BoxId::new("box1")),
        DisplayedState::Label
    );
}

#[test]
fn box_states_survive_hiding() {
    let mut player = shown_player();
    assert!(player.click_box(&BoxId::new("box1"), &mut NullPresentation).unwrap());
    player.toggle_quiz_visibility();
    player.toggle_quiz_visibility();
    assert_eq!(
        player.quiz().state(&BoxId::new("box1")),
        DisplayedState::Answer
    );
}

// ── Captions ────────────────────────────────────────────────────────────

#[test]
fn box_click_toggles_link_partners() {
    let mut player = shown_player();
    assert!(player.click_box(&BoxId::new("box1"), &mut NullPresentation).unwrap());
    assert_eq!(player.quiz().state(&BoxId::new("box1")), DisplayedState::Answer);
    assert_eq!(player.quiz().state(&BoxId::new("box3")), DisplayedState::Answer);
    assert_eq!(player.quiz().state(&BoxId::new("box2")), DisplayedState::Label);
}

#[test]
fn group_caption_tracks_label_boxes() {
    let mut player = shown_player();
    let capitals = ControlKind::Group(GroupId::new("capitals"));
    let caption = player.activate(&capitals, &mut NullPresentation).unwrap();
    assert_eq!(caption, "Hide Capitals");
    assert_eq!(caption_of(&player, &capitals), "Hide Capitals");
    assert_eq!(
        player.quiz().displayed_state(&BoxId::new("box2")).unwrap().state,
        DisplayedState::Hidden
    );

    let caption = player.activate(&capitals, &mut NullPresentation).unwrap();
    assert_eq!(caption, "Show Capitals");
}

#[test]
fn toggle_all_and_reset_update_captions() {
    let mut player = shown_player();
    let view = &mut NullPresentation;
    assert_eq!(player.toggle_all(view).unwrap(), "Hide All");
    assert_eq!(
        caption_of(&player, &ControlKind::Group(GroupId::new("rivers"))),
        "Hide Rivers"
    );

    assert_eq!(player.reset(view).unwrap(), "Show All");
    assert_eq!(caption_of(&player, &ControlKind::ToggleAll), "Show All");
    assert_eq!(player.activate(&ControlKind::Reset, view).unwrap(), "Reset");
    assert_eq!(
        caption_of(&player, &ControlKind::Group(GroupId::new("capitals"))),
        "Show Capitals"
    );
}

#[test]
fn unknown_group_surfaces_core_error() {
    let mut player = shown_player();
    let err = player
        .toggle_group(&GroupId::new("oceans"), &mut NullPresentation)
        .unwrap_err();
    assert!(matches!(err, PlayerError::Quiz(ref e) if e.is_not_found()));
}

#[test]
fn empty_quiz_offers_show_all() {
    let mut player = QuizPlayer::from_json("{}").unwrap();
    player.toggle_quiz_visibility();
    assert_eq!(player.controls().len(), 3);
    assert_eq!(caption_of(&player, &ControlKind::ToggleAll), "Show All");
}

// ── Placement ───────────────────────────────────────────────────────────

#[test]
fn placement_comes_from_saved_settings() {
    let player = QuizPlayer::from_json(&capitals_json()).unwrap();
    let placement = player.controls_placement();
    assert_eq!(placement.position, ControlsPosition::Left);
    assert_eq!(placement.offset_x, 8.0);
    assert_eq!(placement.offset_y, -2.0);
    assert!(placement.precedes_image());
}

#[test]
fn unknown_position_falls_back_to_bottom() {
    let player = QuizPlayer::from_json(r#"{"controlsPosition": "center"}"#).unwrap();
    assert_eq!(player.controls_placement().position, ControlsPosition::Bottom);
}

#[test]
fn malformed_config_is_a_quiz_error() {
    let err = QuizPlayer::from_json("[1, 2]").unwrap_err();
    assert!(matches!(err, PlayerError::Quiz(_)));
}

// ── Logging ─────────────────────────────────────────────────────────────

struct CountingLayer(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn control_activations_are_logged() {
    let events = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(CountingLayer(Arc::clone(&events)));
    tracing::subscriber::with_default(subscriber, || {
        let mut player = QuizPlayer::from_json(&capitals_json()).unwrap();
        player.toggle_quiz_visibility();
        player.toggle_all(&mut NullPresentation).unwrap();
    });
    assert!(events.load(Ordering::SeqCst) >= 2);
}

// ── Properties ──────────────────────────────────────────────────────────

fn control_strategy() -> impl Strategy<Value = ControlKind> {
    prop_oneof![
        Just(ControlKind::Visibility),
        Just(ControlKind::Reset),
        Just(ControlKind::ToggleAll),
        Just(ControlKind::Group(GroupId::new("capitals"))),
        Just(ControlKind::Group(GroupId::new("rivers"))),
    ]
}

proptest! {
    #[test]
    fn captions_always_match_box_states(ops in prop::collection::vec(control_strategy(), 0..30)) {
        let mut player = QuizPlayer::from_json(&capitals_json()).unwrap();
        for op in &ops {
            let before: Vec<_> = ["box1", "box2", "box3"]
                .iter()
                .map(|id| player.quiz().state(&BoxId::new(*id)))
                .collect();
            let was_visible = player.is_visible();
            let result = player.activate(op, &mut NullPresentation);
            if !was_visible && *op != ControlKind::Visibility {
                prop_assert_eq!(result, Err(PlayerError::QuizHidden));
                let after: Vec<_> = ["box1", "box2", "box3"]
                    .iter()
                    .map(|id| player.quiz().state(&BoxId::new(*id)))
                    .collect();
                prop_assert_eq!(before, after);
            } else {
                prop_assert!(result.is_ok());
            }

            let any_label = player.quiz().any_in_label();
            let expected = if any_label { "Show All" } else { "Hide All" };
            prop_assert_eq!(caption_of(&player, &ControlKind::ToggleAll), expected);
        }
    }
}
