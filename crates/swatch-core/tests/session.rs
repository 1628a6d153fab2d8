//! End-to-end behavior of a color session over an in-memory host.

use std::time::Duration;

use swatch_core::{
    Action, CategoryPatch, Clock, ManualClock, Session, TextColor, ThemeConfig,
};
use swatch_env::MemoryStyleHost;

fn session() -> Session<MemoryStyleHost> {
    let config = ThemeConfig::default();
    Session::initialize(&config, config.build_host().expect("default host")).expect("session")
}

fn hexes(session: &Session<MemoryStyleHost>, category: &str) -> Vec<String> {
    session
        .state()
        .get(category)
        .expect("category")
        .variants
        .iter()
        .map(|variant| variant.hex_value.clone())
        .collect()
}

#[test]
fn test_initial_palette() {
    let session = session();
    let primary = session.state().get("primary").unwrap();
    assert_eq!(primary.value, "#3366cc");
    assert_eq!(primary.variants.len(), 9);
    assert!(!primary.has_changed);

    let base = session.state().text_colors().base;
    for state in session.state().current().values() {
        assert_eq!(state.variants.len(), 9);
        for variant in &state.variants {
            let base_text = variant.resolved.contrast_lstar(&base) > 50.0;
            assert_eq!(
                variant.contrasting_text_color == TextColor::Base,
                base_text,
                "{}",
                variant.token
            );
        }
    }
}

#[test]
fn test_commit_updates_relative_dependents() {
    let mut session = session();
    let secondary_before = hexes(&session, "secondary");
    let primary_before = hexes(&session, "primary");

    session.commit("primary", "#CC3366").unwrap();

    let primary = session.state().get("primary").unwrap();
    assert_eq!(primary.value, "#cc3366");
    assert!(primary.has_changed);
    assert_ne!(hexes(&session, "primary"), primary_before);

    let secondary = session.state().get("secondary").unwrap();
    assert!(!secondary.has_changed);
    assert_ne!(hexes(&session, "secondary"), secondary_before);
    assert_eq!(
        secondary.value,
        session
            .env()
            .compute_color_property("--color-secondary", swatch_color::ColorSpace::Srgb)
            .unwrap()
            .to_hex()
    );
}

#[test]
fn test_edited_dependent_is_never_overwritten() {
    let mut session = session();
    session.commit("secondary", "#00ff00").unwrap();
    let pinned = session.state().get("secondary").unwrap().clone();

    session.commit("primary", "#CC3366").unwrap();

    let secondary = session.state().get("secondary").unwrap();
    assert_eq!(secondary, &pinned);
    assert_eq!(secondary.value, "#00ff00");
    assert_ne!(
        session.state().get("tertiary").unwrap(),
        session.state().initial().get("tertiary").unwrap()
    );
}

#[test]
fn test_reset_matches_fresh_initialize() {
    let mut session = session();
    session.commit("primary", "#CC3366").unwrap();
    session.commit("accent", "#101010").unwrap();

    session.reset().unwrap();

    let fresh = self::session();
    assert_eq!(session.state(), fresh.state());
    assert_eq!(session.env().snapshot(), "");

    // The environment is back to its declarations, so a rebuilt session
    // over the same host agrees too.
    let config = ThemeConfig::default();
    let host = session.env().host().clone();
    let rebuilt = Session::initialize(&config, host).unwrap();
    assert_eq!(rebuilt.state().current(), fresh.state().current());
}

#[test]
fn test_dispatch_reset_restores_initial() {
    let mut session = session();
    session.commit("primary", "#CC3366").unwrap();
    let state = session.dispatch(&Action::Reset).clone();
    assert_eq!(state.current(), state.initial());
}

#[test]
fn test_unknown_action_keeps_state() {
    let mut session = session();
    let before = session.state().clone();
    let action: Action = serde_json::from_str(r#"{"type":"SHOW_INFO","payload":{}}"#).unwrap();
    let after = session.dispatch(&action);
    assert_eq!(after, &before);
    assert!(after.same_current(&before));
}

#[test]
fn test_debounced_burst_commits_once() {
    let mut session = session();
    let clock = ManualClock::new();
    let secondary_before = hexes(&session, "secondary");

    for color in ["#aa0000", "#bb0000", "#cc3366"] {
        session.input("primary", color, clock.now()).unwrap();
        clock.advance(Duration::from_millis(10));
    }

    // Live value moves immediately; dependents wait for the commit.
    assert_eq!(session.state().get("primary").unwrap().value, "#cc3366");
    assert!(!session.state().get("primary").unwrap().has_changed);
    assert_eq!(hexes(&session, "secondary"), secondary_before);
    assert!(session.is_calculating("primary"));
    assert!(session.is_calculating("secondary"));

    assert!(session.tick(clock.now()).unwrap().is_empty());

    clock.advance(Duration::from_millis(40));
    let committed = session.tick(clock.now()).unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].as_str(), "primary");

    assert!(session.state().get("primary").unwrap().has_changed);
    assert_ne!(hexes(&session, "secondary"), secondary_before);
    assert!(!session.is_calculating("secondary"));
    assert!(session.tick(clock.now()).unwrap().is_empty());
}

#[test]
fn test_reset_drops_pending_commit() {
    let mut session = session();
    let clock = ManualClock::new();
    session.input("primary", "#cc3366", clock.now()).unwrap();
    session.reset().unwrap();

    clock.advance(Duration::from_millis(100));
    assert!(session.tick(clock.now()).unwrap().is_empty());
    assert_eq!(session.state().get("primary").unwrap().value, "#3366cc");
}

#[test]
fn test_set_color_json_roundtrip_through_dispatch() {
    let mut session = session();
    let action = Action::SetColor {
        category: "accent".into(),
        payload: CategoryPatch::value("rebeccapurple"),
    };
    let json = serde_json::to_string(&action).unwrap();
    let parsed: Action = serde_json::from_str(&json).unwrap();
    session.dispatch(&parsed);
    assert_eq!(session.state().get("accent").unwrap().value, "#663399");
}

#[test]
fn test_state_serializes_camel_case() {
    let session = session();
    let json = serde_json::to_value(session.state()).unwrap();
    let primary = &json["current"]["primary"];
    assert_eq!(primary["value"], "#3366cc");
    assert_eq!(primary["isRelative"], false);
    assert_eq!(primary["relativeTo"], "primary");
    assert_eq!(primary["variants"].as_array().unwrap().len(), 9);
    assert_eq!(primary["variants"][0]["token"]["step"], "l4");
    assert!(json["textColors"]["base"].is_object());
}
