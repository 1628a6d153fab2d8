//! Integration tests for the command building blocks.

use indexmap::IndexMap;
use serde::Deserialize;
use swatch_cli::output::{render_json, render_table};
use swatch_cli::replay::{ReplayEvent, replay};
use swatch_cli::theme::{Edit, apply_edits, load_session};

/// Rendered palette with category order kept.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteJson {
    categories: IndexMap<String, serde_json::Value>,
    text_colors: serde_json::Value,
}

fn edits(raw: &[&str]) -> Vec<Edit> {
    raw.iter().map(|edit| edit.parse().unwrap()).collect()
}

#[test]
fn test_palette_json_shape() {
    let session = load_session(None).unwrap();
    let rendered = render_json(session.state()).unwrap();
    let json: PaletteJson = serde_json::from_str(&rendered).unwrap();

    let names: Vec<&str> = json.categories.keys().map(String::as_str).collect();
    assert_eq!(names, ["primary", "secondary", "tertiary", "accent"]);
    assert_eq!(json.categories["primary"]["value"], "#3366cc");
    for category in json.categories.values() {
        assert_eq!(category["variants"].as_array().unwrap().len(), 9);
    }
    assert!(json.text_colors["contrast"].is_object());
}

#[test]
fn test_set_marks_edited_and_keeps_relations() {
    let mut session = load_session(None).unwrap();
    apply_edits(&mut session, &edits(&["primary=#CC3366", "accent=gold"])).unwrap();

    let summary = session
        .state()
        .current()
        .values()
        .map(|state| {
            format!(
                "{} -> {} changed={}",
                state.category, state.relative_to, state.has_changed
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(summary, @r"
    primary -> primary changed=true
    secondary -> primary changed=false
    tertiary -> primary changed=false
    accent -> primary changed=true
    ");
    assert_eq!(session.state().get("accent").unwrap().value, "#ffd700");
}

#[test]
fn test_set_unknown_category_fails() {
    let mut session = load_session(None).unwrap();
    let err = apply_edits(&mut session, &edits(&["nope=#fff"])).unwrap_err();
    assert!(format!("{err:#}").contains("Unknown color category"));
}

#[test]
fn test_table_lists_every_step() {
    let session = load_session(None).unwrap();
    let table = render_table(session.state());
    assert_eq!(table.row_iter().count(), 36);
    let rendered = table.to_string();
    assert!(rendered.contains("#3366cc"));
    assert!(rendered.contains("seed"));
}

#[test]
fn test_replay_coalesces_bursts() {
    let mut session = load_session(None).unwrap();
    let events: Vec<ReplayEvent> = serde_json::from_str(
        r##"[
            {"at_ms": 0,  "category": "primary", "color": "#aa0000"},
            {"at_ms": 10, "category": "primary", "color": "#bb0000"},
            {"at_ms": 20, "category": "primary", "color": "#cc3366"},
            {"at_ms": 30, "category": "accent",  "color": "#00aa00"},
            {"at_ms": 200, "category": "secondary", "color": "#123456"}
        ]"##,
    )
    .unwrap();

    let commits = replay(&mut session, &events).unwrap();
    let log: Vec<String> = commits
        .iter()
        .map(|commit| format!("{}@{}", commit.category, commit.at_ms))
        .collect();
    assert_eq!(log, ["primary@70", "accent@80", "secondary@250"]);

    let state = session.state();
    assert_eq!(state.get("primary").unwrap().value, "#cc3366");
    assert_eq!(state.get("secondary").unwrap().value, "#123456");
    assert!(state.current().values().filter(|s| s.has_changed).count() == 3);
}

#[test]
fn test_replay_reset_discards_pending() {
    let mut session = load_session(None).unwrap();
    let events: Vec<ReplayEvent> = serde_json::from_str(
        r##"[
            {"at_ms": 0, "category": "primary", "color": "#aa0000"},
            {"at_ms": 10, "action": {"type": "RESET"}}
        ]"##,
    )
    .unwrap();

    let commits = replay(&mut session, &events).unwrap();
    assert!(commits.is_empty());
    assert_eq!(session.state().current(), session.state().initial());
}
