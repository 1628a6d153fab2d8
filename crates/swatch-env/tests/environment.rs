//! Integration tests for the environment binding over an in-memory host.

use swatch_env::{EnumerationStrategy, Environment, MemoryStyleHost};

const THEME: &str = r"
:root {
    --color-primary: #3366cc;
    --color-secondary: oklch(from var(--color-primary) l c calc(h + 120));
    --text-base: #1a1a1a;
}
";

fn environment() -> Environment<MemoryStyleHost> {
    Environment::new(MemoryStyleHost::from_stylesheet(THEME).expect("stylesheet")).expect("root")
}

#[test]
fn test_writes_serialize_as_inline_css_text() {
    let mut env = environment();
    env.set_properties([("color-primary", "#cc3366"), ("--primary-l1", "#dd4477")]);
    env.set_property_with_prefix("seed", "red", "theme");

    insta::assert_snapshot!(
        env.snapshot(),
        @"--color-primary: #cc3366; --primary-l1: #dd4477; --theme-seed: red;"
    );
}

#[test]
fn test_dependent_follows_seed_write() {
    let mut env = environment();
    let before = env.evaluate_color("var(--color-secondary)").unwrap();

    env.set_property("--color-primary", "#cc3366");
    let after = env.evaluate_color("var(--color-secondary)").unwrap();

    assert_ne!(before.to_hex(), after.to_hex());
}

#[test]
fn test_enumeration_sees_inline_and_stylesheet() {
    let mut env = environment();
    env.set_property("--accent", "gold");
    let all = env.get_all_properties(EnumerationStrategy::Auto);
    let names: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        ["--color-primary", "--color-secondary", "--text-base", "--accent"]
    );
}

#[test]
fn test_reset_restores_initial_snapshot() {
    let mut env = environment();
    let initial = env.snapshot();
    env.set_property("--color-primary", "#000000");
    env.reset_to_initial(&initial).unwrap();
    assert_eq!(env.snapshot(), "");
    assert_eq!(
        env.get_property("--color-primary").as_deref(),
        Some("#3366cc")
    );
}
