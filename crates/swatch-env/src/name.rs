//! Custom-property name normalization.

/// Normalize a property reference to its `--`-prefixed form.
///
/// Accepts `x`, `--x` and `var(--x)`; a `var()` fallback is ignored.
///
/// ```
/// use swatch_env::normalize_property_name;
///
/// assert_eq!(normalize_property_name("color-primary"), "--color-primary");
/// assert_eq!(normalize_property_name("var(--color-primary)"), "--color-primary");
/// ```
pub fn normalize_property_name(name: &str) -> String {
    let mut name = name.trim();
    if let Some(inner) = name
        .strip_prefix("var(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        name = inner.split(',').next().unwrap_or(inner).trim();
    }
    if name.starts_with("--") {
        name.to_string()
    } else {
        format!("--{name}")
    }
}

/// Normalize `name` and scope it under `prefix`.
///
/// `--x` with prefix `theme` becomes `--theme-x`. Names that already carry
/// the prefix are left alone. An empty prefix only normalizes.
pub fn prefixed_property_name(name: &str, prefix: &str) -> String {
    let name = normalize_property_name(name);
    let prefix = prefix.trim().trim_start_matches('-');
    if prefix.is_empty() {
        return name;
    }
    let scoped = format!("--{prefix}-");
    if name.starts_with(&scoped) {
        name
    } else {
        format!("{scoped}{}", &name[2..])
    }
}
