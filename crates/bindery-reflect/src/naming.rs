//! Accessor naming conventions.

/// Prefixes tried, in order, when looking up a property getter.
pub const GETTER_PREFIXES: [&str; 2] = ["get", "is"];

/// Prefix of a property setter.
pub const SETTER_PREFIX: &str = "set";

/// Upper-case the first character of `name`.
///
/// ```
/// assert_eq!(bindery_reflect::capitalize("address"), "Address");
/// assert_eq!(bindery_reflect::capitalize(""), "");
/// ```
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Candidate getter names for `property`, in lookup order.
#[must_use]
pub fn getter_names(property: &str) -> [String; 2] {
    let cap = capitalize(property);
    GETTER_PREFIXES.map(|prefix| format!("{prefix}{cap}"))
}

/// Setter name for `property`.
#[must_use]
pub fn setter_name(property: &str) -> String {
    format!("{SETTER_PREFIX}{}", capitalize(property))
}
