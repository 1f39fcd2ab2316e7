/// Stable key derivation for scanned content
///
/// `Scene:Canvas/Menu Panel/Play` becomes `scene.canvas_menu_panel_play`.
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a letter or a decimal digit, including `_` itself.
static NON_KEY_CHARS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}]+").expect("valid key character regex"));

/// Join a hierarchy given item-to-root into a root-to-item `/` path.
pub fn display_path<S: AsRef<str>>(hierarchy_path: &[S]) -> String {
    hierarchy_path
        .iter()
        .rev()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace every run of characters other than letters and decimal digits
/// with a single `_`.
pub fn clean_path(path: &str) -> String {
    NON_KEY_CHARS_REGEX.replace_all(path, "_").into_owned()
}

/// Derive the key for an item from its context label and its hierarchy
/// (item first, topmost ancestor last). Identical inputs always produce the
/// identical key.
pub fn make_key<S: AsRef<str>>(context: &str, hierarchy_path: &[S]) -> String {
    let cleaned = clean_path(&display_path(hierarchy_path));
    format!("{context}.{cleaned}")
        .trim_matches('.')
        .to_lowercase()
}
