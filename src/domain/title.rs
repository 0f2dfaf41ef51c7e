//! Display title resolution

use crate::domain::{Node, Translations, FALLBACK_LANGUAGE};

/// Title shown when nothing better is known.
pub const UNTITLED: &str = "Untitled";

/// Resolve the display title of `node`.
///
/// Order: translation in `lang` (even if empty), non-empty translation in
/// the fallback language, non-empty node title, [`UNTITLED`]. A `null`
/// translation counts as missing.
pub fn resolve_title(node: &Node, translations: &Translations, lang: &str) -> String {
    let by_lang = translations.get(&node.id.to_string());
    let lookup = |tag: &str| by_lang.and_then(|t| t.get(tag)).and_then(Option::as_ref);

    if let Some(title) = lookup(lang) {
        return title.clone();
    }

    lookup(FALLBACK_LANGUAGE)
        .filter(|t| !t.is_empty())
        .or_else(|| node.title.as_ref().filter(|t| !t.is_empty()))
        .cloned()
        .unwrap_or_else(|| UNTITLED.to_string())
}
