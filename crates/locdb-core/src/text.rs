// crates/locdb-core/src/text.rs

//! # Text Normalization
//!
//! Two comparison keys are derived from every place name:
//!
//! - the **loose** key keeps diacritics and only lowercases and collapses
//!   whitespace (`"  Kraków  Nowa Huta"` -> `"kraków nowa huta"`),
//! - the **folded** key is additionally decomposed (NFD) and reduced to ASCII
//!   through a small digraph table (`"Łódź"` -> `"lodz"`).
//!
//! Both functions are pure and total: any input yields a key, possibly empty.

use unicode_normalization::UnicodeNormalization;

/// Lowercases `s` and collapses every whitespace run into a single space.
///
/// Diacritics are preserved, so this key is used for accent-sensitive
/// matching.
///
/// ```rust
/// use locdb_core::text::normalize_loose;
///
/// assert_eq!(normalize_loose("  Kraków \t Nowa   Huta "), "kraków nowa huta");
/// ```
pub fn normalize_loose(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

/// Converts a string into its folded ASCII key.
///
/// This performs:
/// 1) [`normalize_loose`]
/// 2) Unicode canonical decomposition (NFD), which splits `ó` into `o` + a
///    combining accent
/// 3) the digraph table from [`fold_digraph`] for letters that do not
///    decompose (`ł`, `ß`, `æ`, ...)
/// 4) dropping whatever is still outside ASCII
///
/// The result is idempotent: folding a folded key returns it unchanged.
///
/// ```rust
/// use locdb_core::text::normalize_folded;
///
/// assert_eq!(normalize_folded("Łódź"), "lodz");
/// assert_eq!(normalize_folded("Straße"), "strasse");
/// assert_eq!(normalize_folded("Kraków"), "krakow");
/// ```
pub fn normalize_folded(s: &str) -> String {
    let loose = normalize_loose(s);
    let mut out = String::with_capacity(loose.len());
    for ch in loose.nfd() {
        if ch.is_ascii() {
            out.push(ch.to_ascii_lowercase());
        } else if let Some(ascii) = fold_digraph(ch) {
            out.push_str(ascii);
        }
    }
    // Dropped characters may leave doubled or edge spaces behind.
    if out.starts_with(' ') || out.ends_with(' ') || out.contains("  ") {
        collapse_whitespace(&out)
    } else {
        out
    }
}

/// ASCII replacement for lowercase letters and punctuation that survive
/// canonical decomposition.
///
/// Returns `None` for characters that should be dropped from a folded key.
pub fn fold_digraph(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        'ł' => "l",
        'ß' => "ss",
        'æ' => "ae",
        'ø' => "o",
        'ð' => "o",
        'đ' => "d",
        'þ' => "p",
        'œ' => "oe",
        'ı' => "i",
        'ə' => "e",
        'м' => "m",
        '‘' | '’' | 'ʻ' | 'ʿ' => "'",
        '–' => "-",
        _ => return None,
    };
    Some(ascii)
}

/// True when folding changes the (loose) query, i.e. it carries diacritics or
/// other special characters and must be matched against loose keys.
///
/// ```rust
/// use locdb_core::text::is_accent_sensitive;
///
/// assert!(is_accent_sensitive("Łódź"));
/// assert!(!is_accent_sensitive("Lodz"));
/// ```
pub fn is_accent_sensitive(query: &str) -> bool {
    normalize_folded(query) != normalize_loose(query)
}

/// Stable ASCII id for a country name: folded, whitespace replaced by `_`,
/// everything outside `[0-9a-zA-Z_-]` removed.
///
/// ```rust
/// use locdb_core::text::country_slug;
///
/// assert_eq!(country_slug("Côte d'Ivoire"), "cote_divoire");
/// assert_eq!(country_slug("Bosnia and Herzegovina"), "bosnia_and_herzegovina");
/// ```
pub fn country_slug(name: &str) -> String {
    normalize_folded(name)
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_keeps_diacritics() {
        assert_eq!(normalize_loose("ŁÓDŹ"), "łódź");
        assert_eq!(normalize_loose("\tNew\n\nYork  "), "new york");
        assert_eq!(normalize_loose("   "), "");
    }

    #[test]
    fn folded_examples() {
        assert_eq!(normalize_folded("Łódź"), "lodz");
        assert_eq!(normalize_folded("Kraków"), "krakow");
        assert_eq!(normalize_folded("Þórshöfn"), "porshofn");
        assert_eq!(normalize_folded("Æbeltoft"), "aebeltoft");
        assert_eq!(normalize_folded("Ærø – Søby"), "aero - soby");
        assert_eq!(normalize_folded("Đakovo"), "dakovo");
        assert_eq!(normalize_folded("Sœur"), "soeur");
        assert_eq!(normalize_folded("Ta‘izz"), "ta'izz");
        assert_eq!(normalize_folded("İstanbul"), "istanbul");
    }

    #[test]
    fn folded_drops_unmappable_characters_without_double_spaces() {
        assert_eq!(normalize_folded("東京 Tokyo"), "tokyo");
        assert_eq!(normalize_folded("a 北 b"), "a b");
        assert_eq!(normalize_folded("Киев"), "");
        assert_eq!(normalize_folded("Москва"), "m");
    }

    #[test]
    fn folded_is_idempotent() {
        let samples = [
            "Łódź",
            "Kraków",
            "  São   Paulo ",
            "Ærø – Søby",
            "東京 Tokyo",
            "a 北 b",
            "Ta‘izz",
            "İstanbul",
            "ǅemal",
            "",
            "123 abc",
        ];
        for s in samples {
            let once = normalize_folded(s);
            assert_eq!(normalize_folded(&once), once, "input {s:?}");
            assert!(once.is_ascii());
        }
    }

    #[test]
    fn accent_sensitivity_ignores_case_and_spacing() {
        assert!(!is_accent_sensitive("WARSAW  Poland"));
        assert!(is_accent_sensitive("kraków"));
        assert!(is_accent_sensitive("straße"));
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(country_slug("Poland"), "poland");
        assert_eq!(country_slug("  United   Kingdom "), "united_kingdom");
        assert_eq!(country_slug("Guinea-Bissau"), "guinea-bissau");
        assert_eq!(country_slug("São Tomé & Príncipe"), "sao_tome__principe");
    }
}
