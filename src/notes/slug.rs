use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const SEPARATOR: char = '-';
const FALLBACK: &str = "note";

/// Fold arbitrary text into lowercase alphanumerics joined by `-`.
///
/// Accents and other combining marks are dropped after NFKD decomposition;
/// non-Latin letters are kept as-is.
pub(crate) fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        FALLBACK.to_string()
    } else {
        out
    }
}

/// Slug for a note: learning text first, then native text.
pub(crate) fn derive_slug(learning_text: &str, native_text: &str) -> String {
    slugify(&format!("{learning_text} {native_text}"))
}

/// `base`, or `base-N` with the next free N when `base` is already taken.
pub(crate) fn unique_slug<'a>(base: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let mut has_base = false;
    let mut max_suffix: u32 = 1;

    for slug in taken {
        if slug == base {
            has_base = true;
            continue;
        }
        if let Some(rest) = slug.strip_prefix(base).and_then(|r| r.strip_prefix(SEPARATOR)) {
            if let Ok(k) = rest.parse::<u32>() {
                max_suffix = max_suffix.max(k);
            }
        }
    }

    if !has_base {
        return base.to_string();
    }
    format!("{base}{SEPARATOR}{}", max_suffix.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug_char(c: char) -> bool {
        c.is_alphanumeric() || c == SEPARATOR
    }

    #[test]
    fn mixed_scripts_keep_letters() {
        assert_eq!(derive_slug("سلام", "Bonjour"), "سلام-bonjour");
    }

    #[test]
    fn punctuation_and_spaces_collapse() {
        assert_eq!(derive_slug("  Où est   la gare ?! ", "Where's the station"), "ou-est-la-gare-where-s-the-station");
        assert_eq!(slugify("--a__b--"), "a-b");
    }

    #[test]
    fn arabic_diacritics_are_dropped() {
        // "shukran" with harakat and without
        assert_eq!(slugify("شُكْرًا"), slugify("شكرا"));
    }

    #[test]
    fn derivation_is_deterministic_and_clean() {
        let inputs = [("Ça va?", "How are you"), ("Ｆｕｌｌ width", "x"), ("a\tb\nc", "d")];
        for (l, n) in inputs {
            let a = derive_slug(l, n);
            assert_eq!(a, derive_slug(l, n));
            assert!(!a.chars().any(char::is_whitespace), "{a}");
            assert!(a.chars().all(is_slug_char), "{a}");
            assert!(!a.starts_with(SEPARATOR) && !a.ends_with(SEPARATOR), "{a}");
        }
        assert_eq!(derive_slug("Ｆｕｌｌ width", "x"), "full-width-x");
    }

    #[test]
    fn symbol_only_text_falls_back() {
        assert_eq!(derive_slug("?!", "..."), "note");
    }

    #[test]
    fn unique_slug_appends_next_suffix() {
        assert_eq!(unique_slug("salam", ["merci"]), "salam");
        assert_eq!(unique_slug("salam", ["salam"]), "salam-2");
        assert_eq!(unique_slug("salam", ["salam", "salam-2", "salam-7", "salam-x"]), "salam-8");
        // A suffix alone does not make the base taken.
        assert_eq!(unique_slug("salam", ["salam-3"]), "salam");
    }
}
