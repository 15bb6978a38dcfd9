//! Transliteration of labels into ASCII base characters.
//!
//! Menu ids are slugs derived from human-readable keys, which may carry
//! diacritics or ligatures. The generator folds them to ASCII before
//! lowercasing and slugging, so `"Über uns"` and `"Uber uns"` derive the
//! same id.

/// Folds text into ASCII base characters.
///
/// Injected into the generator so hosts can substitute a richer engine
/// (ICU, language packs) without touching the reconciliation logic.
pub trait Transliterator: Send + Sync {
    /// Transliterate `text` for the given language code. Characters with
    /// no known ASCII form are replaced with `_`.
    fn transliterate(&self, text: &str, langcode: &str) -> String;
}

/// Default transliterator: a fixed folding table for Latin diacritics and
/// common ligatures, with language-specific overrides (German umlauts fold
/// to digraphs under `de`).
#[derive(Debug, Default, Clone)]
pub struct AsciiFolding;

impl AsciiFolding {
    pub fn new() -> Self {
        Self
    }
}

impl Transliterator for AsciiFolding {
    fn transliterate(&self, text: &str, langcode: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            fold_char(c, langcode, &mut out);
        }
        out
    }
}

/// Append the ASCII folding of a single character.
///
/// Case is preserved for one-to-one foldings: the lowercase form is looked
/// up, and the replacement's first letter is re-capitalized when the input
/// was uppercase.
fn fold_char(c: char, langcode: &str, out: &mut String) {
    if c.is_ascii() {
        out.push(c);
        return;
    }

    let lower = c.to_lowercase().next().unwrap_or(c);
    let Some(folded) = fold_lower(lower, langcode) else {
        out.push('_');
        return;
    };

    if c.is_uppercase() {
        let mut chars = folded.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(folded);
    }
}

/// Folding table for lowercase characters. Returns `None` for characters
/// with no known ASCII form.
fn fold_lower(c: char, langcode: &str) -> Option<&'static str> {
    // German folds umlauts to digraphs rather than stripping the diaeresis.
    if langcode == "de" {
        match c {
            'ä' => return Some("ae"),
            'ö' => return Some("oe"),
            'ü' => return Some("ue"),
            _ => {}
        }
    }

    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };

    Some(folded)
}
