//! Path segment normalization: Cyrillic transliteration followed by
//! replacement of every non-alphanumeric character with `_`.

/// Latin rendering of a Russian/Ukrainian Cyrillic letter, if it has one.
pub fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' => "E",
        'Ё' => "Yo",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "Y",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "Kh",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Shch",
        'Ъ' => "'",
        'Ы' => "Y",
        'Ь' => "'",
        'Э' => "E",
        'Ю' => "Yu",
        'Я' => "Ya",
        'Ґ' => "G",
        'Є' => "Ye",
        'І' => "I",
        'Ї' => "Yi",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "'",
        'ы' => "y",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'ґ' => "g",
        'є' => "ie",
        'і' => "i",
        'ї' => "i",
        _ => return None,
    };
    Some(latin)
}

/// Normalize a single path segment.
///
/// Files are split at the last dot and only the stem is rewritten; the
/// extension is reattached untouched. Directories are rewritten whole, dots
/// included. An empty extension (`"name."`) is dropped.
pub fn normalize(name: &str, is_file: bool) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if is_file => (stem, extension),
        _ => (name, ""),
    };

    let mut normalized = String::with_capacity(stem.len());
    for c in stem.chars() {
        match transliterate(c) {
            Some(latin) => push_sanitized(&mut normalized, latin.chars()),
            None => push_sanitized(&mut normalized, std::iter::once(c)),
        }
    }

    if extension.is_empty() {
        normalized
    } else {
        format!("{}.{}", normalized, extension)
    }
}

fn push_sanitized(out: &mut String, chars: impl Iterator<Item = char>) {
    for c in chars {
        out.push(if c.is_alphanumeric() { c } else { '_' });
    }
}
