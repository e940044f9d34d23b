use std::sync::LazyLock;

use regex::Regex;

use crate::model::Cell;

/// Named entities for accented letters, e.g. `&Atilde;` or `&ccedil;`.
static ACCENT_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&([a-z])(acute|grave|circ|tilde|cedil|uml|ring);").expect("regex is valid")
});

static ANY_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&[a-z0-9]+;").expect("regex is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("regex is valid"));

/// Normalize a free-text cell for grouping and display.
///
/// Quotes and HTML entities are removed, the result is trimmed and
/// uppercased. Accents are kept: `"São Paulo"` becomes `"SÃO PAULO"`.
pub fn sanitize(cell: Option<&Cell>) -> String {
    match cell {
        None => String::new(),
        Some(c) => sanitize_str(&c.to_text()),
    }
}

/// Sanitize a cell, substituting the sanitized `fallback` when the cell is
/// falsy or nothing is left after sanitizing.
pub fn sanitize_or(cell: Option<&Cell>, fallback: &str) -> String {
    let value = sanitize(cell.filter(|c| c.is_truthy()));
    if value.is_empty() {
        sanitize_str(fallback)
    } else {
        value
    }
}

pub fn sanitize_str(s: &str) -> String {
    let unquoted = strip_quotes(s);
    ANY_ENTITY
        .replace_all(&unquoted, "")
        .trim()
        .to_uppercase()
}

/// Clean a raw column header for keyword matching.
///
/// Uppercases, strips quotes, decodes accented-letter entities to their
/// base letter, drops any other entity, folds accents and trims.
pub fn clean_header(raw: &str) -> String {
    let upper = strip_quotes(&raw.to_uppercase());
    let decoded = ACCENT_ENTITY.replace_all(&upper, "$1");
    let stripped = ANY_ENTITY.replace_all(&decoded, "");
    fold_accents(&stripped).trim().to_string()
}

/// Slug used for headers that match no known field.
pub fn slugify(clean: &str) -> String {
    WHITESPACE_RUN
        .replace_all(clean, "_")
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '-'))
        .collect()
}

pub fn strip_quotes(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '\'' | '"')).collect()
}

/// Replace accented Latin letters with their unaccented base letter.
pub fn fold_accents(s: &str) -> String {
    s.chars().filter_map(fold_char).collect()
}

fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        // Combining diacritical marks left over from decomposed input.
        '\u{0300}'..='\u{036f}' => return None,
        other => other,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_entities() {
        let cell = Cell::Text("  'Distribuidora &amp; Cia'  ".into());
        assert_eq!(sanitize(Some(&cell)), "DISTRIBUIDORA  CIA");
    }

    #[test]
    fn sanitize_or_falls_back_on_blank_values() {
        let quotes = Cell::Text("\"\"".into());
        assert_eq!(sanitize_or(Some(&quotes), "sem ocorrência"), "SEM OCORRÊNCIA");
        assert_eq!(sanitize_or(Some(&Cell::Number(0.0)), "PRÓPRIO"), "PRÓPRIO");
        assert_eq!(sanitize_or(None, "PRÓPRIO"), "PRÓPRIO");
        let set = Cell::Text("em rota".into());
        assert_eq!(sanitize_or(Some(&set), "PRÓPRIO"), "EM ROTA");
    }

    #[test]
    fn sanitize_keeps_accents() {
        assert_eq!(sanitize_str("são paulo"), "SÃO PAULO");
    }

    #[test]
    fn sanitize_missing_is_empty() {
        assert_eq!(sanitize(None), "");
        assert_eq!(sanitize(Some(&Cell::Empty)), "");
    }

    #[test]
    fn sanitize_numbers() {
        assert_eq!(sanitize(Some(&Cell::Number(3550308.0))), "3550308");
    }

    #[test]
    fn header_accents_folded() {
        assert_eq!(clean_header("Ocorrência"), "OCORRENCIA");
        assert_eq!(clean_header("\"Destinatário\""), "DESTINATARIO");
        assert_eq!(clean_header(" Cidade "), "CIDADE");
    }

    #[test]
    fn header_entities_decoded() {
        assert_eq!(clean_header("Destinat&aacute;rio"), "DESTINATARIO");
        assert_eq!(clean_header("OCORR&Ecirc;NCIA"), "OCORRENCIA");
        assert_eq!(clean_header("Peso&nbsp;"), "PESO");
    }

    #[test]
    fn decomposed_marks_dropped() {
        assert_eq!(fold_accents("A\u{0301}GUA"), "AGUA");
    }

    #[test]
    fn slug_replaces_spaces_and_drops_punctuation() {
        assert_eq!(slugify("COD. CLIENTE"), "COD_CLIENTE");
        assert_eq!(slugify("UF  DEST/ORIG"), "UF_DESTORIG");
        assert_eq!(slugify("KM-RODADO"), "KMRODADO");
    }
}
