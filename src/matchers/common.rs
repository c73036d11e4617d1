use regex::Regex;
use std::sync::LazyLock;

static TITLE_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.\s+(["'“A-Z])"#).unwrap());
static ET_AL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bet\s+al\.?").unwrap());

/// Splits "Author. Title …" at the first period followed by whitespace and an
/// uppercase letter or opening quote. The period and whitespace are dropped;
/// the opening character stays with the title half.
pub fn split_author_title(text: &str) -> Option<(&str, &str)> {
    let caps = TITLE_BOUNDARY_RE.captures(text)?;
    let whole = caps.get(0)?;
    let open = caps.get(1)?;
    Some((&text[..whole.start()], &text[open.start()..]))
}

/// "Last, First" -> "First Last". Names without a comma pass through.
pub fn reorder_comma_name(name: &str) -> String {
    match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.to_string(),
    }
}

/// Collapses every "et al" spelling variant to the canonical "et al.".
pub fn normalize_et_al(author: &str) -> String {
    ET_AL_RE.replace_all(author, "et al.").to_string()
}

pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_author_from_title() {
        assert_eq!(
            split_author_title("Sigmund Freud. The Interpretation of Dreams"),
            Some(("Sigmund Freud", "The Interpretation of Dreams"))
        );
        assert_eq!(
            split_author_title("Kline NS. “The Practical Management of Depression"),
            Some(("Kline NS", "“The Practical Management of Depression"))
        );
    }

    #[test]
    fn an_initial_splits_at_its_own_period() {
        assert_eq!(
            split_author_title("S. Freud. The Interpretation of Dreams"),
            Some(("S", "Freud. The Interpretation of Dreams"))
        );
    }

    #[test]
    fn does_not_split_on_lowercase_continuations() {
        assert_eq!(split_author_title("no period here"), None);
        assert_eq!(split_author_title("ended. but lowercase"), None);
    }

    #[test]
    fn reorders_comma_names() {
        assert_eq!(reorder_comma_name("Freud, Sigmund"), "Sigmund Freud");
        assert_eq!(reorder_comma_name("Plain Name"), "Plain Name");
    }

    #[test]
    fn normalizes_et_al_variants() {
        assert_eq!(normalize_et_al("Smith J, ET AL"), "Smith J, et al.");
        assert_eq!(normalize_et_al("Jones et  al."), "Jones et al.");
    }
}
