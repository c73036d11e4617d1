use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex};

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Process-wide memo for computed keys. The function is pure, so sharing the
/// table across documents is safe; once it fills, the least recently used
/// entry is evicted. Callers must not depend on hits or eviction for anything
/// but speed.
static MEMO: LazyLock<Mutex<LruCache<(String, String), String>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(MEMO_CAPACITY).unwrap())));

const MEMO_CAPACITY: usize = 512;

/// Stable identity key for a cited work: non-word characters squashed out of
/// the author (or the `no_auth` placeholder when there is none), joined with
/// `_` to the first 25 squashed characters of the title, all lowercased.
/// Returns `None` when the title is missing or empty.
pub fn fingerprint(author: Option<&str>, title: Option<&str>) -> Option<String> {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return None,
    };
    let memo_key = (author.unwrap_or("").to_string(), title.to_string());
    if let Ok(mut memo) = MEMO.lock() {
        if let Some(hit) = memo.get(&memo_key) {
            return Some(hit.clone());
        }
    }

    let auth_str = match author {
        Some(a) if !a.is_empty() => NON_WORD_RE.replace_all(a, "").to_lowercase(),
        _ => "no_auth".to_string(),
    };
    let title_str: String = NON_WORD_RE
        .replace_all(title, "")
        .to_lowercase()
        .chars()
        .take(25)
        .collect();
    let key = format!("{auth_str}_{title_str}");

    if let Ok(mut memo) = MEMO.lock() {
        memo.put(memo_key, key.clone());
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_squashed_author_and_title() {
        assert_eq!(
            fingerprint(Some("S. Freud"), Some("The Interpretation of Dreams")),
            Some("sfreud_theinterpretationofdreams".to_string())
        );
    }

    #[test]
    fn uses_placeholder_when_author_is_missing() {
        assert_eq!(
            fingerprint(None, Some("Quiet Revolution")),
            Some("no_auth_quietrevolution".to_string())
        );
        assert_eq!(
            fingerprint(Some(""), Some("Quiet Revolution")),
            Some("no_auth_quietrevolution".to_string())
        );
    }

    #[test]
    fn returns_none_without_a_title() {
        assert_eq!(fingerprint(Some("S. Freud"), None), None);
        assert_eq!(fingerprint(Some("S. Freud"), Some("")), None);
    }

    #[test]
    fn truncates_title_component_to_25_characters() {
        let key = fingerprint(None, Some("An Exceedingly Long Title That Never Ends"));
        let key = key.unwrap();
        let title_part = key.strip_prefix("no_auth_").unwrap();
        assert_eq!(title_part.chars().count(), 25);
        assert_eq!(title_part, "anexceedinglylongtitletha");
    }

    #[test]
    fn titles_sharing_a_25_character_prefix_collide() {
        let a = fingerprint(Some("X"), Some("A Treatise on the Nature of Things, Vol. 1"));
        let b = fingerprint(Some("X"), Some("A Treatise on the Nature of Things, Vol. 2"));
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_calls_are_stable() {
        let first = fingerprint(Some("Klerman"), Some("The Psychiatric Dilemma"));
        let second = fingerprint(Some("Klerman"), Some("The Psychiatric Dilemma"));
        assert_eq!(first, second);
    }

    #[test]
    fn keys_stay_stable_past_the_memo_capacity() {
        let first = fingerprint(Some("Author Zero"), Some("Title Zero"));
        assert_eq!(first, Some("authorzero_titlezero".to_string()));
        for n in 0..600 {
            let author = format!("Churn Author {n}");
            let title = format!("Churn Title {n}");
            let expected = format!("churnauthor{n}_churntitle{n}");
            assert_eq!(fingerprint(Some(&author), Some(&title)), Some(expected));
        }
        assert_eq!(fingerprint(Some("Author Zero"), Some("Title Zero")), first);
    }
}
