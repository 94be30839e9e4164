use chrono::{DateTime, Utc};

const MAX_KEY_LEN: usize = 255;
const MAX_OWNER_LEN: usize = 64;

/// Generate a blob key from the owner id and the write time.
///
/// The owner is reduced to a filesystem-safe slug and followed by a
/// microsecond timestamp and a random suffix, so two uploads by the same
/// owner in the same microsecond still get distinct keys.
#[must_use]
pub fn generate_key(owner: &str, now: DateTime<Utc>) -> String {
    let mut slug: String = owner
        .chars()
        .take(MAX_OWNER_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if slug.trim_matches('-').is_empty() {
        slug = "anon".to_owned();
    }

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{slug}_{}_{}",
        now.format("%Y%m%dT%H%M%S%6f"),
        &suffix[..8]
    )
}

/// Returns `true` if `key` is a well-formed blob key.
///
/// Keys are single path segments made of ASCII letters, digits, `.`, `_`
/// and `-`. They may not start with a dot.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// Returns `true` if `value` is a fully qualified `http(s)` URL with a host.
///
/// Bare paths such as `/uploads/clip.mp4` or `clip.mp4` are not.
#[must_use]
pub fn is_absolute_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn key_embeds_owner_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let key = generate_key("u1", now);
        assert!(key.starts_with("u1_20250102T030405000000_"), "{key}");
        assert!(is_valid_key(&key));
    }

    #[test]
    fn keys_are_unique_for_same_instant() {
        let now = Utc::now();
        assert_ne!(generate_key("u1", now), generate_key("u1", now));
    }

    #[test]
    fn owner_is_sanitized() {
        let key = generate_key("../../etc/passwd", Utc::now());
        assert!(is_valid_key(&key), "{key}");
        assert!(!key.contains('/'));

        let key = generate_key("", Utc::now());
        assert!(key.starts_with("anon_"));
    }

    #[test]
    fn malformed_keys() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("..secret"));
        assert!(!is_valid_key("../x"));
        assert!(!is_valid_key("clip mp4"));
        assert!(!is_valid_key(&"a".repeat(300)));
        assert!(is_valid_key("u1_20240101_120000.mp4"));
    }

    #[test]
    fn absolute_urls() {
        assert!(is_absolute_url("https://cdn.example.com/v.mp4"));
        assert!(is_absolute_url("HTTP://host"));
        assert!(!is_absolute_url("/uploads/v.mp4"));
        assert!(!is_absolute_url("v.mp4"));
        assert!(!is_absolute_url("http://"));
        assert!(!is_absolute_url("file:///tmp/v.mp4"));
        assert!(!is_absolute_url("data:video/mp4;base64,AAAA"));
    }
}
