//! Utilities for generating and validating URL slugs.
//!
//! Generated slugs bridge ASCII slugification (`slug` crate) with Chinese
//! transliteration (`pinyin` crate) so inputs like “基线对齐” become
//! `ji-xian-dui-qi`. Uniqueness is delegated to a caller-supplied predicate so
//! the generation logic stays pure; explicit slugs are only ever validated.

use std::future::Future;

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Base used when a non-blank title has no representable characters.
pub const FALLBACK_SLUG: &str = "untitled";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("slug `{slug}` must be lowercase letters, numbers, and single hyphens only")]
    Malformed { slug: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Ok(FALLBACK_SLUG.to_string());
    }

    Ok(candidate)
}

/// Returns `true` when `candidate` matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
        })
}

/// Reject an externally supplied slug that is not already canonical.
///
/// The input is never rewritten; callers surface the error to the client.
pub fn validate_explicit_slug(candidate: &str) -> Result<(), SlugError> {
    if is_valid_slug(candidate) {
        Ok(())
    } else {
        Err(SlugError::Malformed {
            slug: candidate.to_string(),
        })
    }
}

fn candidate_for(base: &str, attempt: u64) -> String {
    format!("{base}-{attempt}")
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// The `is_unique` closure must return `true` when the provided slug does not
/// already exist. Collisions retry with `-1`, `-2`, … until a free candidate
/// is found.
pub fn generate_unique_slug<F>(input: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(input)?;

    if is_unique(&base) {
        return Ok(base);
    }

    let mut attempt: u64 = 1;
    loop {
        let candidate = candidate_for(&base, attempt);
        if is_unique(&candidate) {
            return Ok(candidate);
        }
        attempt += 1;
    }
}

/// Async variant of [`generate_unique_slug`] that awaits the uniqueness predicate.
///
/// Each candidate is checked against live state; nothing is precomputed from
/// a count of existing rows.
pub async fn generate_unique_slug_async<F, Fut, E>(
    input: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(input)?;

    if is_unique(&base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base);
    }

    let mut attempt: u64 = 1;
    loop {
        let candidate = candidate_for(&base, attempt);
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
        attempt += 1;
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => {
                // Preserve unhandled characters so slugify can decide how to filter them.
                output.push(ch);
            }
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_collapses_punctuation() {
        let slug = derive_slug("  Hello,   World!! -- Again ").expect("slug");
        assert_eq!(slug, "hello-world-again");
    }

    #[test]
    fn derive_slug_transliterates_chinese() {
        let slug = derive_slug("Rust 基础教程").expect("slug");
        assert_eq!(slug, "rust-ji-chu-jiao-cheng");
    }

    #[test]
    fn derive_slug_rejects_blank_titles() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn derive_slug_falls_back_for_symbol_only_titles() {
        assert_eq!(derive_slug("!!! ???").expect("slug"), FALLBACK_SLUG);
    }

    #[test]
    fn derived_slugs_always_match_the_pattern() {
        let titles = [
            "Hello World",
            "  leading and trailing  ",
            "Ünïcödé Çafé",
            "C++ & Rust: a comparison",
            "2024 -- year in review",
            "___",
            "日本語のタイトル",
            "MiXeD CaSe 42",
        ];

        for title in titles {
            let slug = derive_slug(title).expect("slug");
            assert!(is_valid_slug(&slug), "`{slug}` derived from `{title}`");
        }
    }

    #[test]
    fn generate_unique_slug_returns_base_when_free() {
        let slug = generate_unique_slug("Pattern Library", |_| true).expect("slug");
        assert_eq!(slug, "pattern-library");
    }

    #[test]
    fn generate_unique_slug_appends_counter_from_one() {
        let mut existing = vec!["pattern-library".to_string()];
        let slug = generate_unique_slug("Pattern Library", |candidate| {
            !existing.iter().any(|value| value == candidate)
        })
        .expect("unique slug");
        assert_eq!(slug, "pattern-library-1");

        existing.push(slug);
        let next = generate_unique_slug("Pattern Library", |candidate| {
            !existing.iter().any(|value| value == candidate)
        })
        .expect("unique slug");
        assert_eq!(next, "pattern-library-2");
    }

    #[test]
    fn generate_unique_slug_walks_past_many_collisions() {
        let taken: Vec<String> = std::iter::once("post".to_string())
            .chain((1..=40).map(|n| format!("post-{n}")))
            .collect();
        let slug = generate_unique_slug("Post", |candidate| {
            !taken.iter().any(|value| value == candidate)
        })
        .expect("slug");
        assert_eq!(slug, "post-41");
    }

    #[test]
    fn explicit_slug_validation() {
        assert!(validate_explicit_slug("about").is_ok());
        assert!(validate_explicit_slug("about-me-2").is_ok());

        for bad in ["", "About", "about me", "-about", "about-", "about--me", "über"] {
            assert_eq!(
                validate_explicit_slug(bad),
                Err(SlugError::Malformed {
                    slug: bad.to_string()
                }),
                "`{bad}` should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn generate_unique_slug_async_works() {
        use std::sync::Arc;
        use tokio::sync::Mutex;

        let existing = Arc::new(Mutex::new(vec![
            "pattern-library".to_string(),
            "pattern-library-1".to_string(),
        ]));

        let slug = generate_unique_slug_async("Pattern Library", |candidate| {
            let existing = existing.clone();
            let candidate = candidate.to_string();
            async move {
                let guard = existing.lock().await;
                Ok::<bool, std::convert::Infallible>(!guard.contains(&candidate))
            }
        })
        .await
        .expect("unique slug");

        assert_eq!(slug, "pattern-library-2");
    }
}
