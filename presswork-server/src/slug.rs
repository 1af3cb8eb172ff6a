//! Slug derivation and uniqueness probing
//!
//! The probe loop is advisory: the UNIQUE index on blogs.slug is the actual
//! correctness backstop, and a create losing the race surfaces the
//! constraint violation as a conflict.

use presswork_common::Result;
use sqlx::SqlitePool;

/// Derive a URL-safe base slug from a title: lowercase, strip everything
/// that is not ASCII alphanumeric or whitespace, collapse whitespace runs
/// to single hyphens.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Generate a slug that is unique among stored posts, appending `-1`, `-2`,
/// ... to the base form until a free slug is found. `exclude_id` skips the
/// post being updated so regeneration can land on its own current slug.
///
/// A title that strips down to nothing (fully non-ASCII, punctuation only)
/// falls back to the base "post" so slugs are never empty.
pub async fn generate_unique_slug(
    pool: &SqlitePool,
    title: &str,
    exclude_id: Option<&str>,
) -> Result<String> {
    let mut base = slugify(title);
    if base.is_empty() {
        base = "post".to_string();
    }

    let mut slug = base.clone();
    let mut counter = 1;
    while crate::db::blogs::slug_exists(pool, &slug, exclude_id).await? {
        slug = format!("{}-{}", base, counter);
        counter += 1;
    }

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello, World! 2025"), "hello-world-2025");
        assert_eq!(slugify("Rust & Web"), "rust-web");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("  a   b\tc  "), "a-b-c");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("C++ (the good parts)"), "c-the-good-parts");
    }

    #[test]
    fn test_slugify_non_ascii_yields_empty() {
        assert_eq!(slugify("日本語のタイトル"), "");
        assert_eq!(slugify("!!!"), "");
    }
}
