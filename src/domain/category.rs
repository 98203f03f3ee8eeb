use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derives the URL-safe slug for a category name: lowercase, strip anything
/// outside `[a-z0-9 -]`, spaces to hyphens, hyphen runs collapsed.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut last_was_hyphen = false;
    for c in stripped.chars() {
        let c = if c == ' ' { '-' } else { c };
        if c == '-' {
            if !last_was_hyphen {
                slug.push('-');
            }
            last_was_hyphen = true;
        } else {
            slug.push(c);
            last_was_hyphen = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_keeps_hyphens() {
        assert_eq!(slugify("Sci-Fi Classics!"), "sci-fi-classics");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(slugify("  Modern   History "), "modern-history");
        assert_eq!(slugify("a---b - c"), "a-b-c");
    }

    #[test]
    fn idempotent_for_already_slugged_names() {
        assert_eq!(slugify("sci-fi-classics"), "sci-fi-classics");
        assert_eq!(slugify(&slugify("Sci-Fi Classics!")), "sci-fi-classics");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(slugify("Top 100 Novels"), "top-100-novels");
    }
}
