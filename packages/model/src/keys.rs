//! Field key derivation.
//!
//! Keys address answers outside the editor (exports, webhooks), so they are
//! derived once from the question text and then kept stable.

/// Lowercase slug: runs of non-alphanumeric characters become one `_`,
/// leading and trailing `_` are trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// First free key among `base`, `base_1`, `base_2`, ...
///
/// A numeric suffix on `base` is stripped first when it looks generated,
/// i.e. the stem is itself a key in use. Duplicating `name_1` next to `name`
/// yields `name_2`; a user key such as `year_2021` yields `year_2021_1`.
pub fn unique_key(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }

    let stem = generated_stem(base, &taken);
    (1..)
        .map(|n| format!("{}_{}", stem, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn generated_stem<'a>(key: &'a str, taken: &impl Fn(&str) -> bool) -> &'a str {
    match key.rsplit_once('_') {
        Some((stem, digits))
            if !stem.is_empty()
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
                && taken(stem) =>
        {
            stem
        }
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("What is your name?"), "what_is_your_name");
        assert_eq!(slugify("  E-mail -- address  "), "e_mail_address");
        assert_eq!(slugify("Größe"), "größe");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify("Q1"), "q1");
    }

    #[test]
    fn test_unique_key_suffixes() {
        let taken: HashSet<&str> = ["name", "name_1"].into_iter().collect();
        assert_eq!(unique_key("email", |k| taken.contains(k)), "email");
        assert_eq!(unique_key("name", |k| taken.contains(k)), "name_2");
        assert_eq!(unique_key("name_1", |k| taken.contains(k)), "name_2");
    }

    #[test]
    fn test_first_collision_gets_suffix_one() {
        let taken: HashSet<&str> = ["name"].into_iter().collect();
        assert_eq!(unique_key("name", |k| taken.contains(k)), "name_1");
    }

    #[test]
    fn test_user_numeric_suffix_is_kept() {
        let taken: HashSet<&str> = ["year_2021"].into_iter().collect();
        assert_eq!(unique_key("year_2021", |k| taken.contains(k)), "year_2021_1");
    }

    #[test]
    fn test_suffix_needs_stem() {
        let taken: HashSet<&str> = ["_1"].into_iter().collect();
        assert_eq!(unique_key("_1", |k| taken.contains(k)), "_1_1");
    }
}
