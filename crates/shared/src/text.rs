//! Text helpers for deriving display labels and slugs.

/// Turns a snake_case key into a display label.
///
/// Underscores become spaces and the first letter of every word is
/// upper-cased; the remaining letters are kept as-is.
pub fn humanize(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases the first character of a word.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turns a free-form label into a snake_case key.
///
/// "Optimize Settings" becomes "optimize_settings".
pub fn to_snake_key(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Generates a URL-safe role slug from a display name.
pub fn generate_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                ' '
            }
        })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("optimize_settings"), "Optimize Settings");
        assert_eq!(humanize("blog_categories"), "Blog Categories");
        assert_eq!(humanize("roles"), "Roles");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_humanize_collapses_repeated_separators() {
        assert_eq!(humanize("email__templates_"), "Email Templates");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("media"), "Media");
        assert_eq!(capitalize("SEO"), "SEO");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_to_snake_key() {
        assert_eq!(to_snake_key("Optimize Settings"), "optimize_settings");
        assert_eq!(to_snake_key("  Site  Logo "), "site_logo");
        assert_eq!(to_snake_key("SMTP-Mail"), "smtp_mail");
        assert_eq!(to_snake_key(""), "");
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Content Editor"), "content-editor");
        assert_eq!(generate_slug("Super Admin!"), "super-admin");
        assert_eq!(generate_slug("Support   Team"), "support-team");
        assert_eq!(generate_slug("read_only"), "read-only");
    }
}
