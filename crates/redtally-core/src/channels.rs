//! Subreddit name handling.

/// Trim a subreddit name and strip one leading `r/` prefix.
#[must_use]
pub fn normalize_channel(name: &str) -> String {
    let trimmed = name.trim();
    trimmed.strip_prefix("r/").unwrap_or(trimmed).to_string()
}

/// Normalize each name and join them with `+`, the multi-subreddit syntax
/// understood by Reddit listing and search paths.
#[must_use]
pub fn join_channels<S: AsRef<str>>(channels: &[S]) -> String {
    channels
        .iter()
        .map(|c| normalize_channel(c.as_ref()))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_and_bare_names_are_identical() {
        assert_eq!(normalize_channel("r/gaming"), normalize_channel("gaming"));
        assert_eq!(normalize_channel("  r/gaming "), "gaming");
    }

    #[test]
    fn only_one_prefix_is_stripped() {
        assert_eq!(normalize_channel("r/r/weird"), "r/weird");
    }

    #[test]
    fn join_normalizes_and_skips_blanks() {
        let joined = join_channels(&["r/gaming", " ", "indiegaming "]);
        assert_eq!(joined, "gaming+indiegaming");
    }
}
