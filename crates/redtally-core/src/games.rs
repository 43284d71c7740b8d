use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, CoreError};

/// A tracked game whose Reddit mentions are measured.
///
/// `normalized_url` is derived once at construction and used as a second
/// search term so that link-only mentions are counted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub normalized_url: String,
}

impl Game {
    /// Build a game, normalizing its URL.
    ///
    /// A malformed URL does not fail construction: the name term can still be
    /// searched, so the normalized URL degrades to an empty string.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: Option<String>) -> Self {
        let id = id.into();
        let normalized_url = match url.as_deref().map(try_normalize_url) {
            Some(Ok(normalized)) => normalized,
            Some(Err(e)) => {
                tracing::warn!(game = %id, error = %e, "ignoring malformed game URL");
                String::new()
            }
            None => String::new(),
        };

        Self {
            id,
            name: name.into(),
            url,
            normalized_url,
        }
    }

    /// Terms searched for this game: the name followed by the normalized URL.
    /// Either may be empty; empty terms are skipped by the searcher.
    #[must_use]
    pub fn search_terms(&self) -> Vec<String> {
        vec![self.name.clone(), self.normalized_url.clone()]
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} ({url})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Strip the scheme from `raw`, keeping the authority and path exactly as
/// written, minus any query or fragment and one trailing slash.
///
/// The text is not re-encoded: the result is searched for as a literal
/// substring, so it must match what people actually paste into posts.
/// Scheme-less input such as `example.com/path` is read as an `http` URL.
/// Blank input normalizes to an empty string.
///
/// # Errors
///
/// Returns [`CoreError::MalformedEntityUrl`] if the URL cannot be parsed or
/// has no host.
pub fn try_normalize_url(raw: &str) -> Result<String, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }

    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{raw}"))
            .map_err(|e| malformed(raw, &e.to_string()))?,
        Err(e) => return Err(malformed(raw, &e.to_string())),
    };
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(malformed(raw, "URL has no host"));
    }

    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let simple = &rest[..end];
    Ok(simple.strip_suffix('/').unwrap_or(simple).to_string())
}

/// Infallible form of [`try_normalize_url`]: malformed URLs become `""`.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    try_normalize_url(raw).unwrap_or_default()
}

fn malformed(url: &str, reason: &str) -> CoreError {
    CoreError::MalformedEntityUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// A game entry as written in the registry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

impl From<GameConfig> for Game {
    fn from(config: GameConfig) -> Self {
        Game::new(config.id, config.name, config.url)
    }
}

#[derive(Debug, Deserialize)]
pub struct GamesFile {
    pub games: Vec<GameConfig>,
}

impl GamesFile {
    /// Convert every entry into a [`Game`], normalizing URLs.
    #[must_use]
    pub fn into_games(self) -> Vec<Game> {
        self.games.into_iter().map(Game::from).collect()
    }
}

/// Load and validate the game registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_games(path: &Path) -> Result<GamesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::GamesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_games(&content)
}

fn parse_games(content: &str) -> Result<GamesFile, ConfigError> {
    let games_file: GamesFile = serde_yaml::from_str(content)?;
    validate_games(&games_file)?;
    Ok(games_file)
}

fn validate_games(games_file: &GamesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for game in &games_file.games {
        if game.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "game '{}' has an empty id",
                game.name
            )));
        }

        if game.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "game '{}' has an empty name",
                game.id
            )));
        }

        if !seen_ids.insert(game.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate game id: '{}'",
                game.id
            )));
        }
    }

    Ok(())
}
