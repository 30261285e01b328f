use grove_core::{GameType, slugify};

use crate::domain::game::{GameChanges, NewGame};

pub mod bulk_create;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod play;
pub mod play_counters;
pub mod update;

/// Raw game fields as submitted by the back-office or an import batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub game_url: Option<String>,
    pub game_type: Option<String>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameValidationError {
    MissingTitle,
    MissingGameUrl,
    InvalidSlug,
    InvalidGameType(String),
}

impl std::fmt::Display for GameValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameValidationError::MissingTitle => write!(f, "Title is required"),
            GameValidationError::MissingGameUrl => write!(f, "Game URL is required"),
            GameValidationError::InvalidSlug => write!(f, "Slug must contain letters or digits"),
            GameValidationError::InvalidGameType(t) => write!(f, "Invalid game type '{}'", t),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_game_type(value: Option<String>) -> Result<Option<GameType>, GameValidationError> {
    match trimmed(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<GameType>()
            .map(Some)
            .map_err(|_| GameValidationError::InvalidGameType(raw)),
    }
}

fn normalize_slug(slug: &str) -> Result<String, GameValidationError> {
    let slug = slugify(slug);
    if slug.is_empty() {
        return Err(GameValidationError::InvalidSlug);
    }
    Ok(slug)
}

pub fn validate_new_game(input: GameInput) -> Result<NewGame, GameValidationError> {
    let title = trimmed(input.title).ok_or(GameValidationError::MissingTitle)?;
    let game_url = trimmed(input.game_url).ok_or(GameValidationError::MissingGameUrl)?;
    let slug = match trimmed(input.slug) {
        Some(slug) => normalize_slug(&slug)?,
        None => normalize_slug(&title)?,
    };
    Ok(NewGame {
        title,
        slug,
        game_url,
        game_type: parse_game_type(input.game_type)?.unwrap_or_default(),
        thumbnail_url: trimmed(input.thumbnail_url),
        description: trimmed(input.description),
        categories: trimmed(input.categories),
    })
}

/// Absent fields stay untouched. A blank title or URL is rejected, while a
/// blank optional field clears it.
pub fn validate_changes(input: GameInput) -> Result<GameChanges, GameValidationError> {
    let title = match input.title {
        Some(title) => Some(trimmed(Some(title)).ok_or(GameValidationError::MissingTitle)?),
        None => None,
    };
    let game_url = match input.game_url {
        Some(url) => Some(trimmed(Some(url)).ok_or(GameValidationError::MissingGameUrl)?),
        None => None,
    };
    let slug = match input.slug {
        Some(slug) => Some(normalize_slug(&slug)?),
        None => None,
    };
    Ok(GameChanges {
        title,
        slug,
        game_url,
        game_type: parse_game_type(input.game_type)?,
        thumbnail_url: input.thumbnail_url.map(|v| trimmed(Some(v))),
        description: input.description.map(|v| trimmed(Some(v))),
        categories: input.categories.map(|v| trimmed(Some(v))),
    })
}
