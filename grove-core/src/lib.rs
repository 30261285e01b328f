pub mod import;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

pub fn is_valid_rating(value: i32) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&value)
}

/// How a game is launched on the player page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GameType {
    /// A ROM file run by the in-browser emulator.
    #[default]
    Emulator,
    /// A hosted HTML5 game shown in an iframe.
    Embed,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Emulator => "emulator",
            GameType::Embed => "embed",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGameType(pub String);

impl std::fmt::Display for InvalidGameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid game type '{}'", self.0)
    }
}

impl FromStr for GameType {
    type Err = InvalidGameType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emulator" => Ok(GameType::Emulator),
            "embed" | "html5" | "iframe" => Ok(GameType::Embed),
            _ => Err(InvalidGameType(s.to_string())),
        }
    }
}

impl TryFrom<String> for GameType {
    type Error = InvalidGameType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lowercases `text` and collapses every run of characters outside `[a-z0-9]`
/// into a single `-`, without leading or trailing dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Game URLs are sometimes pasted as a full `<iframe>` snippet; this returns the
/// snippet's `src` attribute in that case and the input otherwise.
pub fn clean_embed_url(url: &str) -> &str {
    if !url.contains("<iframe") {
        return url;
    }
    let Some(start) = url.find("src=") else {
        return url;
    };
    let rest = &url[start + 4..];
    if !rest.starts_with(['"', '\'']) {
        return url;
    }
    let value = &rest[1..];
    match value.find(['"', '\'']) {
        Some(end) => &value[..end],
        None => url,
    }
}
