//! Parsing and normalization of external game listings.
//!
//! Listings arrive as CSV exports or XML feeds. Both are reduced to
//! [`ImportedGame`] rows, adjusted with [`ImportOverrides`], and submitted to the
//! server in chunks of [`IMPORT_BATCH_SIZE`].

use quick_xml::{Reader, events::Event};
use serde::Serialize;
use thiserror::Error;

use crate::GameType;

pub const IMPORT_BATCH_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid XML document: {0}")]
    Xml(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedGame {
    pub title: String,
    pub game_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    pub game_type: String,
    pub description: String,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Splits one CSV line on commas outside double quotes. Quotes only toggle the
/// quoted state and are dropped; there is no escape sequence.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut quoted = false;
    let mut column = String::new();
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => columns.push(std::mem::take(&mut column)),
            _ => column.push(c),
        }
    }
    columns.push(column);
    columns
}

/// Parses a CSV export with the column order
/// `title, url, thumbnail, categories, type, description`.
///
/// The first line is a header and is skipped, as are blank lines and rows
/// without a title or url.
pub fn parse_csv(text: &str) -> Vec<ImportedGame> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let columns = split_csv_line(line);
            let column = |i: usize| columns.get(i).map(String::as_str);
            let title = non_empty(column(0))?;
            let game_url = non_empty(column(1))?;
            Some(ImportedGame {
                title,
                game_url,
                thumbnail_url: non_empty(column(2)),
                categories: non_empty(column(3)),
                game_type: non_empty(column(4))
                    .unwrap_or_else(|| GameType::Emulator.to_string())
                    .to_lowercase(),
                description: non_empty(column(5)).unwrap_or_default(),
            })
        })
        .collect()
}

struct XmlElement {
    name: String,
    text: String,
    // exclusive end of this element's descendants in document order
    end: usize,
}

fn read_elements(text: &str) -> Result<Vec<XmlElement>, ImportError> {
    let mut reader = Reader::from_str(text);
    let mut elements: Vec<XmlElement> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ImportError::Xml(e.to_string()))?;
        match event {
            Event::Start(start) => {
                open.push(elements.len());
                elements.push(XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    text: String::new(),
                    end: 0,
                });
            }
            Event::Empty(start) => {
                let index = elements.len();
                elements.push(XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    text: String::new(),
                    end: index + 1,
                });
            }
            Event::End(_) => {
                let Some(index) = open.pop() else {
                    return Err(ImportError::Xml("unbalanced closing tag".to_string()));
                };
                elements[index].end = elements.len();
            }
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|e| ImportError::Xml(e.to_string()))?;
                for &index in &open {
                    elements[index].text.push_str(&content);
                }
            }
            Event::CData(content) => {
                let content = String::from_utf8_lossy(&content.into_inner()).into_owned();
                for &index in &open {
                    elements[index].text.push_str(&content);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(ImportError::Xml("unexpected end of document".to_string()));
    }
    Ok(elements)
}

fn first_descendant_text<'a>(
    elements: &'a [XmlElement],
    entry: usize,
    name: &str,
) -> Option<&'a str> {
    elements[entry + 1..elements[entry].end]
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.text.as_str())
}

/// Parses an XML feed. Entries are the `<item>` elements when the document has
/// any, otherwise the `<game>` elements.
pub fn parse_xml(text: &str) -> Result<Vec<ImportedGame>, ImportError> {
    let elements = read_elements(text)?;
    let entry_name = if elements.iter().any(|e| e.name == "item") {
        "item"
    } else {
        "game"
    };

    let games = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.name == entry_name)
        .filter_map(|(entry, _)| {
            let field = |name: &str| non_empty(first_descendant_text(&elements, entry, name));
            let title = field("title")?;
            let game_url = field("url").or_else(|| field("link"))?;
            Some(ImportedGame {
                title,
                game_url,
                thumbnail_url: field("thumbnail").or_else(|| field("image")),
                categories: field("category"),
                game_type: field("type").unwrap_or_else(|| GameType::Emulator.to_string()),
                description: field("description").unwrap_or_default(),
            })
        })
        .collect();
    Ok(games)
}

#[derive(Clone, Debug, Default)]
pub struct ImportOverrides {
    pub game_type: GameType,
    pub category: Option<String>,
    /// Replace row values instead of only filling the gaps.
    pub force: bool,
}

/// Applies the operator's overrides to parsed rows.
///
/// Row game types that are not recognized fall back to the override type so
/// that every submitted row carries a valid type.
pub fn apply_overrides(games: Vec<ImportedGame>, overrides: &ImportOverrides) -> Vec<ImportedGame> {
    let category = overrides.category.as_deref().and_then(|c| non_empty(Some(c)));
    games
        .into_iter()
        .map(|mut game| {
            let row_type = game.game_type.parse::<GameType>().ok();
            let game_type = if overrides.force {
                overrides.game_type
            } else {
                row_type.unwrap_or(overrides.game_type)
            };
            game.game_type = game_type.to_string();
            game.categories = if overrides.force {
                category.clone().or(game.categories)
            } else {
                game.categories.or_else(|| category.clone())
            };
            game
        })
        .collect()
}

pub fn batches(games: &[ImportedGame]) -> std::slice::Chunks<'_, ImportedGame> {
    games.chunks(IMPORT_BATCH_SIZE)
}

/// Outcome of a batched import. Failed batches are skipped, not retried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total: usize,
    pub created: usize,
    pub failed_batches: usize,
    pub last_error: Option<String>,
}

impl ImportReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, created: usize) {
        self.created += created;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.failed_batches += 1;
        self.last_error = Some(error.into());
    }

    pub fn summary(&self) -> String {
        match &self.last_error {
            Some(error) => format!(
                "{} / {} games imported ({} failed batches, last error: {})",
                self.created, self.total, self.failed_batches, error
            ),
            None => format!("{} / {} games imported", self.created, self.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let csv = "title,url,thumb,cat,type,desc\r\n\
                   Contra,/roms/contra.nes,/images/contra.png,Action,EMULATOR,Run and gun\r\n\
                   \r\n\
                   \"Mario, Luigi\",/roms/mario.nes,,\"Platform, Classic\",,\n\
                   ,/roms/missing-title.nes\n\
                   No Url\n\
                   Tetris , https://html5.test/tetris ,,,html5";
        let games = parse_csv(csv);
        assert_eq!(games.len(), 3);

        assert_eq!(games[0].title, "Contra");
        assert_eq!(games[0].game_url, "/roms/contra.nes");
        assert_eq!(games[0].thumbnail_url.as_deref(), Some("/images/contra.png"));
        assert_eq!(games[0].categories.as_deref(), Some("Action"));
        assert_eq!(games[0].game_type, "emulator");
        assert_eq!(games[0].description, "Run and gun");

        assert_eq!(games[1].title, "Mario, Luigi");
        assert_eq!(games[1].thumbnail_url, None);
        assert_eq!(games[1].categories.as_deref(), Some("Platform, Classic"));
        assert_eq!(games[1].game_type, "emulator");
        assert_eq!(games[1].description, "");

        assert_eq!(games[2].title, "Tetris");
        assert_eq!(games[2].game_url, "https://html5.test/tetris");
        assert_eq!(games[2].game_type, "html5");
    }

    #[test]
    fn test_parse_csv_header_only() {
        assert!(parse_csv("title,url\n").is_empty());
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn test_parse_xml_items() {
        let xml = r#"<?xml version="1.0"?>
            <rss><channel>
              <title>Feed title</title>
              <item>
                <title>Bubble Shooter</title>
                <link>https://html5.test/bubble</link>
                <description><![CDATA[Pop <b>all</b> bubbles]]></description>
                <image>https://img.test/bubble.jpg</image>
                <category>Puzzle</category>
                <type>html5</type>
              </item>
              <item>
                <title>No link</title>
              </item>
              <item>
                <title>Tom &amp; Jerry</title>
                <url>https://html5.test/tj</url>
                <link>https://html5.test/ignored</link>
              </item>
            </channel></rss>"#;
        let games = parse_xml(xml).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].title, "Bubble Shooter");
        assert_eq!(games[0].game_url, "https://html5.test/bubble");
        assert_eq!(games[0].description, "Pop <b>all</b> bubbles");
        assert_eq!(games[0].thumbnail_url.as_deref(), Some("https://img.test/bubble.jpg"));
        assert_eq!(games[0].categories.as_deref(), Some("Puzzle"));
        assert_eq!(games[0].game_type, "html5");

        assert_eq!(games[1].title, "Tom & Jerry");
        assert_eq!(games[1].game_url, "https://html5.test/tj");
        assert_eq!(games[1].game_type, "emulator");
    }

    #[test]
    fn test_parse_xml_games_fallback() {
        let xml = "<games>\
                     <game><title>Pong</title><url>/roms/pong.a26</url><thumbnail>/images/pong.png</thumbnail></game>\
                     <game><title>Breakout</title><url>/roms/breakout.a26</url><thumbnail/></game>\
                   </games>";
        let games = parse_xml(xml).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].thumbnail_url.as_deref(), Some("/images/pong.png"));
        assert_eq!(games[1].title, "Breakout");
        assert_eq!(games[1].thumbnail_url, None);
    }

    #[test]
    fn test_parse_xml_malformed() {
        assert!(parse_xml("<games><game><title>Pong</title></game>").is_err());
        assert!(parse_xml("<games><game></games>").is_err());
    }

    fn row(game_type: &str, categories: Option<&str>) -> ImportedGame {
        ImportedGame {
            title: "Game".to_string(),
            game_url: "/roms/game.nes".to_string(),
            thumbnail_url: None,
            categories: categories.map(str::to_string),
            game_type: game_type.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_apply_overrides_fills_gaps() {
        let overrides = ImportOverrides {
            game_type: GameType::Embed,
            category: Some("Arcade".to_string()),
            force: false,
        };
        let games = apply_overrides(
            vec![row("emulator", None), row("flash", Some("Puzzle"))],
            &overrides,
        );
        assert_eq!(games[0].game_type, "emulator");
        assert_eq!(games[0].categories.as_deref(), Some("Arcade"));
        assert_eq!(games[1].game_type, "embed");
        assert_eq!(games[1].categories.as_deref(), Some("Puzzle"));
    }

    #[test]
    fn test_apply_overrides_forced() {
        let overrides = ImportOverrides {
            game_type: GameType::Embed,
            category: Some("Arcade".to_string()),
            force: true,
        };
        let games = apply_overrides(vec![row("emulator", Some("Puzzle"))], &overrides);
        assert_eq!(games[0].game_type, "embed");
        assert_eq!(games[0].categories.as_deref(), Some("Arcade"));

        let overrides = ImportOverrides {
            game_type: GameType::Emulator,
            category: Some("  ".to_string()),
            force: true,
        };
        let games = apply_overrides(vec![row("html5", Some("Puzzle"))], &overrides);
        assert_eq!(games[0].game_type, "emulator");
        assert_eq!(games[0].categories.as_deref(), Some("Puzzle"));
    }

    #[test]
    fn test_batches() {
        let games: Vec<ImportedGame> = (0..120).map(|_| row("emulator", None)).collect();
        let sizes: Vec<usize> = batches(&games).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn test_import_report() {
        let mut report = ImportReport::new(120);
        report.record_success(50);
        report.record_failure("All items failed. Sample error: bad row");
        report.record_success(18);
        assert_eq!(report.created, 68);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(
            report.summary(),
            "68 / 120 games imported (1 failed batches, last error: All items failed. Sample error: bad row)"
        );
        assert_eq!(ImportReport::new(3).summary(), "0 / 3 games imported");
    }
}
