//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use droptris::tetris::TetrominoKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Theme keys for the seven tetromino colours, in cell-value order (1..=7).
const PIECE_KEYS: [&str; 7] = [
    "piece_i", "piece_o", "piece_t", "piece_s", "piece_z", "piece_j", "piece_l",
];

/// Arcade colours plus UI colours, optionally loaded from a theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Tetromino colours indexed by cell value - 1: I, O, T, S, Z, J, L.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (controls help).
    pub inactive_fg: Color,
    pub snake: Color,
    pub food: Color,
    pub player_paddle: Color,
    pub ai_paddle: Color,
    pub ball: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// `#RRGGBB` literal known to be valid.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// Built-in arcade colours.
    pub const fn classic() -> Self {
        Self {
            pieces: [
                rgb(0x00F0F0), // I cyan
                rgb(0xF0F000), // O yellow
                rgb(0xA000F0), // T purple
                rgb(0x00F000), // S green
                rgb(0xF00000), // Z red
                rgb(0x0000F0), // J blue
                rgb(0xF0A000), // L orange
            ],
            bg: rgb(0x111111),
            div_line: rgb(0x222222),
            main_fg: rgb(0xDDDDDD),
            title: rgb(0xF0F000),
            inactive_fg: rgb(0x777777),
            snake: rgb(0x00FF00),
            food: rgb(0xFF0000),
            player_paddle: rgb(0x4CAF50),
            ai_paddle: rgb(0xE53935),
            ball: rgb(0xFFFFFF),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Built-in colours when no path is given or the file does not exist; keys missing
    /// from the file keep their built-in colour.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let theme = Self::from_map(&map)?;
        log::info!("loaded theme {} ({} keys)", path.display(), map.len());
        Ok(theme)
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let get = |key: &str, fallback: Color| -> Result<Color, ThemeError> {
            map.get(key).map_or(Ok(fallback), |v| parse_hex(v))
        };
        let base = Self::classic();
        let mut pieces = base.pieces;
        for (slot, key) in pieces.iter_mut().zip(PIECE_KEYS) {
            *slot = get(key, *slot)?;
        }
        Ok(Self {
            pieces,
            bg: get("main_bg", base.bg)?,
            div_line: get("div_line", base.div_line)?,
            main_fg: get("main_fg", base.main_fg)?,
            title: get("title", base.title)?,
            inactive_fg: get("inactive_fg", base.inactive_fg)?,
            snake: get("snake", base.snake)?,
            food: get("food", base.food)?,
            player_paddle: get("player_paddle", base.player_paddle)?,
            ai_paddle: get("ai_paddle", base.ai_paddle)?,
            ball: get("ball", base.ball)?,
        })
    }

    /// Colour for a playfield cell value (1..=7); background for empty or unknown values.
    #[inline]
    pub fn piece_color(&self, value: u8) -> Color {
        match TetrominoKind::from_value(value) {
            Some(kind) => self.pieces[usize::from(kind.value() - 1)],
            None => self.bg,
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 if s.is_ascii() => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 if s.is_ascii() => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
