use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameCategory {
    Moba,
    Fps,
    Rpg,
    Strategy,
    Casual,
}

impl GameCategory {
    pub const ALL: [GameCategory; 5] = [
        GameCategory::Moba,
        GameCategory::Fps,
        GameCategory::Rpg,
        GameCategory::Strategy,
        GameCategory::Casual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameCategory::Moba => "MOBA",
            GameCategory::Fps => "FPS",
            GameCategory::Rpg => "RPG",
            GameCategory::Strategy => "STRATEGY",
            GameCategory::Casual => "CASUAL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameCategory::Moba => "MOBA",
            GameCategory::Fps => "FPS",
            GameCategory::Rpg => "RPG",
            GameCategory::Strategy => "Strategy",
            GameCategory::Casual => "Casual",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameCategory::Moba => "Multiplayer Online Battle Arena",
            GameCategory::Fps => "First Person Shooter",
            GameCategory::Rpg => "Role Playing Game",
            GameCategory::Strategy => "Strategy Games",
            GameCategory::Casual => "Casual Games",
        }
    }

    /// Stored documents may carry anything; unknown tags read back as casual.
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(GameCategory::Casual)
    }
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopupOption {
    pub id: String,
    pub name: String,
    /// Minor currency units.
    pub price: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(
        rename = "isPopular",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_popular: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    #[serde(rename = "gameName")]
    pub game_name: String,
    #[serde(rename = "gameIcon")]
    pub game_icon: String,
    pub category: GameCategory,
    #[serde(rename = "topupOptions")]
    pub topup_options: Vec<TopupOption>,
    #[serde(rename = "isPopular")]
    pub is_popular: bool,
    #[serde(rename = "isFeatured")]
    pub is_featured: bool,
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
    pub location: Option<Location>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn find_option(&self, option_id: &str) -> Option<&TopupOption> {
        self.topup_options.iter().find(|o| o.id == option_id)
    }
}

pub const DEFAULT_CURRENCY: &str = "IDR";

#[derive(Debug, Clone, Deserialize)]
pub struct TopupOptionInput {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: i64,
    pub currency: Option<String>,
    pub bonus: Option<String>,
    #[serde(rename = "isPopular")]
    pub is_popular: Option<bool>,
}

impl TopupOptionInput {
    fn into_option(self) -> Result<TopupOption, String> {
        let name = self.name.trim().to_string();
        if self.price < 0 {
            return Err("Harga opsi topup tidak valid".into());
        }
        let currency = self
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(TopupOption {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            name,
            price: self.price,
            currency,
            bonus: self
                .bonus
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            is_popular: self.is_popular,
        })
    }
}

fn build_options(inputs: Vec<TopupOptionInput>) -> Result<Vec<TopupOption>, String> {
    inputs.into_iter().map(TopupOptionInput::into_option).collect()
}

fn parse_category(raw: Option<&str>) -> Result<GameCategory, String> {
    match raw.map(str::trim) {
        None | Some("") => Err("Kategori game harus dipilih".into()),
        Some(s) => s
            .parse()
            .map_err(|_| "Kategori game tidak valid".to_string()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGameRequest {
    #[serde(rename = "gameName", default)]
    pub game_name: String,
    #[serde(rename = "gameIcon", default)]
    pub game_icon: String,
    pub category: Option<String>,
    #[serde(rename = "topupOptions", default)]
    pub topup_options: Vec<TopupOptionInput>,
    #[serde(rename = "isPopular", default)]
    pub is_popular: bool,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
    pub location: Option<Location>,
}

impl CreateGameRequest {
    /// Builds a validated game. Location stamping is the caller's job.
    pub fn into_game(
        self,
        owner: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Game, String> {
        let game = Game {
            id: Uuid::new_v4(),
            game_name: self.game_name.trim().to_string(),
            game_icon: self.game_icon.trim().to_string(),
            category: GameCategory::Casual,
            topup_options: Vec::new(),
            is_popular: self.is_popular,
            is_featured: self.is_featured,
            user_id: owner,
            location: None,
            created_at: now,
            updated_at: now,
        };
        check_name_and_icon(&game)?;
        let category = parse_category(self.category.as_deref())?;
        let topup_options = build_options(self.topup_options)?;
        let game = Game {
            category,
            topup_options,
            ..game
        };
        validate_game(&game)?;
        Ok(game)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGameRequest {
    #[serde(rename = "gameName")]
    pub game_name: Option<String>,
    #[serde(rename = "gameIcon")]
    pub game_icon: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "topupOptions")]
    pub topup_options: Option<Vec<TopupOptionInput>>,
    #[serde(rename = "isPopular")]
    pub is_popular: Option<bool>,
    #[serde(rename = "isFeatured")]
    pub is_featured: Option<bool>,
    pub location: Option<Location>,
}

impl UpdateGameRequest {
    fn touches_listing(&self) -> bool {
        self.game_name.is_some()
            || self.game_icon.is_some()
            || self.category.is_some()
            || self.topup_options.is_some()
    }

    /// Merges the partial update into `game`. Topup options are replaced
    /// wholesale when supplied.
    pub fn apply(self, game: &mut Game, now: DateTime<Utc>) -> Result<(), String> {
        let validate = self.touches_listing();
        let mut next = game.clone();

        if let Some(name) = self.game_name {
            next.game_name = name.trim().to_string();
        }
        if let Some(icon) = self.game_icon {
            next.game_icon = icon.trim().to_string();
        }
        if self.category.is_some() {
            next.category = parse_category(self.category.as_deref())?;
        }
        if let Some(options) = self.topup_options {
            next.topup_options = build_options(options)?;
        }
        if let Some(popular) = self.is_popular {
            next.is_popular = popular;
        }
        if let Some(featured) = self.is_featured {
            next.is_featured = featured;
        }

        if validate {
            validate_game(&next)?;
        }
        next.updated_at = now;
        *game = next;
        Ok(())
    }
}

fn check_name_and_icon(game: &Game) -> Result<(), String> {
    if game.game_name.trim().is_empty() {
        return Err("Nama game harus diisi".into());
    }
    if game.game_icon.trim().is_empty() {
        return Err("URL icon game harus diisi".into());
    }
    Ok(())
}

/// Checked before every write; the store itself enforces nothing.
pub fn validate_game(game: &Game) -> Result<(), String> {
    check_name_and_icon(game)?;
    if game.topup_options.is_empty() {
        return Err("Minimal harus ada 1 opsi topup".into());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: GameCategory,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "gameCount")]
    pub game_count: usize,
}
