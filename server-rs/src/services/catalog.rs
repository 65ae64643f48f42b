//! In-memory filtering and ordering of fetched result sets.
//!
//! The store is always read unfiltered; every listing is narrowed here.

use crate::models::{CategorySummary, Game, GameCategory, Transaction};

#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub category: Option<GameCategory>,
    pub popular: Option<bool>,
    pub featured: Option<bool>,
    /// Case-insensitive substring of the game name or category tag.
    pub search: Option<String>,
}

impl GameFilter {
    pub fn matches(&self, game: &Game) -> bool {
        if self.category.is_some_and(|c| c != game.category) {
            return false;
        }
        if self.popular.is_some_and(|p| p != game.is_popular) {
            return false;
        }
        if self.featured.is_some_and(|f| f != game.is_featured) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                game.game_name.to_lowercase().contains(&q)
                    || game.category.as_str().to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

/// Newest first.
pub fn sort_games(games: &mut [Game]) {
    games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn apply(games: Vec<Game>, filter: &GameFilter) -> Vec<Game> {
    let mut out: Vec<Game> = games.into_iter().filter(|g| filter.matches(g)).collect();
    sort_games(&mut out);
    out
}

pub fn featured(games: Vec<Game>) -> Vec<Game> {
    apply(
        games,
        &GameFilter {
            featured: Some(true),
            ..Default::default()
        },
    )
}

pub fn popular(games: Vec<Game>) -> Vec<Game> {
    apply(
        games,
        &GameFilter {
            popular: Some(true),
            ..Default::default()
        },
    )
}

pub fn by_category(games: Vec<Game>, category: GameCategory) -> Vec<Game> {
    apply(
        games,
        &GameFilter {
            category: Some(category),
            ..Default::default()
        },
    )
}

pub fn category_summaries(games: &[Game]) -> Vec<CategorySummary> {
    GameCategory::ALL
        .into_iter()
        .map(|c| CategorySummary {
            id: c,
            name: c.display_name(),
            description: c.description(),
            game_count: games.iter().filter(|g| g.category == c).count(),
        })
        .collect()
}

pub fn sort_transactions(txs: &mut [Transaction]) {
    txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
