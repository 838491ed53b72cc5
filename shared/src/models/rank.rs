//! Rank List Models
//!
//! Position-ordered merchandising lists (featured / hero carousels).
//! Positions within one list form a contiguous 1..=N sequence with no
//! duplicates; a product appears at most once per list.

use serde::{Deserialize, Serialize};

/// The two promoted-product lists. Mutations on different lists are
/// fully independent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RankList {
    Featured,
    Hero,
}

impl RankList {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankList::Featured => "featured",
            RankList::Hero => "hero",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "featured" => Some(RankList::Featured),
            "hero" => Some(RankList::Hero),
            _ => None,
        }
    }
}

/// Direction for rank moves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// One membership in a rank list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RankedEntry {
    pub id: i64,
    pub list: RankList,
    pub product_id: i64,
    /// 1-based position within the list
    pub position: i64,
}
