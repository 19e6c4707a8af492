use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TierScoreError;

/// Number of ranks on the ladder.
pub const RANK_COUNT: usize = 31;

/// Number of ranks that carry a division (seven bands of four).
pub const DIVISIONED_RANK_COUNT: usize = 28;

/// A competitive rank.
///
/// Discriminants follow the ladder from weakest to strongest, so the derived
/// `Ord` is the ladder order. Never compare ranks through their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum Rank {
    IronIV = 0,
    IronIII,
    IronII,
    IronI,
    BronzeIV,
    BronzeIII,
    BronzeII,
    BronzeI,
    SilverIV,
    SilverIII,
    SilverII,
    SilverI,
    GoldIV,
    GoldIII,
    GoldII,
    GoldI,
    PlatinumIV,
    PlatinumIII,
    PlatinumII,
    PlatinumI,
    EmeraldIV,
    EmeraldIII,
    EmeraldII,
    EmeraldI,
    DiamondIV,
    DiamondIII,
    DiamondII,
    DiamondI,
    Master,
    Grandmaster,
    Challenger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

/// Division within a band. `I` is the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Tier {
    const BANDS: [Tier; 7] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Iron => "iron",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
            Tier::Emerald => "emerald",
            Tier::Diamond => "diamond",
            Tier::Master => "master",
            Tier::Grandmaster => "grandmaster",
            Tier::Challenger => "challenger",
        }
    }

    pub fn is_apex(&self) -> bool {
        matches!(self, Tier::Master | Tier::Grandmaster | Tier::Challenger)
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "iron" => Some(Tier::Iron),
            "bronze" => Some(Tier::Bronze),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            "platinum" => Some(Tier::Platinum),
            "emerald" => Some(Tier::Emerald),
            "diamond" => Some(Tier::Diamond),
            "master" => Some(Tier::Master),
            "grandmaster" => Some(Tier::Grandmaster),
            "challenger" => Some(Tier::Challenger),
            _ => None,
        }
    }
}

impl Division {
    const ALL: [Division; 4] = [Division::IV, Division::III, Division::II, Division::I];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::IV => "iv",
            Division::III => "iii",
            Division::II => "ii",
            Division::I => "i",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "iv" | "4" => Some(Division::IV),
            "iii" | "3" => Some(Division::III),
            "ii" | "2" => Some(Division::II),
            "i" | "1" => Some(Division::I),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Division::IV => 0,
            Division::III => 1,
            Division::II => 2,
            Division::I => 3,
        }
    }
}

impl Rank {
    /// Every rank in ladder order. `ALL[r.ordinal()] == r` for each rank.
    pub const ALL: [Rank; RANK_COUNT] = [
        Rank::IronIV,
        Rank::IronIII,
        Rank::IronII,
        Rank::IronI,
        Rank::BronzeIV,
        Rank::BronzeIII,
        Rank::BronzeII,
        Rank::BronzeI,
        Rank::SilverIV,
        Rank::SilverIII,
        Rank::SilverII,
        Rank::SilverI,
        Rank::GoldIV,
        Rank::GoldIII,
        Rank::GoldII,
        Rank::GoldI,
        Rank::PlatinumIV,
        Rank::PlatinumIII,
        Rank::PlatinumII,
        Rank::PlatinumI,
        Rank::EmeraldIV,
        Rank::EmeraldIII,
        Rank::EmeraldII,
        Rank::EmeraldI,
        Rank::DiamondIV,
        Rank::DiamondIII,
        Rank::DiamondII,
        Rank::DiamondI,
        Rank::Master,
        Rank::Grandmaster,
        Rank::Challenger,
    ];

    /// Dense 0-based position on the ladder.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn tier(self) -> Tier {
        match self {
            Rank::Master => Tier::Master,
            Rank::Grandmaster => Tier::Grandmaster,
            Rank::Challenger => Tier::Challenger,
            divisioned => Tier::BANDS[divisioned.ordinal() / 4],
        }
    }

    pub fn division(self) -> Option<Division> {
        if self.is_apex() {
            None
        } else {
            Some(Division::ALL[self.ordinal() % 4])
        }
    }

    pub fn is_apex(self) -> bool {
        self.ordinal() >= DIVISIONED_RANK_COUNT
    }

    pub fn from_parts(tier: Tier, division: Option<Division>) -> Option<Self> {
        match (tier.is_apex(), division) {
            (true, None) => match tier {
                Tier::Master => Some(Rank::Master),
                Tier::Grandmaster => Some(Rank::Grandmaster),
                _ => Some(Rank::Challenger),
            },
            (false, Some(division)) => {
                let band = Tier::BANDS.iter().position(|t| *t == tier)?;
                Self::from_ordinal(band * 4 + division.index())
            }
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Canonical form, e.g. `gold_iii` or `master`.
    pub fn as_str(self) -> &'static str {
        RANK_NAMES[self.ordinal()]
    }
}

const RANK_NAMES: [&str; RANK_COUNT] = [
    "iron_iv",
    "iron_iii",
    "iron_ii",
    "iron_i",
    "bronze_iv",
    "bronze_iii",
    "bronze_ii",
    "bronze_i",
    "silver_iv",
    "silver_iii",
    "silver_ii",
    "silver_i",
    "gold_iv",
    "gold_iii",
    "gold_ii",
    "gold_i",
    "platinum_iv",
    "platinum_iii",
    "platinum_ii",
    "platinum_i",
    "emerald_iv",
    "emerald_iii",
    "emerald_ii",
    "emerald_i",
    "diamond_iv",
    "diamond_iii",
    "diamond_ii",
    "diamond_i",
    "master",
    "grandmaster",
    "challenger",
];

impl FromStr for Rank {
    type Err = TierScoreError;

    /// Accepts `gold_iii`, `Gold III`, `gold-3` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let mut parts = normalized.split('_').filter(|p| !p.is_empty());

        let tier = parts
            .next()
            .and_then(Tier::parse)
            .ok_or_else(|| TierScoreError::InvalidRank(s.to_string()))?;
        let division = match parts.next() {
            Some(d) => Some(Division::parse(d).ok_or_else(|| TierScoreError::InvalidRank(s.to_string()))?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(TierScoreError::InvalidRank(s.to_string()));
        }

        Rank::from_parts(tier, division).ok_or_else(|| TierScoreError::InvalidRank(s.to_string()))
    }
}

impl TryFrom<String> for Rank {
    type Error = TierScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.as_str().to_string()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
