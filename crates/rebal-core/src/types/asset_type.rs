//! Asset type classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RebalError;

/// Top-level grouping of asset types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Growth-seeking assets (Core, Growth, Speculative).
    Investment,
    /// Capital preservation assets (Cash, Bond, Gold).
    Reserve,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Investment => write!(f, "Investment"),
            Bucket::Reserve => write!(f, "Reserve"),
        }
    }
}

/// Category of a holding.
///
/// The set is closed; anything the loader cannot recognize becomes
/// [`AssetType::Unknown`] and receives a zero target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum AssetType {
    /// Broad-market, long-term holdings.
    Core,
    /// Higher-risk growth holdings.
    Growth,
    /// Small, high-risk bets.
    Speculative,
    /// Cash and cash equivalents.
    Cash,
    /// Fixed income.
    Bond,
    /// Gold and gold funds.
    Gold,
    /// Unrecognized category.
    #[default]
    Unknown,
}

impl AssetType {
    /// Investment types in their fixed base-weight order.
    pub const INVESTMENT: [AssetType; 3] = [AssetType::Core, AssetType::Growth, AssetType::Speculative];

    /// Reserve types.
    pub const RESERVE: [AssetType; 3] = [AssetType::Cash, AssetType::Bond, AssetType::Gold];

    /// All known types (excludes [`AssetType::Unknown`]).
    pub const KNOWN: [AssetType; 6] = [
        AssetType::Core,
        AssetType::Growth,
        AssetType::Speculative,
        AssetType::Cash,
        AssetType::Bond,
        AssetType::Gold,
    ];

    /// Returns the bucket this type belongs to, or `None` for unknown types.
    #[must_use]
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            AssetType::Core | AssetType::Growth | AssetType::Speculative => Some(Bucket::Investment),
            AssetType::Cash | AssetType::Bond | AssetType::Gold => Some(Bucket::Reserve),
            AssetType::Unknown => None,
        }
    }

    /// Returns true for Core, Growth and Speculative.
    #[must_use]
    pub fn is_investment(&self) -> bool {
        self.bucket() == Some(Bucket::Investment)
    }

    /// Returns true for Cash, Bond and Gold.
    #[must_use]
    pub fn is_reserve(&self) -> bool {
        self.bucket() == Some(Bucket::Reserve)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AssetType::Core => "Core",
            AssetType::Growth => "Growth",
            AssetType::Speculative => "Speculative",
            AssetType::Cash => "Cash",
            AssetType::Bond => "Bond",
            AssetType::Gold => "Gold",
            AssetType::Unknown => "Unknown",
        }
    }

    /// Parses a type label, case-insensitively.
    ///
    /// Unlike [`FromStr`], unrecognized labels map to [`AssetType::Unknown`]
    /// instead of failing.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(AssetType::Unknown)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AssetType {
    type Err = RebalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" => Ok(AssetType::Core),
            "growth" => Ok(AssetType::Growth),
            "speculative" | "spec" => Ok(AssetType::Speculative),
            "cash" => Ok(AssetType::Cash),
            "bond" | "bonds" => Ok(AssetType::Bond),
            "gold" => Ok(AssetType::Gold),
            "unknown" => Ok(AssetType::Unknown),
            _ => Err(RebalError::invalid_asset_type(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket() {
        assert_eq!(AssetType::Core.bucket(), Some(Bucket::Investment));
        assert_eq!(AssetType::Speculative.bucket(), Some(Bucket::Investment));
        assert_eq!(AssetType::Gold.bucket(), Some(Bucket::Reserve));
        assert_eq!(AssetType::Unknown.bucket(), None);

        assert!(AssetType::Growth.is_investment());
        assert!(!AssetType::Growth.is_reserve());
        assert!(AssetType::Cash.is_reserve());
        assert!(!AssetType::Unknown.is_investment());
        assert!(!AssetType::Unknown.is_reserve());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Core".parse::<AssetType>().unwrap(), AssetType::Core);
        assert_eq!(" growth ".parse::<AssetType>().unwrap(), AssetType::Growth);
        assert_eq!("SPECULATIVE".parse::<AssetType>().unwrap(), AssetType::Speculative);
        assert_eq!("bonds".parse::<AssetType>().unwrap(), AssetType::Bond);
        assert!("Crypto".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_from_label_falls_back_to_unknown() {
        assert_eq!(AssetType::from_label("Gold"), AssetType::Gold);
        assert_eq!(AssetType::from_label("REIT"), AssetType::Unknown);
        assert_eq!(AssetType::from_label(""), AssetType::Unknown);
    }

    #[test]
    fn test_known_sets_are_disjoint() {
        for t in AssetType::INVESTMENT {
            assert!(!AssetType::RESERVE.contains(&t));
        }
        assert_eq!(AssetType::KNOWN.len(), 6);
        assert!(!AssetType::KNOWN.contains(&AssetType::Unknown));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AssetType::Speculative), "Speculative");
        assert_eq!(format!("{}", Bucket::Reserve), "Reserve");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&AssetType::Bond).unwrap();
        let parsed: AssetType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AssetType::Bond);
    }
}
