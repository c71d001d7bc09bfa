//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RebalError;

/// ISO 4217 currency codes.
///
/// Covers the currencies a Thai-baht based personal portfolio commonly holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// Thai Baht
    #[default]
    THB,
    /// United States Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// Chinese Yuan Renminbi
    CNY,
    /// Indian Rupee
    INR,
    /// South Korean Won
    KRW,
    /// New Taiwan Dollar
    TWD,
    /// Vietnamese Dong
    VND,
    /// Malaysian Ringgit
    MYR,
    /// Indonesian Rupiah
    IDR,
}

impl Currency {
    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::THB => "THB",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::KRW => "KRW",
            Currency::TWD => "TWD",
            Currency::VND => "VND",
            Currency::MYR => "MYR",
            Currency::IDR => "IDR",
        }
    }

    /// Returns the currency symbol.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::THB => "฿",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY | Currency::CNY => "¥",
            Currency::CHF => "CHF",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::HKD => "HK$",
            Currency::SGD => "S$",
            Currency::INR => "₹",
            Currency::KRW => "₩",
            Currency::TWD => "NT$",
            Currency::VND => "₫",
            Currency::MYR => "RM",
            Currency::IDR => "Rp",
        }
    }

    /// Returns the standard number of decimal places for the currency.
    #[must_use]
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY | Currency::KRW | Currency::VND | Currency::IDR => 0,
            _ => 2,
        }
    }

    /// Parses a currency from a string code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "THB" => Some(Currency::THB),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CHF" => Some(Currency::CHF),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "HKD" => Some(Currency::HKD),
            "SGD" => Some(Currency::SGD),
            "CNY" => Some(Currency::CNY),
            "INR" => Some(Currency::INR),
            "KRW" => Some(Currency::KRW),
            "TWD" => Some(Currency::TWD),
            "VND" => Some(Currency::VND),
            "MYR" => Some(Currency::MYR),
            "IDR" => Some(Currency::IDR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = RebalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| RebalError::invalid_currency(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::THB.code(), "THB");
        assert_eq!(Currency::USD.code(), "USD");
        assert_eq!(Currency::HKD.code(), "HKD");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("thb"), Some(Currency::THB));
        assert_eq!(Currency::from_code(" USD "), Some(Currency::USD));
        assert_eq!(Currency::from_code("XXX"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("sgd".parse::<Currency>().unwrap(), Currency::SGD);
        let err = "ABC".parse::<Currency>().unwrap_err();
        assert!(err.to_string().contains("ABC"));
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(Currency::THB.decimal_places(), 2);
        assert_eq!(Currency::JPY.decimal_places(), 0);
        assert_eq!(Currency::VND.decimal_places(), 0);
    }

    #[test]
    fn test_default_is_baht() {
        assert_eq!(Currency::default(), Currency::THB);
        assert_eq!(Currency::THB.symbol(), "฿");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Currency::USD), "USD");
        assert_eq!(format!("{}", Currency::THB), "THB");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Currency::EUR).unwrap();
        let parsed: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Currency::EUR);
    }
}
