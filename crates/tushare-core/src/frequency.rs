//! Bar selectors: frequency, asset class, price adjustment and derived factors.
//!
//! Each selector parses from the short codes the Tushare API and its SDKs use
//! (`"D"`, `"FT"`, `"qfq"`, `"vr"`, ...). Unknown frequency and asset class
//! codes select the daily stock endpoints; unknown adjustments and factors are
//! rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TushareError;

/// Frequency of bar data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Freq {
    /// Daily bars.
    #[default]
    Daily,
    /// Weekly bars.
    Weekly,
    /// Monthly bars.
    Monthly,
}

impl Freq {
    /// Returns the short code (`D`, `W`, `M`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "M",
        }
    }
}

/// Unknown codes fall back to [`Freq::Daily`] with a warning.
impl FromStr for Freq {
    type Err = TushareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "D" => Ok(Self::Daily),
            "W" => Ok(Self::Weekly),
            "M" => Ok(Self::Monthly),
            other => {
                warn!(code = other, "unknown frequency, using daily bars");
                Ok(Self::Daily)
            }
        }
    }
}

/// Asset class of a bar request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Stocks (`E`). The only class that supports price adjustment.
    #[default]
    Equity,
    /// Indices (`I`).
    Index,
    /// Futures (`FT`).
    Futures,
    /// Digital currencies (`C`).
    Coin,
}

impl AssetClass {
    /// Returns the short code (`E`, `I`, `FT`, `C`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Equity => "E",
            Self::Index => "I",
            Self::Futures => "FT",
            Self::Coin => "C",
        }
    }

    /// Returns true if forward/backward adjustment applies to this class.
    #[must_use]
    pub const fn supports_adjustment(&self) -> bool {
        matches!(self, Self::Equity)
    }
}

/// Unknown codes fall back to [`AssetClass::Equity`] with a warning.
impl FromStr for AssetClass {
    type Err = TushareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "E" => Ok(Self::Equity),
            "I" => Ok(Self::Index),
            "FT" => Ok(Self::Futures),
            "C" => Ok(Self::Coin),
            other => {
                warn!(code = other, "unknown asset class, using the stock endpoints");
                Ok(Self::Equity)
            }
        }
    }
}

/// Price adjustment mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustMode {
    /// Forward adjustment (`qfq`): prices rescaled relative to the first factor.
    Forward,
    /// Backward adjustment (`hfq`): prices multiplied by their own factor.
    Backward,
}

impl AdjustMode {
    /// Returns the short code (`qfq`, `hfq`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Forward => "qfq",
            Self::Backward => "hfq",
        }
    }

    /// Parses an optional adjustment; empty and `None` mean unadjusted.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, TushareError> {
        match s.trim() {
            "" | "None" | "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl fmt::Display for AdjustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AdjustMode {
    type Err = TushareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qfq" => Ok(Self::Forward),
            "hfq" => Ok(Self::Backward),
            other => Err(TushareError::InvalidParameter(format!(
                "unknown adjustment: {other}. Supported: qfq, hfq"
            ))),
        }
    }
}

/// Derived per-row factor appended to a bar series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    /// Volume ratio against the trailing five-bar average (`vr`).
    VolumeRatio,
    /// Turnover rate (`tor`). Needs share capital data and is not computed.
    TurnoverRate,
}

impl FromStr for Factor {
    type Err = TushareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vr" | "volume_ratio" => Ok(Self::VolumeRatio),
            "tor" | "turnover_rate" => Ok(Self::TurnoverRate),
            other => Err(TushareError::InvalidParameter(format!(
                "unknown factor: {other}. Supported: vr, tor"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_codes_parse() {
        assert_eq!("".parse::<Freq>().unwrap(), Freq::Daily);
        assert_eq!("w".parse::<Freq>().unwrap(), Freq::Weekly);
        assert_eq!("FT".parse::<AssetClass>().unwrap(), AssetClass::Futures);
        assert_eq!("".parse::<AssetClass>().unwrap(), AssetClass::Equity);
        assert_eq!("qfq".parse::<AdjustMode>().unwrap(), AdjustMode::Forward);
        assert_eq!("volume_ratio".parse::<Factor>().unwrap(), Factor::VolumeRatio);
    }

    #[test]
    fn test_unknown_codes_fall_back_to_defaults() {
        assert_eq!("Y".parse::<Freq>().unwrap(), Freq::Daily);
        assert_eq!("X".parse::<AssetClass>().unwrap(), AssetClass::Equity);
        assert_eq!("i".parse::<AssetClass>().unwrap(), AssetClass::Index);
    }

    #[test]
    fn test_optional_adjustment() {
        assert_eq!(AdjustMode::parse_optional("None").unwrap(), None);
        assert_eq!(AdjustMode::parse_optional("").unwrap(), None);
        assert_eq!(
            AdjustMode::parse_optional("hfq").unwrap(),
            Some(AdjustMode::Backward)
        );
        assert!(AdjustMode::parse_optional("bad").is_err());
    }

    #[test]
    fn test_only_equities_adjust() {
        assert!(AssetClass::Equity.supports_adjustment());
        assert!(!AssetClass::Index.supports_adjustment());
        assert!(!AssetClass::Coin.supports_adjustment());
    }
}
