use serde::{Deserialize, Serialize};

/// Platform tags a tracked game can be released on.
///
/// The wire representation is the upper-case tag used by the tracker
/// backend (`PC`, `PS5`, `XBOX`, `SWITCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Pc,
    Ps5,
    Xbox,
    Switch,
}

/// All platform variants in display order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::Pc,
    Platform::Ps5,
    Platform::Xbox,
    Platform::Switch,
];

impl Platform {
    /// Canonical short name used for CLI arguments and identifiers.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Ps5 => "ps5",
            Self::Xbox => "xbox",
            Self::Switch => "switch",
        }
    }

    /// Upper-case wire tag, as sent to and received from the backend.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Ps5 => "PS5",
            Self::Xbox => "XBOX",
            Self::Switch => "SWITCH",
        }
    }

    /// Label shown next to a platform toggle.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Ps5 => "PS5",
            Self::Xbox => "Xbox",
            Self::Switch => "Switch",
        }
    }

    /// All accepted names for this platform (case-insensitive matching).
    ///
    /// The canonical short name is always first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Pc => &["pc", "windows", "win", "steam"],
            Self::Ps5 => &["ps5", "playstation5", "playstation 5"],
            Self::Xbox => &["xbox", "xsx", "series x", "xbox series"],
            Self::Switch => &["switch", "ns", "nintendo switch"],
        }
    }

    /// All platform variants.
    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown platform: '{0}'")]
pub struct PlatformParseError(pub String);

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.aliases().contains(&lower.as_str()))
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
