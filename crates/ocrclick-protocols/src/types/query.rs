//! Match queries and region bands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fractional slice of the image used to filter candidates by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Top => "top",
            Region::Bottom => "bottom",
            Region::Left => "left",
            Region::Right => "right",
            Region::Center => "center",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Region::Top),
            "bottom" => Ok(Region::Bottom),
            "left" => Ok(Region::Left),
            "right" => Ok(Region::Right),
            "center" => Ok(Region::Center),
            other => Err(format!(
                "unknown region '{}', expected one of top, bottom, left, right, center",
                other
            )),
        }
    }
}

/// Input to the match resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Text to look for.
    pub target: String,
    /// Byte-exact match instead of case-insensitive containment.
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub region: Option<Region>,
    /// Proximity hint: prefer candidates closest to the first item containing this text.
    #[serde(default)]
    pub near: Option<String>,
}

impl MatchQuery {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            exact: false,
            region: None,
            near: None,
        }
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn with_near(mut self, near: Option<String>) -> Self {
        self.near = near;
        self
    }
}
