//! Basemap tile sources for interactive rendering

use crate::{PlotError, Result};
use std::str::FromStr;

/// Basemap drawn underneath interactive overlays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tiles {
    /// No basemap
    None,
    #[default]
    OpenStreetMap,
    OpenTopoMap,
}

impl Tiles {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn url(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::OpenStreetMap => Some("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            Self::OpenTopoMap => Some("https://tile.opentopomap.org/{z}/{x}/{y}.png"),
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::OpenStreetMap => "© OpenStreetMap contributors",
            Self::OpenTopoMap => "© OpenTopoMap (CC-BY-SA)",
        }
    }
}

impl FromStr for Tiles {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osm" | "openstreetmap" => Ok(Self::OpenStreetMap),
            "otm" | "opentopomap" => Ok(Self::OpenTopoMap),
            "none" | "false" | "" => Ok(Self::None),
            other => Err(PlotError::InvalidOption {
                key: "tiles".to_string(),
                reason: format!("unknown tile source {other:?}"),
            }),
        }
    }
}
