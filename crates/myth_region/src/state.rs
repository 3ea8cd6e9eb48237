//! Discrete region states.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How far reality has thinned in a region, least to most.
///
/// Serialized as its index (`0..=3`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RegionState {
    /// Normal, mundane reality.
    #[default]
    Stable,
    /// Reality beginning to thin.
    Awakening,
    /// Reality breaking down.
    Fractured,
    /// Full mythic manifestation.
    Mythic,
}

/// A state index outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid region state index {0}")]
pub struct InvalidRegionState(pub u8);

impl RegionState {
    /// All states in order.
    pub const ALL: [Self; 4] = [Self::Stable, Self::Awakening, Self::Fractured, Self::Mythic];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Awakening => "Awakening",
            Self::Fractured => "Fractured",
            Self::Mythic => "Mythic",
        }
    }

    /// The state visuals blend toward. `Mythic` is its own successor.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Stable => Self::Awakening,
            Self::Awakening => Self::Fractured,
            Self::Fractured | Self::Mythic => Self::Mythic,
        }
    }

    /// Position in [`RegionState::ALL`].
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// State at `index`, if valid.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Stable),
            1 => Some(Self::Awakening),
            2 => Some(Self::Fractured),
            3 => Some(Self::Mythic),
            _ => None,
        }
    }
}

impl From<RegionState> for u8 {
    fn from(state: RegionState) -> Self {
        state.index()
    }
}

impl TryFrom<u8> for RegionState {
    type Error = InvalidRegionState;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(InvalidRegionState(index))
    }
}

impl std::fmt::Display for RegionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
