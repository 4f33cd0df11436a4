use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A Taiko protocol fork. Each fork ships its own set of L1 and L2 contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fork {
    /// Block-based proposals (`TaikoL1`, `TaikoL2`).
    Ontake,
    /// Batch-based proposals (`TaikoInbox`, `TaikoAnchor`).
    Pacaya,
    /// Compact proposals with bond instructions (`Inbox`, `Anchor`, `BondManager`).
    Shasta,
}

impl Fork {
    /// All forks, in activation order.
    pub const ALL: [Self; 3] = [Self::Ontake, Self::Pacaya, Self::Shasta];

    /// Returns the lowercase name of the fork.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ontake => "ontake",
            Self::Pacaya => "pacaya",
            Self::Shasta => "shasta",
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown fork name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fork: {0}, expected one of: ontake, pacaya, shasta")]
pub struct UnknownFork(pub String);

impl FromStr for Fork {
    type Err = UnknownFork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ontake" => Ok(Self::Ontake),
            "pacaya" => Ok(Self::Pacaya),
            "shasta" => Ok(Self::Shasta),
            other => Err(UnknownFork(other.to_owned())),
        }
    }
}
