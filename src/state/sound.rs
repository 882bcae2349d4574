//! Built-in alert sounds

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of alert sounds the audio player knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    Bell,
    /// Used for points that do not name a sound
    #[default]
    Gong,
}

impl SoundType {
    pub const ALL: [SoundType; 2] = [SoundType::Bell, SoundType::Gong];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundType::Bell => "bell",
            SoundType::Gong => "gong",
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bell" => Ok(SoundType::Bell),
            "gong" => Ok(SoundType::Gong),
            other => Err(Error::InvalidAlertConfig(format!("unknown sound '{}'", other))),
        }
    }
}
