// SPDX-License-Identifier: LGPL-3.0-or-later

//! Named crossfeed presets.
//!
//! A preset is a known [`Level`].  The preset a filter reports is never
//! stored: it is derived from the current level by [`Preset::derive`], and
//! falls back to the synthetic [`Preset::None`] when no table entry matches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::level::Level;

/// Crossfeed preset.  Discriminants are the public preset indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Preset {
    /// Closest to virtual speaker placement (30°, 3 meter).
    #[default]
    Default = 0,
    /// Close to Chu Moy's crossfeeder.
    Cmoy = 1,
    /// Close to Jan Meier's CORDA amplifiers.
    Jmeier = 2,
    /// The current level matches no preset.
    ///
    /// Its long name is the fixed "No preset" that bs2b-based elements have
    /// always reported, not a prefixed copy of another preset's name.
    None = 3,
}

/// The defined presets, in index order.  [`Preset::None`] is not part of it.
pub const PRESETS: [Preset; 3] = [Preset::Default, Preset::Cmoy, Preset::Jmeier];

impl Preset {
    /// Public index of the preset.
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Look a preset up by index, including the synthetic `none` (3).
    pub fn from_index(index: u32) -> Result<Self, ParamError> {
        match index {
            0 => Ok(Preset::Default),
            1 => Ok(Preset::Cmoy),
            2 => Ok(Preset::Jmeier),
            3 => Ok(Preset::None),
            other => Err(ParamError::InvalidEnum(other.to_string())),
        }
    }

    /// Short display label.
    pub const fn nick(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Cmoy => "cmoy",
            Preset::Jmeier => "jmeier",
            Preset::None => "none",
        }
    }

    /// Human-readable description.
    pub const fn long_name(self) -> &'static str {
        match self {
            Preset::Default => {
                "Closest to virtual speaker placement (30°, 3 meter) [700Hz, 4.5dB]"
            }
            Preset::Cmoy => "Close to Chu Moy's crossfeeder (popular) [700Hz, 6.0dB]",
            Preset::Jmeier => "Close to Jan Meier's CORDA amplifiers (little change) [650Hz, 9.5dB]",
            Preset::None => "No preset",
        }
    }

    /// The `(fcut, feed)` pair this preset stands for.  `None` has none.
    pub const fn level(self) -> Option<Level> {
        match self {
            Preset::Default => Some(Level::DEFAULT),
            Preset::Cmoy => Some(Level::from_parts(700, 60)),
            Preset::Jmeier => Some(Level::from_parts(650, 95)),
            Preset::None => None,
        }
    }

    /// First preset, in index order, whose level equals `level`.
    pub fn derive(level: Level) -> Preset {
        PRESETS
            .iter()
            .copied()
            .find(|preset| preset.level() == Some(level))
            .unwrap_or(Preset::None)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nick())
    }
}

/// Parses a nick (`"cmoy"`) or an index (`"1"`).
impl FromStr for Preset {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u32>() {
            return Preset::from_index(index);
        }
        [Preset::Default, Preset::Cmoy, Preset::Jmeier, Preset::None]
            .into_iter()
            .find(|preset| preset.nick().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamError::InvalidEnum(s.to_owned()))
    }
}
