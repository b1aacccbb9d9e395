// SPDX-License-Identifier: LGPL-3.0-or-later

//! Packed crossfeed level: cut frequency and feed amount in one word.
//!
//! The layout follows the bs2b library: `fcut` in Hz occupies the low 16
//! bits, `feed` in tenths of a dB the high 16 bits.  Storing the pair as a
//! single word lets a preset write both halves atomically and makes preset
//! matching an integer comparison.

use crate::error::ParamError;

/// Lowest accepted cut frequency (Hz).
pub const MIN_FCUT: i32 = 300;
/// Highest accepted cut frequency (Hz).
pub const MAX_FCUT: i32 = 2000;
/// Cut frequency of the default preset (Hz).
pub const DEFAULT_FCUT: i32 = 700;

/// Lowest accepted feed level (dB).
pub const MIN_FEED: f32 = 1.0;
/// Highest accepted feed level (dB).
pub const MAX_FEED: f32 = 15.0;
/// Feed level of the default preset (dB).
pub const DEFAULT_FEED: f32 = 4.5;

/// Feed is stored in units of `1 / FEED_FACTOR` dB.
pub const FEED_FACTOR: f32 = 10.0;

/// A validated `(fcut, feed)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level(u32);

impl Level {
    /// The level every new filter starts from (the `default` preset).
    pub const DEFAULT: Level = Level::from_parts(DEFAULT_FCUT as u16, 45);

    /// Build a level from raw parts without range checks.
    pub(crate) const fn from_parts(fcut: u16, feed_tenths: u16) -> Self {
        Self(fcut as u32 | (feed_tenths as u32) << 16)
    }

    /// Validate `fcut` (Hz) and `feed` (dB) and pack them.
    ///
    /// `feed` is rounded to the nearest tenth of a dB.
    pub fn new(fcut: i32, feed: f32) -> Result<Self, ParamError> {
        Ok(Self::from_parts(check_fcut(fcut)?, check_feed(feed)?))
    }

    /// Reconstruct a level from [`Level::bits`].
    pub(crate) const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The packed representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Cut frequency in Hz.
    pub const fn fcut(self) -> i32 {
        (self.0 & 0xFFFF) as i32
    }

    /// Feed level in tenths of a dB.
    pub const fn feed_tenths(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Feed level in dB.
    pub fn feed(self) -> f32 {
        f32::from(self.feed_tenths()) / FEED_FACTOR
    }

    /// Same feed, new cut frequency.
    pub fn with_fcut(self, fcut: i32) -> Result<Self, ParamError> {
        Ok(Self::from_parts(check_fcut(fcut)?, self.feed_tenths()))
    }

    /// Same cut frequency, new feed.
    pub fn with_feed(self, feed: f32) -> Result<Self, ParamError> {
        Ok(Self::from_parts(self.fcut() as u16, check_feed(feed)?))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_fcut(fcut: i32) -> Result<u16, ParamError> {
    if (MIN_FCUT..=MAX_FCUT).contains(&fcut) {
        Ok(fcut as u16)
    } else {
        Err(ParamError::OutOfRange {
            property: "fcut",
            value: f64::from(fcut),
            min: f64::from(MIN_FCUT),
            max: f64::from(MAX_FCUT),
        })
    }
}

fn check_feed(feed: f32) -> Result<u16, ParamError> {
    // NaN fails the range test.
    if (MIN_FEED..=MAX_FEED).contains(&feed) {
        Ok((feed * FEED_FACTOR).round() as u16)
    } else {
        Err(ParamError::OutOfRange {
            property: "feed",
            value: f64::from(feed),
            min: f64::from(MIN_FEED),
            max: f64::from(MAX_FEED),
        })
    }
}
