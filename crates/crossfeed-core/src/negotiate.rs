// SPDX-License-Identifier: LGPL-3.0-or-later

//! Stream format negotiation.
//!
//! [`negotiate`] is a pure decision over a proposed [`StreamFormat`]: it
//! accepts mono or stereo audio between 2 kHz and 384 kHz, as integer
//! samples of 8, 16, 24 or 32 bits or float samples of 32 or 64 bits, in
//! either byte order.  Any depth from 1 bit up to the container width is
//! accepted.

use std::ops::RangeInclusive;

use crate::error::NegotiationError;

/// Lowest accepted sample rate (Hz).
pub const MIN_SAMPLE_RATE: u32 = 2000;
/// Highest accepted sample rate (Hz).
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Accepted channel counts.
pub const CHANNELS: RangeInclusive<u32> = 1..=2;
/// Accepted sample rates (Hz).
pub const SAMPLE_RATES: RangeInclusive<u32> = MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE;
/// Accepted container widths for integer samples.
pub const INT_WIDTHS: [u32; 4] = [8, 16, 24, 32];
/// Accepted container widths for float samples.
pub const FLOAT_WIDTHS: [u32; 2] = [32, 64];

/// Sample byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// A proposed stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamFormat {
    pub channels: u32,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Bits per sample container.
    pub sample_width: u32,
    /// Significant bits per sample.
    pub sample_depth: u32,
    pub is_float: bool,
    pub endianness: Endianness,
}

impl StreamFormat {
    /// Stereo 44.1 kHz little-endian integer samples.
    pub fn integer(width: u32, depth: u32) -> Self {
        Self {
            channels: 2,
            sample_rate: 44_100,
            sample_width: width,
            sample_depth: depth,
            is_float: false,
            endianness: Endianness::Little,
        }
    }

    /// Stereo 44.1 kHz little-endian float samples.
    pub fn float(width: u32, depth: u32) -> Self {
        Self {
            is_float: true,
            ..Self::integer(width, depth)
        }
    }

    pub fn with_channels(self, channels: u32) -> Self {
        Self { channels, ..self }
    }

    pub fn with_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    pub fn with_endianness(self, endianness: Endianness) -> Self {
        Self { endianness, ..self }
    }

    /// Whether the filter has anything to mix: only stereo is crossfed.
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Bytes occupied by one frame (one sample of every channel).
    pub fn bytes_per_frame(&self) -> usize {
        (self.sample_width / 8) as usize * self.channels as usize
    }
}

/// Whether a sample representation is supported, regardless of channels
/// and rate.
pub fn accepts_sample_format(width: u32, depth: u32, is_float: bool) -> bool {
    let widths: &[u32] = if is_float { &FLOAT_WIDTHS } else { &INT_WIDTHS };
    widths.contains(&width) && (1..=width).contains(&depth)
}

/// Decide whether the filter accepts `format`.
///
/// The error names the first failing check, in the order channels, rate,
/// sample format.  Byte order never causes a rejection.
pub fn negotiate(format: &StreamFormat) -> Result<(), NegotiationError> {
    let verdict = check(format);
    match &verdict {
        Ok(()) => tracing::debug!(?format, "stream format accepted"),
        Err(err) => tracing::debug!(?format, %err, "stream format rejected"),
    }
    verdict
}

fn check(format: &StreamFormat) -> Result<(), NegotiationError> {
    if !CHANNELS.contains(&format.channels) {
        return Err(NegotiationError::UnsupportedChannels(format.channels));
    }
    if !SAMPLE_RATES.contains(&format.sample_rate) {
        return Err(NegotiationError::UnsupportedRate(format.sample_rate));
    }
    if !accepts_sample_format(format.sample_width, format.sample_depth, format.is_float) {
        return Err(NegotiationError::UnsupportedFormat {
            width: format.sample_width,
            depth: format.sample_depth,
            is_float: format.is_float,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels() {
        let format = StreamFormat::integer(16, 16);
        assert!(negotiate(&format.with_channels(1)).is_ok());
        assert!(negotiate(&format.with_channels(2)).is_ok());
        assert_eq!(
            negotiate(&format.with_channels(3)),
            Err(NegotiationError::UnsupportedChannels(3))
        );
        assert_eq!(
            negotiate(&format.with_channels(0)),
            Err(NegotiationError::UnsupportedChannels(0))
        );
    }

    #[test]
    fn rate_boundaries() {
        let format = StreamFormat::integer(16, 16);
        assert!(negotiate(&format.with_rate(2000)).is_ok());
        assert!(negotiate(&format.with_rate(384_000)).is_ok());
        assert_eq!(
            negotiate(&format.with_rate(1999)),
            Err(NegotiationError::UnsupportedRate(1999))
        );
        assert_eq!(
            negotiate(&format.with_rate(384_001)),
            Err(NegotiationError::UnsupportedRate(384_001))
        );
    }

    #[test]
    fn first_failing_check_is_reported() {
        let format = StreamFormat::float(48, 48).with_channels(6).with_rate(1000);
        assert_eq!(
            negotiate(&format),
            Err(NegotiationError::UnsupportedChannels(6))
        );
        assert_eq!(
            negotiate(&format.with_channels(2)),
            Err(NegotiationError::UnsupportedRate(1000))
        );
    }

    #[test]
    fn depth_must_fit_width() {
        assert!(!accepts_sample_format(16, 0, false));
        assert!(!accepts_sample_format(16, 17, false));
        assert!(!accepts_sample_format(32, 33, true));
        assert!(accepts_sample_format(32, 24, false));
    }

    #[test]
    fn unsupported_widths() {
        assert!(!accepts_sample_format(12, 12, false));
        assert!(!accepts_sample_format(64, 64, false));
        assert!(!accepts_sample_format(16, 16, true));
    }

    #[test]
    fn frame_size() {
        assert_eq!(StreamFormat::integer(24, 24).bytes_per_frame(), 6);
        assert_eq!(
            StreamFormat::float(64, 64).with_channels(1).bytes_per_frame(),
            8
        );
    }
}
