// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error types for property writes and format negotiation.

use thiserror::Error;

use crate::negotiate::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

/// A rejected property write.  The property set is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{property} value {value} is outside [{min}, {max}]")]
    OutOfRange {
        property: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid preset: {0}")]
    InvalidEnum(String),
}

/// A proposed stream format the filter cannot process.
///
/// Rejection is final for that format; the caller has to propose another
/// one or fail the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error("unsupported channel count {0} (expected 1 or 2)")]
    UnsupportedChannels(u32),

    #[error(
        "unsupported sample rate {0} Hz (expected {min}..={max})",
        min = MIN_SAMPLE_RATE,
        max = MAX_SAMPLE_RATE
    )]
    UnsupportedRate(u32),

    #[error("unsupported {} sample format {width}/{depth}", sample_kind(*.is_float))]
    UnsupportedFormat {
        width: u32,
        depth: u32,
        is_float: bool,
    },
}

fn sample_kind(is_float: bool) -> &'static str {
    if is_float {
        "float"
    } else {
        "integer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_property_and_bounds() {
        let err = ParamError::OutOfRange {
            property: "fcut",
            value: 2001.0,
            min: 300.0,
            max: 2000.0,
        };
        assert_eq!(err.to_string(), "fcut value 2001 is outside [300, 2000]");
    }

    #[test]
    fn negotiation_messages() {
        assert_eq!(
            NegotiationError::UnsupportedRate(1999).to_string(),
            "unsupported sample rate 1999 Hz (expected 2000..=384000)"
        );
        let err = NegotiationError::UnsupportedFormat {
            width: 48,
            depth: 48,
            is_float: true,
        };
        assert_eq!(err.to_string(), "unsupported float sample format 48/48");
    }
}
