// SPDX-License-Identifier: LGPL-3.0-or-later

//! Caps and format helpers shared by the element and its tests.
//!
//! The advertised caps are derived from the negotiator in
//! [`crossfeed_core::negotiate`], so the pad templates and the runtime
//! check in `setup` cannot drift apart.

use crossfeed_core::negotiate::{accepts_sample_format, CHANNELS, SAMPLE_RATES};
use crossfeed_core::{Endianness, StreamFormat};
use once_cell::sync::Lazy;

/// Every raw audio format whose sample representation the negotiator
/// accepts.
pub fn accepted_formats() -> Vec<gstreamer_audio::AudioFormat> {
    gstreamer_audio::AudioFormat::iter_raw()
        .filter(|format| {
            let info = gstreamer_audio::AudioFormatInfo::from_format(*format);
            accepts_sample_format(info.width(), info.depth(), info.is_float())
        })
        .collect()
}

/// Interleaved mono/stereo caps within the accepted rate range.
pub static CROSSFEED_CAPS: Lazy<gstreamer::Caps> = Lazy::new(|| {
    gstreamer_audio::AudioCapsBuilder::new_interleaved()
        .format_list(accepted_formats())
        .rate_range(*SAMPLE_RATES.start() as i32..=*SAMPLE_RATES.end() as i32)
        .channels_range(*CHANNELS.start() as i32..=*CHANNELS.end() as i32)
        .build()
});

/// Create the src + sink pad templates for the in-place filter.
pub fn pad_templates() -> Vec<gstreamer::PadTemplate> {
    let caps = &*CROSSFEED_CAPS;

    let src = gstreamer::PadTemplate::new(
        "src",
        gstreamer::PadDirection::Src,
        gstreamer::PadPresence::Always,
        caps,
    )
    .expect("failed to create src pad template");

    let sink = gstreamer::PadTemplate::new(
        "sink",
        gstreamer::PadDirection::Sink,
        gstreamer::PadPresence::Always,
        caps,
    )
    .expect("failed to create sink pad template");

    vec![src, sink]
}

/// Describe negotiated audio info in the negotiator's terms.
pub fn stream_format(info: &gstreamer_audio::AudioInfo) -> StreamFormat {
    let format = info.format_info();
    StreamFormat {
        channels: info.channels(),
        sample_rate: info.rate(),
        sample_width: format.width(),
        sample_depth: format.depth(),
        is_float: format.is_float(),
        endianness: match format.endianness() {
            gstreamer_audio::AudioEndianness::BigEndian => Endianness::Big,
            _ => Endianness::Little,
        },
    }
}
