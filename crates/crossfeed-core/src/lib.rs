// SPDX-License-Identifier: LGPL-3.0-or-later

//! # crossfeed-core
//!
//! Parameter handling and stream negotiation for a headphone crossfeed
//! filter.  The crate is free of any media-framework dependency; the
//! GStreamer element in `gst-plugin-crossfeed` is a thin shell around it.
//!
//! - **Presets**: the bs2b `default`, `cmoy` and `jmeier` levels plus the
//!   synthetic `none` reported for manual settings
//! - **Params**: the lock-free `active` / `fcut` / `feed` / `preset`
//!   property set and its static descriptor table
//! - **Negotiation**: the accept/reject decision for proposed stream formats
//! - **Engine**: the seam to the external coefficient engine and the
//!   per-block stage that drives it
//! - **Settings**: a serde snapshot of the property set

pub mod engine;
pub mod error;
pub mod level;
pub mod negotiate;
pub mod params;
pub mod preset;
pub mod settings;

pub use engine::{Block, CrossfeedEngine, CrossfeedStage, IdentityEngine};
pub use error::{NegotiationError, ParamError};
pub use level::Level;
pub use negotiate::{negotiate, Endianness, StreamFormat};
pub use params::{
    CrossfeedParams, Property, PropertyFlags, PropertyKind, PropertySpec, PropertyValue, Snapshot,
    PROPERTIES,
};
pub use preset::{Preset, PRESETS};
pub use settings::CrossfeedSettings;
