// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer `crossfeed` element.
//!
//! An in-place `AudioFilter` / `BaseTransform` exposing the
//! [`crossfeed_core`] property set as the `active`, `fcut`, `feed` and
//! `preset` GObject properties.  Properties are lock-free, so they can be
//! changed from any thread while buffers flow; each buffer is processed
//! with one consistent snapshot.
//!
//! The element runs in passthrough while inactive or for mono streams.
//! Stereo buffers are handed to the installed [`CrossfeedEngine`]
//! ([`IdentityEngine`](crossfeed_core::IdentityEngine) until a host
//! installs another one).

use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;
use gstreamer_audio::subclass::prelude::*;
use gstreamer_base::prelude::*;

use crossfeed_core::params::{PropertyKind, PropertySpec};
use crossfeed_core::{CrossfeedEngine, CrossfeedParams, CrossfeedStage, Preset, PROPERTIES};

use crate::base;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub(crate) static CAT: Lazy<gstreamer::DebugCategory> = Lazy::new(|| {
    gstreamer::DebugCategory::new(
        "crossfeed",
        gstreamer::DebugColorFlags::empty(),
        Some("Headphone crossfeed filter"),
    )
});

const PROP_ACTIVE: &str = "active";
const PROP_FCUT: &str = "fcut";
const PROP_FEED: &str = "feed";
const PROP_PRESET: &str = "preset";

// ── Preset enum ─────────────────────────────────────────────────────

/// GLib mirror of [`Preset`]; value names and nicks are the same strings.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, glib::Enum)]
#[repr(u32)]
#[enum_type(name = "GstCrossfeedPreset")]
pub enum CrossfeedPreset {
    #[enum_value(
        name = "Closest to virtual speaker placement (30°, 3 meter) [700Hz, 4.5dB]",
        nick = "default"
    )]
    Default = 0,
    #[enum_value(
        name = "Close to Chu Moy's crossfeeder (popular) [700Hz, 6.0dB]",
        nick = "cmoy"
    )]
    Cmoy = 1,
    #[enum_value(
        name = "Close to Jan Meier's CORDA amplifiers (little change) [650Hz, 9.5dB]",
        nick = "jmeier"
    )]
    Jmeier = 2,
    #[enum_value(name = "No preset", nick = "none")]
    None = 3,
}

impl From<Preset> for CrossfeedPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Default => CrossfeedPreset::Default,
            Preset::Cmoy => CrossfeedPreset::Cmoy,
            Preset::Jmeier => CrossfeedPreset::Jmeier,
            Preset::None => CrossfeedPreset::None,
        }
    }
}

impl From<CrossfeedPreset> for Preset {
    fn from(preset: CrossfeedPreset) -> Self {
        match preset {
            CrossfeedPreset::Default => Preset::Default,
            CrossfeedPreset::Cmoy => Preset::Cmoy,
            CrossfeedPreset::Jmeier => Preset::Jmeier,
            CrossfeedPreset::None => Preset::None,
        }
    }
}

// ── Element definition ──────────────────────────────────────────────

/// GStreamer crossfeed element backed by `crossfeed_core`.
#[derive(Default)]
pub struct Crossfeed {
    params: CrossfeedParams,
    /// Whether the negotiated stream is stereo.  Read from property setters,
    /// so it lives outside the stage mutex.
    stereo: AtomicBool,
    stage: Mutex<CrossfeedStage>,
}

#[glib::object_subclass]
impl ObjectSubclass for Crossfeed {
    const NAME: &'static str = "GstCrossfeed";
    type Type = super::Crossfeed;
    type ParentType = gstreamer_audio::AudioFilter;
}

impl Crossfeed {
    pub(crate) fn set_engine(&self, engine: Box<dyn CrossfeedEngine>) {
        match self.stage.lock() {
            Ok(mut stage) => stage.set_engine(engine),
            Err(_) => gstreamer::error!(CAT, imp = self, "Mutex poisoned, engine not installed"),
        }
    }

    fn update_passthrough(&self) {
        let passthrough = !self.params.active() || !self.stereo.load(Ordering::Acquire);
        gstreamer::debug!(CAT, imp = self, "passthrough: {}", passthrough);
        self.obj().set_passthrough(passthrough);
    }
}

// ── GObject property implementation ─────────────────────────────────

/// Build the GObject param spec for one entry of the core property table.
fn param_spec(spec: &PropertySpec) -> glib::ParamSpec {
    match spec.kind {
        PropertyKind::Boolean { default } => glib::ParamSpecBoolean::builder(spec.name)
            .nick(spec.nick)
            .blurb(spec.blurb)
            .default_value(default)
            .controllable()
            .build(),
        PropertyKind::Int { min, max, default } => glib::ParamSpecInt::builder(spec.name)
            .nick(spec.nick)
            .blurb(spec.blurb)
            .minimum(min)
            .maximum(max)
            .default_value(default)
            .controllable()
            .build(),
        PropertyKind::Float { min, max, default } => glib::ParamSpecFloat::builder(spec.name)
            .nick(spec.nick)
            .blurb(spec.blurb)
            .minimum(min)
            .maximum(max)
            .default_value(default)
            .controllable()
            .build(),
        PropertyKind::Enum { default } => {
            glib::ParamSpecEnum::builder_with_default(spec.name, CrossfeedPreset::from(default))
                .nick(spec.nick)
                .blurb(spec.blurb)
                .controllable()
                .build()
        }
    }
}

impl ObjectImpl for Crossfeed {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES_SPECS: Lazy<Vec<glib::ParamSpec>> =
            Lazy::new(|| PROPERTIES.iter().map(param_spec).collect());
        PROPERTIES_SPECS.as_ref()
    }

    fn constructed(&self) {
        self.parent_constructed();
        self.obj().set_gap_aware(true);
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let result = match pspec.name() {
            PROP_ACTIVE => {
                self.params.set_active(value.get().expect("type checked"));
                self.update_passthrough();
                Ok(())
            }
            PROP_FCUT => self.params.set_fcut(value.get().expect("type checked")),
            PROP_FEED => self.params.set_feed(value.get().expect("type checked")),
            PROP_PRESET => {
                let preset: CrossfeedPreset = value.get().expect("type checked");
                self.params.set_preset(preset.into())
            }
            _ => unimplemented!(),
        };
        match result {
            Ok(()) => gstreamer::debug!(
                CAT,
                imp = self,
                "{} set, effective preset {}",
                pspec.name(),
                self.params.preset()
            ),
            Err(err) => gstreamer::warning!(CAT, imp = self, "Ignoring {}: {}", pspec.name(), err),
        }
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        match pspec.name() {
            PROP_ACTIVE => self.params.active().to_value(),
            PROP_FCUT => self.params.fcut().to_value(),
            PROP_FEED => self.params.feed().to_value(),
            PROP_PRESET => CrossfeedPreset::from(self.params.preset()).to_value(),
            _ => unimplemented!(),
        }
    }
}

impl GstObjectImpl for Crossfeed {}

impl ElementImpl for Crossfeed {
    fn metadata() -> Option<&'static gstreamer::subclass::ElementMetadata> {
        static ELEMENT_METADATA: Lazy<gstreamer::subclass::ElementMetadata> = Lazy::new(|| {
            gstreamer::subclass::ElementMetadata::new(
                "Crossfeed effect",
                "Filter/Effect/Audio",
                "Improve headphone listening of stereo audio records",
                "Crossfeed developers",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gstreamer::PadTemplate] {
        static PAD_TEMPLATES: Lazy<Vec<gstreamer::PadTemplate>> = Lazy::new(base::pad_templates);
        PAD_TEMPLATES.as_ref()
    }
}

impl BaseTransformImpl for Crossfeed {
    const MODE: gstreamer_base::subclass::BaseTransformMode =
        gstreamer_base::subclass::BaseTransformMode::AlwaysInPlace;
    const PASSTHROUGH_ON_SAME_CAPS: bool = false;
    const TRANSFORM_IP_ON_PASSTHROUGH: bool = false;

    fn sink_event(&self, event: gstreamer::Event) -> bool {
        if let gstreamer::EventView::Segment(_) = event.view() {
            match self.stage.lock() {
                Ok(mut stage) => stage.reset(),
                Err(_) => gstreamer::error!(CAT, imp = self, "Mutex poisoned in sink_event"),
            }
        }
        self.parent_sink_event(event)
    }

    fn transform_ip(
        &self,
        buf: &mut gstreamer::BufferRef,
    ) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> {
        if buf.flags().contains(gstreamer::BufferFlags::GAP) {
            return Ok(gstreamer::FlowSuccess::Ok);
        }

        let mut stage = self.stage.lock().map_err(|_| {
            gstreamer::element_error!(self.obj(), gstreamer::CoreError::Failed, ["Mutex poisoned"]);
            gstreamer::FlowError::Error
        })?;

        let mut map = buf.map_writable().map_err(|_| {
            gstreamer::element_error!(
                self.obj(),
                gstreamer::CoreError::Failed,
                ["Failed to map buffer writable"]
            );
            gstreamer::FlowError::Error
        })?;

        let block = stage.process(&self.params, map.as_mut_slice());
        gstreamer::trace!(CAT, imp = self, "{:?} {} bytes", block, map.len());

        drop(map);
        Ok(gstreamer::FlowSuccess::Ok)
    }

    fn stop(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut stage = self
            .stage
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        stage.stop();
        self.stereo.store(false, Ordering::Release);
        Ok(())
    }
}

impl AudioFilterImpl for Crossfeed {
    fn allowed_caps() -> &'static gstreamer::Caps {
        &base::CROSSFEED_CAPS
    }

    fn setup(&self, info: &gstreamer_audio::AudioInfo) -> Result<(), gstreamer::LoggableError> {
        self.parent_setup(info)?;

        let format = base::stream_format(info);

        let mut stage = self.stage.lock().map_err(|_| {
            gstreamer::loggable_error!(CAT, "Mutex poisoned in AudioFilterImpl::setup")
        })?;

        stage
            .configure(format)
            .map_err(|err| gstreamer::loggable_error!(CAT, "Rejected {:?}: {}", format, err))?;
        drop(stage);

        gstreamer::info!(CAT, imp = self, "Configured for {:?}", format);
        self.stereo.store(format.is_stereo(), Ordering::Release);
        self.update_passthrough();
        Ok(())
    }
}
