// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer plugin providing a headphone crossfeed filter.
//!
//! | Element     | Description                                          |
//! |-------------|------------------------------------------------------|
//! | `crossfeed` | Improve headphone listening of stereo audio records  |
//!
//! The element's properties and format negotiation come from
//! [`crossfeed_core`].  The crossfeed DSP itself is supplied by the host
//! through [`Crossfeed::set_engine`].

use crossfeed_core::CrossfeedEngine;
use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;

mod base;
mod crossfeed;

pub use crossfeed::CrossfeedPreset;

glib::wrapper! {
    /// Public GLib type for the crossfeed element.
    pub struct Crossfeed(ObjectSubclass<crossfeed::Crossfeed>)
        @extends gstreamer_audio::AudioFilter, gstreamer_base::BaseTransform,
                 gstreamer::Element, gstreamer::Object;
}

impl Crossfeed {
    /// Install the engine that processes stereo buffers.
    ///
    /// Takes effect from the next buffer.  If a format is already
    /// negotiated, the engine is configured for it first.
    pub fn set_engine(&self, engine: Box<dyn CrossfeedEngine>) {
        self.imp().set_engine(engine);
    }
}

/// GStreamer plugin entry point.
fn plugin_init(plugin: &gstreamer::Plugin) -> Result<(), glib::BoolError> {
    CrossfeedPreset::static_type().mark_as_plugin_api(gstreamer::PluginAPIFlags::empty());

    gstreamer::Element::register(
        Some(plugin),
        "crossfeed",
        gstreamer::Rank::NONE,
        Crossfeed::static_type(),
    )?;
    Ok(())
}

gstreamer::plugin_define!(
    crossfeed,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION")),
    "LGPL",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_REPOSITORY"),
    "2026-10-17"
);

#[cfg(test)]
mod tests {
    fn init() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            gstreamer::init().expect("Failed to initialize GStreamer");
            super::plugin_register_static().expect("Failed to register crossfeed plugin");
        });
    }

    #[test]
    fn plugin_loads() {
        init();
        let registry = gstreamer::Registry::get();
        let plugin = registry.find_plugin("crossfeed");
        assert!(plugin.is_some(), "crossfeed plugin should be registered");
    }

    #[test]
    fn plugin_license_is_one_gstreamer_accepts() {
        init();
        let plugin = gstreamer::Registry::get()
            .find_plugin("crossfeed")
            .expect("crossfeed plugin");
        assert_eq!(plugin.license().as_str(), "LGPL");
        assert_eq!(plugin.plugin_name().as_str(), "crossfeed");
    }

    #[test]
    fn element_registered_and_creatable() {
        init();
        assert!(gstreamer::ElementFactory::find("crossfeed").is_some());
        let elem = gstreamer::ElementFactory::make("crossfeed").build();
        assert!(elem.is_ok(), "should be able to create element 'crossfeed'");
    }

    #[test]
    fn element_has_correct_metadata() {
        init();
        let factory =
            gstreamer::ElementFactory::find("crossfeed").expect("factory 'crossfeed' not found");
        assert_eq!(factory.metadata("long-name"), Some("Crossfeed effect"));
        assert_eq!(factory.metadata("klass"), Some("Filter/Effect/Audio"));
    }

    #[test]
    fn element_has_pad_templates() {
        init();
        let factory =
            gstreamer::ElementFactory::find("crossfeed").expect("factory 'crossfeed' not found");
        let templates = factory.static_pad_templates();
        let directions: Vec<_> = templates.iter().map(|t| t.direction()).collect();
        assert!(directions.contains(&gstreamer::PadDirection::Src));
        assert!(directions.contains(&gstreamer::PadDirection::Sink));
    }
}
