// SPDX-License-Identifier: LGPL-3.0-or-later

//! Serializable snapshot of the property set.
//!
//! A host can persist [`CrossfeedSettings`] in any serde format and apply
//! it to a filter later.  A named preset and explicit `fcut` / `feed` may
//! both be given; the explicit values override the preset's.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::level::Level;
use crate::params::{CrossfeedParams, Snapshot, DEFAULT_ACTIVE};
use crate::preset::Preset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfeedSettings {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcut: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<f32>,
}

impl Default for CrossfeedSettings {
    fn default() -> Self {
        Self {
            active: DEFAULT_ACTIVE,
            preset: None,
            fcut: None,
            feed: None,
        }
    }
}

impl CrossfeedSettings {
    /// Record the current state of `params`.
    ///
    /// A level that matches a preset is stored by name, anything else as
    /// explicit `fcut` / `feed`.
    pub fn capture(params: &CrossfeedParams) -> Self {
        let Snapshot { active, level } = params.snapshot();
        match Preset::derive(level) {
            Preset::None => Self {
                active,
                preset: None,
                fcut: Some(level.fcut()),
                feed: Some(level.feed()),
            },
            preset => Self {
                active,
                preset: Some(preset),
                fcut: None,
                feed: None,
            },
        }
    }

    /// The level these settings resolve to, starting from `current` for
    /// anything left unspecified.
    pub fn resolve_level(&self, current: Level) -> Result<Level, ParamError> {
        let mut level = match self.preset {
            Some(preset) => preset
                .level()
                .ok_or_else(|| ParamError::InvalidEnum(preset.nick().to_owned()))?,
            None => current,
        };
        if let Some(fcut) = self.fcut {
            level = level.with_fcut(fcut)?;
        }
        if let Some(feed) = self.feed {
            level = level.with_feed(feed)?;
        }
        Ok(level)
    }

    /// Validate everything, then write it.  Nothing is written on error.
    ///
    /// Fields left unspecified keep whatever a concurrent writer stored.
    pub fn apply(&self, params: &CrossfeedParams) -> Result<(), ParamError> {
        let level = params.update_level(|current| self.resolve_level(current))?;
        tracing::debug!(fcut = level.fcut(), feed = level.feed(), "settings applied");
        params.set_active(self.active);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fresh_params_capture_as_default_preset() {
        let params = CrossfeedParams::new();
        let settings = CrossfeedSettings::capture(&params);
        assert!(settings.active);
        assert_eq!(settings.preset, Some(Preset::Default));
        assert_eq!((settings.fcut, settings.feed), (None, None));
    }

    #[test]
    fn explicit_values_override_preset() {
        let params = CrossfeedParams::new();
        let settings = CrossfeedSettings {
            active: true,
            preset: Some(Preset::Jmeier),
            fcut: None,
            feed: Some(6.0),
        };
        settings.apply(&params).unwrap();
        assert_eq!(params.fcut(), 650);
        assert!((params.feed() - 6.0).abs() < f32::EPSILON);
        assert_eq!(params.preset(), Preset::None);
    }

    #[test]
    fn invalid_settings_write_nothing() {
        let params = CrossfeedParams::new();
        let settings = CrossfeedSettings {
            active: false,
            preset: Some(Preset::Cmoy),
            fcut: Some(5000),
            feed: None,
        };
        assert!(settings.apply(&params).is_err());
        assert!(params.active());
        assert_eq!(params.preset(), Preset::Default);

        let settings = CrossfeedSettings {
            preset: Some(Preset::None),
            ..CrossfeedSettings::default()
        };
        assert!(matches!(
            settings.apply(&params),
            Err(ParamError::InvalidEnum(_))
        ));
    }

    #[test]
    fn capture_then_apply_restores_state() {
        let source = CrossfeedParams::new();
        source.set_fcut(999).unwrap();
        source.set_feed(3.3).unwrap();
        source.set_active(false);

        let json = serde_json::to_string(&CrossfeedSettings::capture(&source)).unwrap();
        let settings: CrossfeedSettings = serde_json::from_str(&json).unwrap();

        let target = CrossfeedParams::new();
        settings.apply(&target).unwrap();
        assert_eq!(target.snapshot(), source.snapshot());
    }

    #[test]
    fn named_preset_serializes_by_nick() {
        let params = CrossfeedParams::new();
        params.set_preset(Preset::Cmoy).unwrap();
        let json = serde_json::to_value(CrossfeedSettings::capture(&params)).unwrap();
        assert_eq!(json, serde_json::json!({ "active": true, "preset": "cmoy" }));
    }

    #[test]
    fn apply_keeps_concurrent_fcut_write() {
        let params = Arc::new(CrossfeedParams::new());
        let settings = CrossfeedSettings {
            feed: Some(12.5),
            ..CrossfeedSettings::default()
        };
        let applier = {
            let params = Arc::clone(&params);
            let settings = settings.clone();
            std::thread::spawn(move || {
                for _ in 0..10_000 {
                    settings.apply(&params).unwrap();
                }
            })
        };
        params.set_fcut(1234).unwrap();
        applier.join().unwrap();

        // No apply after the join: the single fcut write must have survived
        // every concurrent apply.
        let level = params.level();
        assert_eq!(level.fcut(), 1234);
        assert_eq!(level.feed_tenths(), 125);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: CrossfeedSettings = serde_json::from_str(r#"{ "fcut": 800 }"#).unwrap();
        assert!(settings.active);
        assert_eq!(settings.preset, None);
        let level = settings.resolve_level(Level::DEFAULT).unwrap();
        assert_eq!(level.fcut(), 800);
        assert_eq!(level.feed_tenths(), 45);
    }
}
