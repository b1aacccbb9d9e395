// SPDX-License-Identifier: LGPL-3.0-or-later

//! The crossfeed property set.
//!
//! [`CrossfeedParams`] owns the four properties (`active`, `fcut`, `feed`,
//! `preset`).  Reads and writes take `&self` and are lock-free, so a control
//! thread can change them while a streaming thread takes one [`Snapshot`]
//! per buffer.
//!
//! [`PROPERTIES`] is the static descriptor table hosts use for
//! introspection (names, nicks, ranges, defaults, flags).

use std::ops::BitOr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::ParamError;
use crate::level::{Level, DEFAULT_FCUT, DEFAULT_FEED, MAX_FCUT, MAX_FEED, MIN_FCUT, MIN_FEED};
use crate::preset::Preset;

/// Default for the `active` property.
pub const DEFAULT_ACTIVE: bool = true;

// ── Descriptor table ────────────────────────────────────────────────

/// The four properties of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Active,
    Fcut,
    Feed,
    Preset,
}

impl Property {
    /// All properties, in table order.
    pub const ALL: [Property; 4] = [
        Property::Active,
        Property::Fcut,
        Property::Feed,
        Property::Preset,
    ];

    /// Descriptor of this property.
    pub fn spec(self) -> &'static PropertySpec {
        &PROPERTIES[self as usize]
    }

    /// Property name as exposed to hosts.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look a property up by its exposed name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Property flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyFlags(u32);

impl PropertyFlags {
    pub const READABLE: Self = Self(1 << 0);
    pub const WRITABLE: Self = Self(1 << 1);
    /// Descriptive strings are compile-time constants.
    pub const STATIC_STRINGS: Self = Self(1 << 2);
    /// Suitable for time-varying control.
    pub const CONTROLLABLE: Self = Self(1 << 3);

    pub const READWRITE: Self = Self(Self::READABLE.0 | Self::WRITABLE.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Value type, default and range of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    Boolean { default: bool },
    Int { min: i32, max: i32, default: i32 },
    Float { min: f32, max: f32, default: f32 },
    Enum { default: Preset },
}

/// Static description of one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub property: Property,
    pub name: &'static str,
    pub nick: &'static str,
    pub blurb: &'static str,
    pub kind: PropertyKind,
    pub flags: PropertyFlags,
}

impl PropertySpec {
    /// Default value as a [`PropertyValue`].
    pub fn default_value(&self) -> PropertyValue {
        match self.kind {
            PropertyKind::Boolean { default } => PropertyValue::Active(default),
            PropertyKind::Int { default, .. } => PropertyValue::Fcut(default),
            PropertyKind::Float { default, .. } => PropertyValue::Feed(default),
            PropertyKind::Enum { default } => PropertyValue::Preset(default),
        }
    }
}

const FLAGS: PropertyFlags = PropertyFlags::READWRITE
    .union(PropertyFlags::STATIC_STRINGS)
    .union(PropertyFlags::CONTROLLABLE);

/// Descriptor table, indexed by [`Property`].
pub static PROPERTIES: [PropertySpec; 4] = [
    PropertySpec {
        property: Property::Active,
        name: "active",
        nick: "Active",
        blurb: "Specify whether the filter is active",
        kind: PropertyKind::Boolean {
            default: DEFAULT_ACTIVE,
        },
        flags: FLAGS,
    },
    PropertySpec {
        property: Property::Fcut,
        name: "fcut",
        nick: "Frequency cut",
        blurb: "Lowpass filter cut frequency (Hz)",
        kind: PropertyKind::Int {
            min: MIN_FCUT,
            max: MAX_FCUT,
            default: DEFAULT_FCUT,
        },
        flags: FLAGS,
    },
    PropertySpec {
        property: Property::Feed,
        name: "feed",
        nick: "Feed level",
        blurb: "Feed Level (db)",
        kind: PropertyKind::Float {
            min: MIN_FEED,
            max: MAX_FEED,
            default: DEFAULT_FEED,
        },
        flags: FLAGS,
    },
    PropertySpec {
        property: Property::Preset,
        name: "preset",
        nick: "Preset",
        blurb: "Bs2b filter preset",
        kind: PropertyKind::Enum {
            default: Preset::Default,
        },
        flags: FLAGS,
    },
];

// ── Values ──────────────────────────────────────────────────────────

/// A typed property value.  The variant names the property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Active(bool),
    Fcut(i32),
    Feed(f32),
    Preset(Preset),
}

impl PropertyValue {
    /// The property this value belongs to.
    pub fn property(&self) -> Property {
        match self {
            PropertyValue::Active(_) => Property::Active,
            PropertyValue::Fcut(_) => Property::Fcut,
            PropertyValue::Feed(_) => Property::Feed,
            PropertyValue::Preset(_) => Property::Preset,
        }
    }
}

/// What the streaming thread sees for one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub active: bool,
    pub level: Level,
}

// ── Property set ────────────────────────────────────────────────────

/// Live property set of one filter instance.
#[derive(Debug)]
pub struct CrossfeedParams {
    active: AtomicBool,
    level: AtomicU32,
    /// Set when the filter is deactivated; the streaming thread clears the
    /// engine history before its next buffer.
    clear_pending: AtomicBool,
}

impl Default for CrossfeedParams {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossfeedParams {
    /// A property set holding the defaults.
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(DEFAULT_ACTIVE),
            level: AtomicU32::new(Level::DEFAULT.bits()),
            clear_pending: AtomicBool::new(false),
        }
    }

    pub fn active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        let was = self.active.swap(active, Ordering::AcqRel);
        if was && !active {
            self.clear_pending.store(true, Ordering::Release);
        }
        tracing::debug!(active, "crossfeed active changed");
    }

    /// Current `(fcut, feed)` pair.
    pub fn level(&self) -> Level {
        Level::from_bits(self.level.load(Ordering::Acquire))
    }

    /// Store a validated pair in one write, replacing whatever is there.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.bits(), Ordering::Release);
        tracing::debug!(fcut = level.fcut(), feed = level.feed(), "crossfeed level changed");
    }

    pub fn fcut(&self) -> i32 {
        self.level().fcut()
    }

    /// Fails with [`ParamError::OutOfRange`] outside 300..=2000 Hz.
    pub fn set_fcut(&self, fcut: i32) -> Result<(), ParamError> {
        let level = self.update_level(|level| level.with_fcut(fcut))?;
        tracing::debug!(fcut, preset = %Preset::derive(level), "crossfeed fcut changed");
        Ok(())
    }

    pub fn feed(&self) -> f32 {
        self.level().feed()
    }

    /// Fails with [`ParamError::OutOfRange`] outside 1.0..=15.0 dB.
    pub fn set_feed(&self, feed: f32) -> Result<(), ParamError> {
        let level = self.update_level(|level| level.with_feed(feed))?;
        tracing::debug!(feed, preset = %Preset::derive(level), "crossfeed feed changed");
        Ok(())
    }

    /// The effective preset, derived from the current level.
    pub fn preset(&self) -> Preset {
        Preset::derive(self.level())
    }

    /// Write both `fcut` and `feed` from the preset table.
    ///
    /// [`Preset::None`] has no table entry and is rejected with
    /// [`ParamError::InvalidEnum`].
    pub fn set_preset(&self, preset: Preset) -> Result<(), ParamError> {
        let level = preset
            .level()
            .ok_or_else(|| ParamError::InvalidEnum(preset.nick().to_owned()))?;
        self.level.store(level.bits(), Ordering::Release);
        tracing::debug!(%preset, "crossfeed preset applied");
        Ok(())
    }

    /// Like [`set_preset`](Self::set_preset), addressing the preset by index.
    pub fn set_preset_index(&self, index: u32) -> Result<(), ParamError> {
        self.set_preset(Preset::from_index(index)?)
    }

    /// Write one property.
    pub fn set(&self, value: PropertyValue) -> Result<(), ParamError> {
        match value {
            PropertyValue::Active(active) => {
                self.set_active(active);
                Ok(())
            }
            PropertyValue::Fcut(fcut) => self.set_fcut(fcut),
            PropertyValue::Feed(feed) => self.set_feed(feed),
            PropertyValue::Preset(preset) => self.set_preset(preset),
        }
    }

    /// Read one property.  `preset` is derived on every read.
    pub fn get(&self, property: Property) -> PropertyValue {
        match property {
            Property::Active => PropertyValue::Active(self.active()),
            Property::Fcut => PropertyValue::Fcut(self.fcut()),
            Property::Feed => PropertyValue::Feed(self.feed()),
            Property::Preset => PropertyValue::Preset(self.preset()),
        }
    }

    /// Consistent view for one processing block.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active: self.active(),
            level: self.level(),
        }
    }

    /// Consume a pending history-clear request.
    pub fn take_clear_request(&self) -> bool {
        self.clear_pending.swap(false, Ordering::AcqRel)
    }

    /// Apply `f` to the stored level without losing a concurrent write to the
    /// other half of the pair.
    pub(crate) fn update_level(
        &self,
        f: impl Fn(Level) -> Result<Level, ParamError>,
    ) -> Result<Level, ParamError> {
        let mut current = self.level.load(Ordering::Acquire);
        loop {
            let next = f(Level::from_bits(current))?;
            match self.level.compare_exchange_weak(
                current,
                next.bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(next),
                Err(actual) => current = actual,
            }
        }
    }
}
