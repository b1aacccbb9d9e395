// SPDX-License-Identifier: LGPL-3.0-or-later

//! Seam to the coefficient engine and the per-block stage that drives it.
//!
//! The actual crossfeed DSP (coefficient synthesis and filtering) lives
//! behind [`CrossfeedEngine`].  [`CrossfeedStage`] owns the engine and the
//! negotiated format, and decides per block whether the engine runs.

use crate::error::NegotiationError;
use crate::level::Level;
use crate::negotiate::{negotiate, StreamFormat};
use crate::params::CrossfeedParams;

/// Crossfeed DSP implementation.
///
/// Called from the streaming thread only.
pub trait CrossfeedEngine: Send {
    /// Prepare for `format`.  Called once per accepted format.
    fn configure(&mut self, format: &StreamFormat);

    /// Drop filter history, e.g. on a discontinuity.
    fn clear(&mut self);

    /// Process one block of interleaved stereo frames in place.
    ///
    /// `level` is fixed for the whole block.
    fn process(&mut self, level: Level, data: &mut [u8]);
}

/// Engine that leaves samples untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityEngine;

impl CrossfeedEngine for IdentityEngine {
    fn configure(&mut self, _format: &StreamFormat) {}

    fn clear(&mut self) {}

    fn process(&mut self, _level: Level, _data: &mut [u8]) {}
}

/// Outcome of [`CrossfeedStage::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// The engine processed the block.
    Processed,
    /// The block passed through unchanged.
    Bypassed,
}

/// Engine plus negotiated format.
pub struct CrossfeedStage {
    engine: Box<dyn CrossfeedEngine>,
    format: Option<StreamFormat>,
}

impl Default for CrossfeedStage {
    fn default() -> Self {
        Self::new(Box::new(IdentityEngine))
    }
}

impl std::fmt::Debug for CrossfeedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossfeedStage")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl CrossfeedStage {
    pub fn new(engine: Box<dyn CrossfeedEngine>) -> Self {
        Self {
            engine,
            format: None,
        }
    }

    /// Negotiate `format` and prepare the engine for it.
    ///
    /// On rejection the previously accepted format, if any, is kept.
    pub fn configure(&mut self, format: StreamFormat) -> Result<(), NegotiationError> {
        negotiate(&format)?;
        self.engine.configure(&format);
        self.engine.clear();
        self.format = Some(format);
        Ok(())
    }

    /// The accepted format, once negotiation succeeded.
    pub fn format(&self) -> Option<&StreamFormat> {
        self.format.as_ref()
    }

    /// Replace the engine.  A running format is handed to the new engine.
    pub fn set_engine(&mut self, mut engine: Box<dyn CrossfeedEngine>) {
        if let Some(format) = &self.format {
            engine.configure(format);
        }
        self.engine = engine;
    }

    /// Drop engine history.
    pub fn reset(&mut self) {
        self.engine.clear();
    }

    /// Forget the accepted format; the stream has ended.
    pub fn stop(&mut self) {
        self.engine.clear();
        self.format = None;
    }

    /// Whether blocks currently pass through untouched.
    pub fn is_passthrough(&self, active: bool) -> bool {
        !active || !self.format.is_some_and(|f| f.is_stereo())
    }

    /// Run one block.  The parameters are sampled once, up front.
    pub fn process(&mut self, params: &CrossfeedParams, data: &mut [u8]) -> Block {
        if params.take_clear_request() {
            self.engine.clear();
        }
        let snapshot = params.snapshot();
        if self.is_passthrough(snapshot.active) {
            return Block::Bypassed;
        }
        self.engine.process(snapshot.level, data);
        Block::Processed
    }
}
