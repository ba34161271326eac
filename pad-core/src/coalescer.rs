//! One report per cycle, and only when something changed.

use crate::sink::{ReportSink, SinkError};

/// Dirty flag for the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportCoalescer {
    dirty: bool,
}

impl ReportCoalescer {
    #[must_use]
    pub const fn new() -> Self {
        Self { dirty: false }
    }

    /// Record a state change.
    #[inline]
    pub fn mark(&mut self) {
        self.dirty = true;
    }

    /// Record a state change if `changed`.
    #[inline]
    pub fn mark_if(&mut self, changed: bool) {
        self.dirty |= changed;
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// End the cycle: send one report if anything changed.
    ///
    /// Returns whether a report was sent. The flag is cleared even when the
    /// send fails; the sink keeps the state, so the next change carries it.
    pub async fn flush<S: ReportSink>(&mut self, sink: &mut S) -> Result<bool, SinkError> {
        if !core::mem::take(&mut self.dirty) {
            return Ok(false);
        }
        sink.send_report().await?;
        Ok(true)
    }
}
