//! # Progress Reporting
//!
//! The miner notifies a [`ProgressLogger`] collaborator at every loop
//! boundary. Reporting is purely observational: no implementation may affect
//! the algorithm's outcome, and the core carries no logging dependency — the
//! binary wires these callbacks into `tracing`.

use std::io::Write;

// =============================================================================
// PROGRESS STEPS
// =============================================================================

/// The loop events the miner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    /// Enumeration is starting.
    Start,
    /// Enumeration has finished.
    Stop,
    /// One outer Next-Closure iteration.
    Outer,
    /// An outer extent passed its support threshold.
    OuterSuccess,
    /// One inner Next-Closure iteration.
    Inner,
    /// An inner (intent, modus) pair was validated and emitted.
    InnerSuccess,
}

impl ProgressStep {
    /// Single-character tag, for compact progress streams.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            ProgressStep::Start => 's',
            ProgressStep::Stop => 'S',
            ProgressStep::Outer => 'o',
            ProgressStep::OuterSuccess => 'O',
            ProgressStep::Inner => 'i',
            ProgressStep::InnerSuccess => 'I',
        }
    }
}

// =============================================================================
// PROGRESS LOGGER TRAIT
// =============================================================================

/// Observer of the enumeration's progress.
pub trait ProgressLogger {
    /// Announce the number of outer domain values before the loop starts.
    fn set_max(&mut self, _max: u32) {}

    /// One loop event.
    fn step(&mut self, step: ProgressStep);

    /// Smallest element of the current outer candidate, as a domain value.
    fn extent_element(&mut self, _value: u32) {}
}

impl<P: ProgressLogger + ?Sized> ProgressLogger for Box<P> {
    fn set_max(&mut self, max: u32) {
        (**self).set_max(max);
    }

    fn step(&mut self, step: ProgressStep) {
        (**self).step(step);
    }

    fn extent_element(&mut self, value: u32) {
        (**self).extent_element(value);
    }
}

/// Discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressLogger for NoopProgress {
    fn step(&mut self, _step: ProgressStep) {}
}

/// Writes one tag character per event to a stream, flushing on the
/// success/stop events. Write failures are swallowed: progress output must
/// never fail the mining run.
#[derive(Debug)]
pub struct TagProgress<W: Write> {
    writer: W,
}

impl<W: Write> TagProgress<W> {
    /// Wrap a stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ProgressLogger for TagProgress<W> {
    fn step(&mut self, step: ProgressStep) {
        let _ = write!(self.writer, "{}", step.tag());
        if matches!(
            step,
            ProgressStep::OuterSuccess | ProgressStep::InnerSuccess | ProgressStep::Stop
        ) {
            let _ = self.writer.flush();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct() {
        let steps = [
            ProgressStep::Start,
            ProgressStep::Stop,
            ProgressStep::Outer,
            ProgressStep::OuterSuccess,
            ProgressStep::Inner,
            ProgressStep::InnerSuccess,
        ];
        let tags: std::collections::BTreeSet<char> = steps.iter().map(|s| s.tag()).collect();
        assert_eq!(tags.len(), steps.len());
    }

    #[test]
    fn tag_progress_writes_chars() {
        let mut buf = Vec::new();
        {
            let mut progress = TagProgress::new(&mut buf);
            progress.set_max(10);
            progress.step(ProgressStep::Start);
            progress.step(ProgressStep::Outer);
            progress.extent_element(3);
            progress.step(ProgressStep::OuterSuccess);
            progress.step(ProgressStep::Stop);
        }
        assert_eq!(buf, b"soOS");
    }
}
