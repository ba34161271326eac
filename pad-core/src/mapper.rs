//! Button channel → logical button routing.

use crate::sink::ReportSink;
use crate::types::Edge;

/// Number of buttons in the special (system) bank.
pub const SPECIAL_BUTTON_COUNT: u8 = 8;

/// Highest standard button id a report can carry.
pub const MAX_STANDARD_BUTTONS: u8 = 64;

/// Links one debounced button channel to a logical button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMapping {
    /// Index into the button channel table.
    pub channel: usize,
    /// Logical id: 1-based for standard buttons, 0-based bank slot for specials.
    pub id: u8,
    /// Route to the special button bank instead of the numbered buttons.
    pub special: bool,
}

impl ButtonMapping {
    #[must_use]
    pub const fn standard(channel: usize, id: u8) -> Self {
        Self {
            channel,
            id,
            special: false,
        }
    }

    #[must_use]
    pub const fn special(channel: usize, id: u8) -> Self {
        Self {
            channel,
            id,
            special: true,
        }
    }

    /// Forward one edge of this button to the sink.
    ///
    /// Returns `true` when the sink state changed.
    pub fn dispatch<S: ReportSink>(&self, edge: Edge, sink: &mut S) -> bool {
        match (edge, self.special) {
            (Edge::None, _) => return false,
            (Edge::Fell, false) => sink.press(self.id),
            (Edge::Fell, true) => sink.press_special(self.id),
            (Edge::Rose, false) => sink.release(self.id),
            (Edge::Rose, true) => sink.release_special(self.id),
        }
        trace!(
            "button {} (special={}) {:?}",
            self.id,
            self.special,
            edge
        );
        true
    }
}

/// The full mapping table, one entry per button channel.
#[derive(Clone, Copy, Debug)]
pub struct ButtonMapper<const N: usize> {
    mappings: [ButtonMapping; N],
}

impl<const N: usize> ButtonMapper<N> {
    /// Wrap a table that has already passed
    /// [`PadConfig::validate`](crate::config::PadConfig::validate).
    #[must_use]
    pub const fn new(mappings: [ButtonMapping; N]) -> Self {
        Self { mappings }
    }

    /// Route one edge per channel to the sink.
    ///
    /// Returns `true` if at least one press or release was emitted. A mapping
    /// whose channel is out of range never fires.
    pub fn apply<S: ReportSink>(&self, edges: &[Edge; N], sink: &mut S) -> bool {
        let mut changed = false;
        for mapping in &self.mappings {
            let edge = edges.get(mapping.channel).copied().unwrap_or_default();
            changed |= mapping.dispatch(edge, sink);
        }
        changed
    }

    /// Highest standard button id in the table.
    #[must_use]
    pub fn button_count(&self) -> u8 {
        self.mappings
            .iter()
            .filter(|m| !m.special)
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
    }

    /// One bit per special bank slot in use. Slots past the bank are ignored.
    #[must_use]
    pub fn special_mask(&self) -> u8 {
        self.mappings
            .iter()
            .filter(|m| m.special)
            .filter_map(|m| 1u8.checked_shl(u32::from(m.id)))
            .fold(0u8, |mask, bit| mask | bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSink, SinkCall};

    fn mapper() -> ButtonMapper<3> {
        ButtonMapper::new([
            ButtonMapping::standard(0, 1),
            ButtonMapping::standard(1, 8),
            ButtonMapping::special(2, 3),
        ])
    }

    #[test]
    fn test_fell_presses_and_rose_releases() {
        let mut sink = MockSink::connected();
        let m = mapper();

        assert!(m.apply(&[Edge::Fell, Edge::None, Edge::None], &mut sink));
        assert!(m.apply(&[Edge::Rose, Edge::None, Edge::None], &mut sink));
        assert_eq!(sink.calls, [SinkCall::Press(1), SinkCall::Release(1)]);
    }

    #[test]
    fn test_special_buttons_use_special_bank() {
        let mut sink = MockSink::connected();
        let m = mapper();

        m.apply(&[Edge::None, Edge::None, Edge::Fell], &mut sink);
        m.apply(&[Edge::None, Edge::None, Edge::Rose], &mut sink);
        assert_eq!(
            sink.calls,
            [SinkCall::PressSpecial(3), SinkCall::ReleaseSpecial(3)]
        );
    }

    #[test]
    fn test_no_edges_no_calls() {
        let mut sink = MockSink::connected();
        assert!(!mapper().apply(&[Edge::None; 3], &mut sink));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_simultaneous_edges_on_different_channels() {
        let mut sink = MockSink::connected();
        assert!(mapper().apply(&[Edge::Fell, Edge::Rose, Edge::Fell], &mut sink));
        assert_eq!(
            sink.calls,
            [
                SinkCall::Press(1),
                SinkCall::Release(8),
                SinkCall::PressSpecial(3)
            ]
        );
    }

    #[test]
    fn test_mapping_follows_channel_not_position() {
        let m = ButtonMapper::new([ButtonMapping::standard(1, 5), ButtonMapping::standard(0, 6)]);
        let mut sink = MockSink::connected();
        m.apply(&[Edge::Fell, Edge::None], &mut sink);
        assert_eq!(sink.calls, [SinkCall::Press(6)]);
    }

    #[test]
    fn test_derived_counts() {
        let m = mapper();
        assert_eq!(m.button_count(), 8);
        assert_eq!(m.special_mask(), 0b0000_1000);
    }

    #[test]
    fn test_unvalidated_table_does_not_panic() {
        let m = ButtonMapper::new([ButtonMapping::special(0, 8), ButtonMapping::standard(7, 2)]);
        assert_eq!(m.special_mask(), 0);

        let mut sink = MockSink::connected();
        assert!(m.apply(&[Edge::Fell, Edge::Fell], &mut sink));
        assert_eq!(sink.calls, [SinkCall::PressSpecial(8)]);
    }
}
