//! Four-way switch → direction vector → hat switch.

use crate::sink::ReportSink;
use crate::types::{DirectionState, HatValue, PinId};

/// Directional inputs, in physical pin order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Down = 2,
    Up = 3,
}

impl Direction {
    pub const COUNT: usize = 4;
}

/// Pins of the four-way switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionPins {
    pub left: PinId,
    pub right: PinId,
    pub down: PinId,
    pub up: PinId,
}

impl DirectionPins {
    /// Pins indexed by [`Direction`].
    #[must_use]
    pub const fn as_array(&self) -> [PinId; Direction::COUNT] {
        [self.left, self.right, self.down, self.up]
    }
}

/// Sum the four switches into a direction vector.
///
/// `pressed` is indexed by [`Direction`]. Opposite presses cancel out.
#[must_use]
pub fn compute(pressed: [bool; Direction::COUNT]) -> DirectionState {
    let axis = |plus: Direction, minus: Direction| {
        i8::from(pressed[plus as usize]) - i8::from(pressed[minus as usize])
    };
    DirectionState::new(
        axis(Direction::Right, Direction::Left),
        axis(Direction::Down, Direction::Up),
    )
}

/// Tracks the last hat value handed to the sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectionTranslator {
    last_sent: HatValue,
}

impl DirectionTranslator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_sent: HatValue::Centered,
        }
    }

    /// Last hat value forwarded to the sink.
    #[inline]
    #[must_use]
    pub const fn last_sent(&self) -> HatValue {
        self.last_sent
    }

    /// Update the sink's hat if the switch moved.
    ///
    /// Returns `true` when `set_hat` was called.
    pub fn update<S: ReportSink>(&mut self, pressed: [bool; Direction::COUNT], sink: &mut S) -> bool {
        let hat = compute(pressed).hat();
        if hat == self.last_sent {
            return false;
        }

        trace!("hat {:?} -> {:?}", self.last_sent, hat);
        self.last_sent = hat;
        sink.set_hat(hat);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSink, SinkCall};

    fn pressed(dirs: &[Direction]) -> [bool; 4] {
        let mut out = [false; 4];
        for d in dirs {
            out[*d as usize] = true;
        }
        out
    }

    #[test]
    fn test_single_directions() {
        assert_eq!(compute(pressed(&[Direction::Left])), DirectionState::new(-1, 0));
        assert_eq!(compute(pressed(&[Direction::Right])), DirectionState::new(1, 0));
        assert_eq!(compute(pressed(&[Direction::Up])), DirectionState::new(0, -1));
        assert_eq!(compute(pressed(&[Direction::Down])), DirectionState::new(0, 1));
        assert_eq!(compute(pressed(&[])), DirectionState::CENTERED);
    }

    #[test]
    fn test_left_and_up_is_up_left() {
        let state = compute(pressed(&[Direction::Left, Direction::Up]));
        assert_eq!(state, DirectionState::new(-1, -1));
        assert_eq!(state.hat(), HatValue::UpLeft);
    }

    #[test]
    fn test_opposites_cancel() {
        let state = compute(pressed(&[Direction::Left, Direction::Right]));
        assert_eq!(state, DirectionState::CENTERED);

        let state = compute(pressed(&[Direction::Left, Direction::Right, Direction::Down]));
        assert_eq!(state.hat(), HatValue::Down);

        assert_eq!(compute([true; 4]), DirectionState::CENTERED);
    }

    #[test]
    fn test_translator_only_sends_changes() {
        let mut sink = MockSink::connected();
        let mut t = DirectionTranslator::new();

        assert!(!t.update(pressed(&[]), &mut sink));
        assert!(t.update(pressed(&[Direction::Right]), &mut sink));
        assert!(!t.update(pressed(&[Direction::Right]), &mut sink));
        assert!(t.update(pressed(&[Direction::Right, Direction::Down]), &mut sink));
        assert!(t.update(pressed(&[]), &mut sink));

        assert_eq!(
            sink.calls,
            [
                SinkCall::Hat(HatValue::Right),
                SinkCall::Hat(HatValue::DownRight),
                SinkCall::Hat(HatValue::Centered),
            ]
        );
        assert_eq!(t.last_sent(), HatValue::Centered);
    }

    #[test]
    fn test_cancelling_press_from_centered_sends_nothing() {
        let mut sink = MockSink::connected();
        let mut t = DirectionTranslator::new();
        assert!(!t.update(pressed(&[Direction::Up, Direction::Down]), &mut sink));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_pins_follow_direction_order() {
        let pins = DirectionPins {
            left: 3,
            right: 2,
            down: 1,
            up: 0,
        };
        let arr = pins.as_array();
        for d in [Direction::Left, Direction::Right, Direction::Down, Direction::Up] {
            let expected = match d {
                Direction::Left => 3,
                Direction::Right => 2,
                Direction::Down => 1,
                Direction::Up => 0,
            };
            assert_eq!(arr[d as usize], expected);
        }
    }
}
