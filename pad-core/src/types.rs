//! Core pad types: PinId, Edge, DirectionState, HatValue.

/// GPIO number as understood by the board's pin bank.
pub type PinId = u8;

/// One-cycle notification that a debounced level just changed.
///
/// Inputs are wired active-low, so [`Edge::Fell`] is a press and
/// [`Edge::Rose`] is a release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Stable level unchanged this cycle.
    #[default]
    None,
    /// Stable level went low → high.
    Rose,
    /// Stable level went high → low.
    Fell,
}

/// Signed directional intent on two axes.
///
/// Each axis is one of -1, 0, 1. `y` is -1 for up and +1 for down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionState {
    pub x: i8,
    pub y: i8,
}

impl DirectionState {
    /// Nothing pressed, or every press cancelled out.
    pub const CENTERED: Self = Self { x: 0, y: 0 };

    /// Build a state, clamping each axis into -1..=1.
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// The hat position this state points at.
    #[must_use]
    pub const fn hat(self) -> HatValue {
        match (self.x, self.y) {
            (0, -1) => HatValue::Up,
            (0, 1) => HatValue::Down,
            (-1, 0) => HatValue::Left,
            (1, 0) => HatValue::Right,
            (-1, -1) => HatValue::UpLeft,
            (1, -1) => HatValue::UpRight,
            (-1, 1) => HatValue::DownLeft,
            (1, 1) => HatValue::DownRight,
            _ => HatValue::Centered,
        }
    }
}

const fn clamp_axis(v: i8) -> i8 {
    if v < 0 {
        -1
    } else if v > 0 {
        1
    } else {
        0
    }
}

/// Hat switch position.
///
/// The discriminant is the usual game-controller wire value: 0 for centered,
/// then 1..=8 clockwise starting at up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HatValue {
    #[default]
    Centered = 0,
    Up = 1,
    UpRight = 2,
    Right = 3,
    DownRight = 4,
    Down = 5,
    DownLeft = 6,
    Left = 7,
    UpLeft = 8,
}

impl HatValue {
    /// Raw wire value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

impl From<DirectionState> for HatValue {
    fn from(state: DirectionState) -> Self {
        state.hat()
    }
}
