use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Buttons held this tick. Any combination is legal.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Input: u8 {
        const WALKED_RIGHT = 1 << 0;
        const WALKED_LEFT  = 1 << 1;
        const CLIMBED_UP   = 1 << 2;
        const CLIMBED_DOWN = 1 << 3;
        const RUNNING      = 1 << 4;
        const JUMPED       = 1 << 5;

        /// Either walk direction.
        const WALKED  = Self::WALKED_RIGHT.bits() | Self::WALKED_LEFT.bits();
        /// Either climb direction.
        const CLIMBED = Self::CLIMBED_UP.bits() | Self::CLIMBED_DOWN.bits();
    }
}

/// Physical keys the default keyboard layout binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    D,
    W,
    S,
    Space,
    Shift,
}

impl Key {
    pub fn input(self) -> Input {
        match self {
            Key::A => Input::WALKED_LEFT,
            Key::D => Input::WALKED_RIGHT,
            Key::W => Input::CLIMBED_UP,
            Key::S => Input::CLIMBED_DOWN,
            Key::Space => Input::JUMPED,
            Key::Shift => Input::RUNNING,
        }
    }
}

impl Input {
    /// Discretizes the set of currently pressed keys.
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        keys.into_iter().fold(Input::empty(), |acc, k| acc | k.input())
    }

    #[inline]
    pub fn walking(self) -> bool {
        self.intersects(Input::WALKED)
    }

    /// Both walk directions held at once.
    #[inline]
    pub fn walking_both(self) -> bool {
        self.contains(Input::WALKED)
    }

    #[inline]
    pub fn running(self) -> bool {
        self.contains(Input::RUNNING)
    }

    #[inline]
    pub fn jumped(self) -> bool {
        self.contains(Input::JUMPED)
    }

    #[inline]
    pub fn climbing_up(self) -> bool {
        self.contains(Input::CLIMBED_UP)
    }

    #[inline]
    pub fn climbing_down(self) -> bool {
        self.contains(Input::CLIMBED_DOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_flags() {
        let input = Input::from_keys([Key::A, Key::D, Key::Shift]);
        assert!(input.walking_both());
        assert!(input.running());
        assert!(!input.jumped());
        assert_eq!(Input::from_keys([]), Input::empty());
        assert_eq!(Input::from_keys([Key::W, Key::S]), Input::CLIMBED);
    }

    #[test]
    fn wire_bits_are_stable() {
        assert_eq!(Input::from_bits_truncate(0b10_0001), Input::WALKED_RIGHT | Input::JUMPED);
        assert_eq!(Input::from_bits_truncate(0xc0), Input::empty());
    }
}
