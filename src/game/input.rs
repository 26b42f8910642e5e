//! Input Intents
//!
//! Pressed-state movement intents fed into the simulation by the host's
//! input layer. Only the local player is ever driven by input; remote
//! players move by replication. Casting is a separate point-targeted call
//! on the session, edge-detected by the caller.

/// Pressed-state input for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Intent flags (packed bits):
    /// - Bit 0: move left held
    /// - Bit 1: move right held
    /// - Bit 2: jump held
    /// - Bit 3-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Move-left flag bit
    pub const FLAG_LEFT: u8 = 0x01;

    /// Move-right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;

    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;

    /// Create a new idle input frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame from individual pressed states.
    pub const fn from_intents(left: bool, right: bool, jump: bool) -> Self {
        let mut flags = 0;
        if left {
            flags |= Self::FLAG_LEFT;
        }
        if right {
            flags |= Self::FLAG_RIGHT;
        }
        if jump {
            flags |= Self::FLAG_JUMP;
        }
        Self { flags }
    }

    /// Check if move-left is held.
    #[inline]
    pub fn left_held(&self) -> bool {
        self.flags & Self::FLAG_LEFT != 0
    }

    /// Check if move-right is held.
    #[inline]
    pub fn right_held(&self) -> bool {
        self.flags & Self::FLAG_RIGHT != 0
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if this is an idle frame (no intents).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Set or clear the move-left flag.
    pub fn set_left(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_LEFT;
        } else {
            self.flags &= !Self::FLAG_LEFT;
        }
    }

    /// Set or clear the move-right flag.
    pub fn set_right(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_RIGHT;
        } else {
            self.flags &= !Self::FLAG_RIGHT;
        }
    }

    /// Set or clear the jump flag.
    pub fn set_jump(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_JUMP;
        } else {
            self.flags &= !Self::FLAG_JUMP;
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
    fn test_input_frame_default_is_idle() {
        let frame = InputFrame::new();
        assert!(frame.is_idle());
        assert!(!frame.left_held());
        assert!(!frame.right_held());
        assert!(!frame.jump_held());
    }

    #[test]
    fn test_input_frame_from_intents() {
        let frame = InputFrame::from_intents(true, false, true);
        assert!(frame.left_held());
        assert!(!frame.right_held());
        assert!(frame.jump_held());
        assert!(!frame.is_idle());
    }

    #[test]
    fn test_input_frame_set_clear() {
        let mut frame = InputFrame::new();

        frame.set_right(true);
        frame.set_jump(true);
        assert!(frame.right_held());
        assert!(frame.jump_held());

        frame.set_right(false);
        assert!(!frame.right_held());
        assert!(frame.jump_held());

        frame.set_jump(false);
        assert!(frame.is_idle());
    }

    #[test]
    fn test_opposing_intents_can_coexist() {
        // Both directions held is a valid raw state; resolution order
        // is the integrator's concern.
        let frame = InputFrame::from_intents(true, true, false);
        assert!(frame.left_held());
        assert!(frame.right_held());
    }
}
