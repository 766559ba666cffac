//! Last decoded channel values.

/// Channel values as of the last decoded packet.
///
/// Replaced as a whole on every packet, so the six fields always come from
/// the same packet (or are all startup defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// CH1, mapped into the roll range
    pub roll: u8,
    /// CH2, mapped into the pitch range
    pub pitch: u8,
    /// CH3, mapped into the yaw range
    pub yaw: u8,
    /// CH4, mapped into the trim range
    pub trim: u8,
    /// CH5, raw passthrough
    pub aux1: u8,
    /// CH6, raw passthrough
    pub aux2: u8,
}

/// Startup value of the proportional channels
pub const NEUTRAL_VALUE: u8 = 90;

/// Startup value of the discrete channels
pub const DISCRETE_DEFAULT: u8 = 1;

impl Default for ChannelState {
    fn default() -> Self {
        Self::neutral(NEUTRAL_VALUE, DISCRETE_DEFAULT)
    }
}

impl ChannelState {
    /// State held before any packet has arrived.
    #[must_use]
    pub fn neutral(proportional: u8, discrete: u8) -> Self {
        Self {
            roll: proportional,
            pitch: proportional,
            yaw: proportional,
            trim: proportional,
            aux1: discrete,
            aux2: discrete,
        }
    }

    /// Proportional values in actuator order (servo 1..4).
    #[must_use]
    pub fn proportional(&self) -> [u8; 4] {
        [self.roll, self.pitch, self.yaw, self.trim]
    }

    /// Discrete values (CH5, CH6).
    #[must_use]
    pub fn discrete(&self) -> [u8; 2] {
        [self.aux1, self.aux2]
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ch1: {}, ch2: {}, ch3: {}, ch4: {}, ch5: {}, ch6: {}",
            self.roll, self.pitch, self.yaw, self.trim, self.aux1, self.aux2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let state = ChannelState::default();
        assert_eq!(state.proportional(), [90; 4]);
        assert_eq!(state.discrete(), [1, 1]);
    }

    #[test]
    fn test_display_lists_all_channels() {
        let state = ChannelState {
            roll: 10,
            pitch: 170,
            yaw: 90,
            trim: 67,
            aux1: 1,
            aux2: 0,
        };
        assert_eq!(
            state.to_string(),
            "ch1: 10, ch2: 170, ch3: 90, ch4: 67, ch5: 1, ch6: 0"
        );
    }
}
