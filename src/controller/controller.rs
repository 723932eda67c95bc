use embedded_hal::digital::v2::InputPin;

use crate::bus::{Bus, Read};
use crate::card::Card;
use crate::dummy_input_pin::DummyInputPin;

/// Settings come from `BUS::config`, the controller keeps no copy of its own
pub struct Controller<BUS, DETECT> {
    pub card: Card<BUS>,
    pub detect_pin: DETECT,
    /// Card present when the detect line reads low
    pub lower_is_true: bool,
}

impl<BUS: Bus + Read, DETECT: InputPin> Controller<BUS, DETECT> {
    pub fn new(bus: BUS, detect_pin: DETECT, lower_is_true: bool) -> Self {
        Controller { card: Card::new(bus), detect_pin, lower_is_true }
    }

    /// A pin that cannot be read counts as an empty slot
    pub fn card_present(&self) -> bool {
        match self.detect_pin.is_low() {
            Ok(level) => level == self.lower_is_true,
            Err(_) => false,
        }
    }
}

impl<BUS: Bus + Read> Controller<BUS, DummyInputPin> {
    pub fn without_card_detect(bus: BUS) -> Self {
        Self::new(bus, DummyInputPin, true)
    }
}
