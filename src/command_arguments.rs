use bit_field::BitField;

/// CMD8 argument, VHS in bits 8..12 and the echo pattern in bits 0..8
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cmd8 {
    pub val: u32,
}

pub const CMD8_PATTERN: u32 = 0xAA;
pub const CMD8_HIGH_VOLTAGE: u32 = 0x1;

impl Cmd8 {
    pub fn set_cmd8_pattern(&mut self, pattern: bool) -> &mut Self {
        self.val.set_bits(0..8, if pattern { CMD8_PATTERN } else { 0 });
        self
    }

    /// 2.7-3.6V
    pub fn set_high_voltage(&mut self, high_voltage: bool) -> &mut Self {
        self.val.set_bits(8..12, if high_voltage { CMD8_HIGH_VOLTAGE } else { 0 });
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BusWidth {
    _1BIT = 1,
    _4BIT = 4,
}

impl BusWidth {
    /// ACMD6 argument
    pub fn acmd6_argument(self) -> u32 {
        match self {
            BusWidth::_1BIT => 0,
            BusWidth::_4BIT => 2,
        }
    }

    /// ACMD42 argument. DAT3 doubles as a data line in 4-bit mode so its pull-up must go.
    pub fn acmd42_argument(self) -> u32 {
        match self {
            BusWidth::_1BIT => 1,
            BusWidth::_4BIT => 0,
        }
    }
}

/// RCA-addressed commands carry the address in the upper half of the argument
pub fn rca_argument(rca: u16) -> u32 {
    (rca as u32) << 16
}
