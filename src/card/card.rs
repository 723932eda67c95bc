use bit_field::BitField;

use crate::command_arguments::BusWidth;
use crate::registers::csd::CsdInfo;

/// Capability flags, written once per initialization
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Type(u8);

impl Type {
    pub fn set_unknown(&mut self) -> &mut Self {
        self.0 = 0x0;
        self
    }

    /// Card echoed SEND_IF_COND
    pub fn set_sd_v2(&mut self, v2: bool) -> &mut Self {
        self.0.set_bit(1, v2);
        self
    }

    pub fn sd_v2(&self) -> bool {
        self.0.get_bit(1)
    }

    pub fn set_high_capacity(&mut self, hc: bool) -> &mut Self {
        self.0.set_bit(4, hc);
        self
    }

    /// Block addressing. Only a v2.0 card can be high capacity.
    pub fn high_capacity(&self) -> bool {
        self.sd_v2() && self.0.get_bit(4)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    IdleCommanded,
    CapabilityProbed,
    PoweredUp,
    Identified,
    Addressed,
    BlockLengthSet,
    Ready,
}

/// Whether a block is in flight
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    RxSingleBlock,
}

/// Device context of the one card behind a bus
pub struct Card<BUS> {
    pub bus: BUS,
    /// Relative card address
    pub rca: u16,
    pub state: State,
    pub transfer: TransferState,
    pub card_type: Type,
    /// Number of DATA lines on bus
    pub bus_width: BusWidth,
    /// READ_BL_LEN exponent
    pub read_bl_len: u8,
    pub csd: Option<CsdInfo>,
    /// Card capacity in bytes
    pub capacity: u64,
}

impl<BUS> Card<BUS> {
    pub fn new(bus: BUS) -> Self {
        Self {
            bus,
            rca: 0,
            state: State::Uninitialized,
            transfer: TransferState::Idle,
            card_type: Type::default(),
            bus_width: BusWidth::_1BIT,
            read_bl_len: 0,
            csd: None,
            capacity: 0,
        }
    }

    /// Forget everything learned from the card, the bus is untouched
    pub fn reset(&mut self) {
        self.rca = 0;
        self.state = State::Uninitialized;
        self.transfer = TransferState::Idle;
        self.card_type.set_unknown();
        self.bus_width = BusWidth::_1BIT;
        self.read_bl_len = 0;
        self.csd = None;
        self.capacity = 0;
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready && self.transfer == TransferState::Idle
    }
}
