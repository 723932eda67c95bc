use bit_field::BitField;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurrentState {
    Idle,
    Ready,
    Identification,
    StandBy,
    Transfer,
    Data,
    Receive,
    Programming,
    Disconnect,
    Reserved(u8),
}

impl From<u32> for CurrentState {
    fn from(value: u32) -> Self {
        match value {
            0 => CurrentState::Idle,
            1 => CurrentState::Ready,
            2 => CurrentState::Identification,
            3 => CurrentState::StandBy,
            4 => CurrentState::Transfer,
            5 => CurrentState::Data,
            6 => CurrentState::Receive,
            7 => CurrentState::Programming,
            8 => CurrentState::Disconnect,
            other => CurrentState::Reserved(other as u8),
        }
    }
}

/// R1 card status
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CardStatusRegister {
    pub val: u32,
}

impl CardStatusRegister {
    pub fn ready_for_data(&self) -> bool {
        self.val.get_bit(8)
    }

    pub fn current_state(&self) -> CurrentState {
        self.val.get_bits(9..13).into()
    }

    pub fn illegal_command(&self) -> bool {
        self.val.get_bit(22)
    }

    pub fn out_of_range(&self) -> bool {
        self.val.get_bit(31)
    }
}

/// R6, published RCA in the upper half
pub fn published_rca(response: u32) -> u16 {
    response.get_bits(16..32) as u16
}
