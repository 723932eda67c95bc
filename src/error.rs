use core::fmt;

use embedded_error::mci::{CommandOrDataError, MciError, SetupError};
use embedded_error::ImplError;

/// Failure of a single command/response exchange.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// CMDRDY never came up within the poll budget, or the controller flagged RTOE
    ResponseTimeout,
    /// RCRCE on a response type that carries a real CRC
    CrcError,
    /// Any other bit of the MCI error mask (index, direction, end bit, data path)
    ResponseError(u32),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::ResponseTimeout => write!(f, "Response timeout"),
            CommandError::CrcError => write!(f, "Response CRC error"),
            CommandError::ResponseError(status) => write!(f, "Response error: SR=0x{:08X}", status),
        }
    }
}

impl From<CommandError> for MciError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::ResponseTimeout => MciError::CommandError(CommandOrDataError::Timeout),
            CommandError::CrcError => MciError::CommandError(CommandOrDataError::Crc),
            CommandError::ResponseError(_) => MciError::CommandError(CommandOrDataError::Index),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitError {
    /// Card detect line reports an empty slot
    NoCard,
    /// CMD0 was not accepted by the controller
    ResetFailed(CommandError),
    /// SEND_IF_COND failed or echoed a different pattern. Never returned from
    /// `init`, the card is simply treated as pre-v2.0.
    ProbeInconclusive,
    /// ACMD41 never reported power-up done within the retry budget
    PowerUpTimeout,
    /// CMD55/ACMD41 exchange itself failed
    PowerUpFailed(CommandError),
    IdentificationFailed(CommandError),
    AddressingFailed(CommandError),
    CsdFetchFailed(CommandError),
    SelectFailed(CommandError),
    BusWidthNegotiationFailed(CommandError),
    BlockLengthSetFailed(CommandError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoCard => write!(f, "No card detected"),
            InitError::ResetFailed(e) => write!(f, "GO_IDLE_STATE failed: {}", e),
            InitError::ProbeInconclusive => write!(f, "SEND_IF_COND probe inconclusive"),
            InitError::PowerUpTimeout => write!(f, "Card power-up timeout"),
            InitError::PowerUpFailed(e) => write!(f, "SD_SEND_OP_COND failed: {}", e),
            InitError::IdentificationFailed(e) => write!(f, "ALL_SEND_CID failed: {}", e),
            InitError::AddressingFailed(e) => write!(f, "SET_RELATIVE_ADDR failed: {}", e),
            InitError::CsdFetchFailed(e) => write!(f, "SEND_CSD failed: {}", e),
            InitError::SelectFailed(e) => write!(f, "SELECT_CARD failed: {}", e),
            InitError::BusWidthNegotiationFailed(e) => write!(f, "Bus width negotiation failed: {}", e),
            InitError::BlockLengthSetFailed(e) => write!(f, "SET_BLOCKLEN failed: {}", e),
        }
    }
}

impl From<InitError> for MciError {
    fn from(error: InitError) -> Self {
        match error {
            InitError::NoCard => MciError::NoCard,
            InitError::ProbeInconclusive => MciError::Impl(ImplError::InvalidConfiguration),
            InitError::PowerUpTimeout => MciError::Impl(ImplError::TimedOut),
            InitError::BusWidthNegotiationFailed(_) => MciError::Setup(SetupError::CouldNotSetBusWidth),
            InitError::SelectFailed(_) => MciError::CouldNotSelectDevice,
            InitError::ResetFailed(e)
            | InitError::PowerUpFailed(e)
            | InitError::IdentificationFailed(e)
            | InitError::AddressingFailed(e)
            | InitError::CsdFetchFailed(e)
            | InitError::BlockLengthSetFailed(e) => e.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// Driver is not initialized, is mid-transfer, or the card did not report READY_FOR_DATA
    NotReady,
    /// SEND_STATUS or READ_SINGLE_BLOCK was refused
    CommandRejected(CommandError),
    /// The data phase reported an error or never filled the receive buffer
    TransferError,
    /// Destination cannot hold `count * 512` bytes
    BufferTooSmall,
    /// Block range does not fit the 32-bit card address
    OutOfRange,
}

impl ReadError {
    /// Nonzero status handed back through the legacy entry points
    pub fn code(&self) -> i32 {
        match self {
            ReadError::NotReady => 1,
            ReadError::CommandRejected(_) => 2,
            ReadError::TransferError => 3,
            ReadError::BufferTooSmall => 4,
            ReadError::OutOfRange => 5,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NotReady => write!(f, "Card not ready for data"),
            ReadError::CommandRejected(e) => write!(f, "Read command rejected: {}", e),
            ReadError::TransferError => write!(f, "Data transfer error"),
            ReadError::BufferTooSmall => write!(f, "Destination buffer too small"),
            ReadError::OutOfRange => write!(f, "Block address out of range"),
        }
    }
}

impl From<ReadError> for MciError {
    fn from(error: ReadError) -> Self {
        match error {
            ReadError::CommandRejected(e) => e.into(),
            ReadError::BufferTooSmall => MciError::Impl(ImplError::InvalidConfiguration),
            ReadError::NotReady | ReadError::TransferError | ReadError::OutOfRange => {
                MciError::ReadError
            }
        }
    }
}
