use bit_field::BitField;

use crate::command_flags::{
    CommandFlag, CMDR_INDEX_MASK, CMDR_RSPTYP_136, CMDR_RSPTYP_48, CMDR_RSPTYP_NONE,
    CMDR_RSPTYP_SHIFT,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Response {
    None,
    R1,
    R1b,
    /// CID or CSD, 136 bits
    R2,
    /// OCR, no CRC protection
    R3,
    /// Published RCA
    R6,
    /// Card interface condition
    R7,
}

impl Response {
    fn rsptyp(self) -> u32 {
        match self {
            Response::None => CMDR_RSPTYP_NONE,
            Response::R2 => CMDR_RSPTYP_136,
            _ => CMDR_RSPTYP_48,
        }
    }

    /// R3 is sent with all ones in the CRC field, the controller always flags RCRCE
    pub fn has_crc(self) -> bool {
        self != Response::R3
    }
}

/// A command index with the metadata the MCI needs to frame it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub index: u8,
    pub response: Response,
    pub flags: CommandFlag,
}

impl Command {
    pub const fn new(index: u8, response: Response, flags: CommandFlag) -> Self {
        Self { index, response, flags }
    }
}

impl From<Command> for u32 {
    fn from(command: Command) -> u32 {
        let mut word = command.flags.bits();
        word.set_bits(0..CMDR_RSPTYP_SHIFT as usize, command.index as u32 & CMDR_INDEX_MASK);
        word.set_bits(CMDR_RSPTYP_SHIFT as usize..8, command.response.rsptyp());
        word
    }
}

/// 74 clock cycles on the CMD line before the first command
pub const SDMMC_INIT_CLOCKS: Command = Command::new(0, Response::None, CommandFlag::INIT);
/// CMD0, reset to idle state
pub const SDMMC_CMD0_GO_IDLE_STATE: Command =
    Command::new(0, Response::None, CommandFlag::empty());
/// CMD2, ask any card to send its CID
pub const SDMMC_CMD2_ALL_SEND_CID: Command =
    Command::new(2, Response::R2, CommandFlag::empty());
/// CMD3, card publishes a new relative address
pub const SD_CMD3_SEND_RELATIVE_ADDR: Command =
    Command::new(3, Response::R6, CommandFlag::MAX_LATENCY);
/// CMD7, toggle the addressed card between stand-by and transfer state
pub const SDMMC_CMD7_SELECT_CARD_CMD: Command =
    Command::new(7, Response::R1b, CommandFlag::MAX_LATENCY);
/// CMD8, send interface condition
pub const SD_CMD8_SEND_IF_COND: Command =
    Command::new(8, Response::R7, CommandFlag::MAX_LATENCY);
/// CMD9, addressed card sends its CSD
pub const SDMMC_CMD9_SEND_CSD: Command =
    Command::new(9, Response::R2, CommandFlag::MAX_LATENCY);
/// CMD13, addressed card sends its status register
pub const SDMMC_CMD13_SEND_STATUS: Command =
    Command::new(13, Response::R1, CommandFlag::MAX_LATENCY);
/// CMD16, set the block length for block commands
pub const SDMMC_CMD16_SET_BLOCKLEN: Command =
    Command::new(16, Response::R1, CommandFlag::MAX_LATENCY);
/// CMD17, read a single block
pub const SDMMC_CMD17_READ_SINGLE_BLOCK: Command = Command::new(
    17,
    Response::R1,
    CommandFlag::from_bits_truncate(
        CommandFlag::MAX_LATENCY.bits() | CommandFlag::START_TRANSFER.bits() | CommandFlag::READ.bits(),
    ),
);
/// CMD55, next command is an application command
pub const SDMMC_CMD55_APP_CMD: Command =
    Command::new(55, Response::R1, CommandFlag::MAX_LATENCY);
/// ACMD6, define the data bus width
pub const SD_ACMD6_SET_BUS_WIDTH: Command =
    Command::new(6, Response::R1, CommandFlag::MAX_LATENCY);
/// ACMD41, host capacity support and OCR polling
pub const SD_MCI_ACMD41_SD_SEND_OP_COND: Command =
    Command::new(41, Response::R3, CommandFlag::empty());
/// ACMD42, connect or disconnect the pull-up on DAT3
pub const SD_ACMD42_SET_CLR_CARD_DETECT: Command =
    Command::new(42, Response::R1, CommandFlag::MAX_LATENCY);
