use bitflags::bitflags;

bitflags! {
    /// Single-bit fields of MCI_CMDR besides the command index and response type
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CommandFlag: u32 {
        /// SPCMD = 1, send the 74-cycle initialization sequence
        const INIT = 1 << 8;
        /// OPDCMD, open drain command
        const OPEN_DRAIN = 1 << 11;
        /// MAXLAT, 64 cycles max latency instead of 5
        const MAX_LATENCY = 1 << 12;
        /// TRCMD = 1, start a data transfer
        const START_TRANSFER = 1 << 16;
        /// TRDIR, card to host
        const READ = 1 << 18;
    }
}

pub const CMDR_INDEX_MASK: u32 = 0x3F;
pub const CMDR_RSPTYP_SHIFT: u32 = 6;
pub const CMDR_RSPTYP_NONE: u32 = 0;
pub const CMDR_RSPTYP_48: u32 = 1;
pub const CMDR_RSPTYP_136: u32 = 2;
// TRTYP occupies bits 19..21, single block is 0 so it never needs setting
