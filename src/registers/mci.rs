//! AT91RM9200 MCI and its PDC channel, offsets and bit positions as in the vendor header

use bit_field::BitField;
use bitflags::bitflags;

pub const AT91C_BASE_MCI: usize = 0xFFFB_4000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MciReg {
    /// Control
    Cr,
    /// Mode
    Mr,
    /// Data timeout
    Dtor,
    /// SD card
    Sdcr,
    /// Argument
    Argr,
    /// Command
    Cmdr,
    /// Response, four words
    Rspr(u8),
    /// Receive data
    Rdr,
    /// Status
    Sr,
    /// Interrupt enable
    Ier,
    /// Interrupt disable
    Idr,
    /// Interrupt mask
    Imr,
    /// PDC receive pointer
    Rpr,
    /// PDC receive counter
    Rcr,
    /// PDC transfer control
    Ptcr,
    /// PDC transfer status
    Ptsr,
}

impl MciReg {
    pub fn offset(self) -> usize {
        match self {
            MciReg::Cr => 0x00,
            MciReg::Mr => 0x04,
            MciReg::Dtor => 0x08,
            MciReg::Sdcr => 0x0C,
            MciReg::Argr => 0x10,
            MciReg::Cmdr => 0x14,
            MciReg::Rspr(n) => 0x20 + 4 * (n as usize & 0x3),
            MciReg::Rdr => 0x30,
            MciReg::Sr => 0x40,
            MciReg::Ier => 0x44,
            MciReg::Idr => 0x48,
            MciReg::Imr => 0x4C,
            MciReg::Rpr => 0x100,
            MciReg::Rcr => 0x104,
            MciReg::Ptcr => 0x120,
            MciReg::Ptsr => 0x124,
        }
    }
}

bitflags! {
    /// MCI_CR
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Control: u32 {
        const MCIEN = 1 << 0;
        const MCIDIS = 1 << 1;
        const PWSEN = 1 << 2;
        const PWSDIS = 1 << 3;
    }
}

bitflags! {
    /// MCI_SR, also the layout of IER/IDR/IMR
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Status: u32 {
        const CMDRDY = 1 << 0;
        const RXRDY = 1 << 1;
        const TXRDY = 1 << 2;
        const BLKE = 1 << 3;
        const DTIP = 1 << 4;
        const NOTBUSY = 1 << 5;
        const ENDRX = 1 << 6;
        const ENDTX = 1 << 7;
        const RXBUFF = 1 << 14;
        const TXBUFE = 1 << 15;
        const RINDE = 1 << 16;
        const RDIRE = 1 << 17;
        const RCRCE = 1 << 18;
        const RENDE = 1 << 19;
        const RTOE = 1 << 20;
        const DCRCE = 1 << 21;
        const DTOE = 1 << 22;
        const OVRE = 1 << 30;
        const UNRE = 1 << 31;
    }
}

impl Status {
    /// Every bit that marks a failed command or data phase
    pub const ERROR: Status = Status::from_bits_truncate(
        Status::RINDE.bits()
            | Status::RDIRE.bits()
            | Status::RCRCE.bits()
            | Status::RENDE.bits()
            | Status::RTOE.bits()
            | Status::DCRCE.bits()
            | Status::DTOE.bits()
            | Status::OVRE.bits()
            | Status::UNRE.bits(),
    );

    pub fn errors(self) -> Status {
        self & Status::ERROR
    }
}

bitflags! {
    /// MCI_SDCR
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SdCard: u32 {
        /// Slot B when set, slot A otherwise
        const SCDSEL = 1 << 0;
        /// 4-bit data bus
        const SCDBUS = 1 << 7;
    }
}

bitflags! {
    /// PDC_PTCR
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PdcControl: u32 {
        const RXTEN = 1 << 0;
        const RXTDIS = 1 << 1;
        const TXTEN = 1 << 8;
        const TXTDIS = 1 << 9;
    }
}

/// MCI_MR
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeRegister {
    pub val: u32,
}

impl ModeRegister {
    pub fn set_clock_divider(&mut self, divider: u8) -> &mut Self {
        self.val.set_bits(0..8, divider as u32);
        self
    }

    pub fn set_power_save_divider(&mut self, divider: u8) -> &mut Self {
        self.val.set_bits(8..11, divider as u32 & 0x7);
        self
    }

    pub fn set_pdc_mode(&mut self, enable: bool) -> &mut Self {
        self.val.set_bit(15, enable);
        self
    }

    /// Block length in bytes, placed at bit 16 exactly as the boot ROM does
    pub fn set_block_length(&mut self, length: u16) -> &mut Self {
        self.val.set_bits(16..32, length as u32);
        self
    }

    pub fn block_length(&self) -> u16 {
        self.val.get_bits(16..32) as u16
    }
}

/// DTOR value for 1M cycles, DTOCYC = 15 and DTOMUL = 1048576
pub const DTOR_1MEGA_CYCLES: u32 = 0x7F;
