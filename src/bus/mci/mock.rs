//! Register-level stand-in for an MCI with one card in slot A

use core::cell::Cell;

use bit_field::BitField;

use crate::bus::SD_MMC_BLOCK_SIZE;
use crate::command_flags::{CommandFlag, CMDR_INDEX_MASK};
use crate::registers::mci::{MciReg, PdcControl, Status};

use super::MciRegisters;

pub const CSD_V1: [u32; 4] = [0x0026_0032, 0x5F59_83C8, 0xADDB_CFFF, 0xD240_40A5];
pub const CSD_V2: [u32; 4] = [0x400E_0032, 0x5B59_0000, 0x3B37_7F80, 0x0A40_0000];
pub const CID: [u32; 4] = [0x0353_4453, 0x4430_3247, 0x8012_3456, 0x7800_C701];

const MEDIA_SECTORS: usize = 16;
const R1_TRANSFER_READY: u32 = 0x0000_0900;
const R1_TRANSFER: u32 = 0x0000_0800;
const R1_APP_CMD: u32 = 1 << 5;
const R1_OUT_OF_RANGE: u32 = 1 << 31;

/// One command as the card saw it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Issued {
    pub index: u8,
    /// Preceded by CMD55
    pub app: bool,
    pub argument: u32,
}

pub struct FakeCard {
    /// Every register write, in order
    pub writes: Vec<(MciReg, u32)>,
    pub status_reads: Cell<u32>,
    /// CMDRDY never rises
    pub never_ready: bool,
    /// Command log, init clocks excluded
    pub issued: Vec<Issued>,

    pub rca: u16,
    pub sd_v2: bool,
    pub high_capacity: bool,
    /// ACMD41 rounds answered with the busy bit clear
    pub busy_rounds: u32,
    pub acmd41_count: u32,
    /// Replaces the CMD8 echo
    pub cmd8_echo: Option<u32>,
    pub csd: [u32; 4],
    pub media: Vec<u8>,
    pub ready_for_data: bool,
    /// Error bits raised on completion of the given command index
    pub fail: Option<(u8, Status)>,
    /// Raised instead of RXBUFF once the PDC is enabled
    pub data_error: Option<Status>,
    /// PDC never reports the buffer full
    pub hold_rx_buffer: bool,

    /// CMD3 answered, CMD55 must carry the RCA from now on
    published: bool,
    status: u32,
    responses: [u32; 4],
    argument: u32,
    app_next: bool,
    pending_read: Option<u32>,
    receive_pointer: *mut u32,
    receive_count: u32,
    mr: u32,
    sdcr: u32,
}

impl FakeCard {
    fn new(sd_v2: bool, high_capacity: bool, csd: [u32; 4]) -> Self {
        let media = (0..MEDIA_SECTORS * SD_MMC_BLOCK_SIZE)
            .map(|i| (i.wrapping_mul(31) ^ (i / SD_MMC_BLOCK_SIZE)) as u8)
            .collect();
        Self {
            writes: Vec::new(),
            status_reads: Cell::new(0),
            never_ready: false,
            issued: Vec::new(),
            rca: 0xB368,
            sd_v2,
            high_capacity,
            busy_rounds: 3,
            acmd41_count: 0,
            cmd8_echo: None,
            csd,
            media,
            ready_for_data: true,
            fail: None,
            data_error: None,
            hold_rx_buffer: false,
            published: false,
            status: 0,
            responses: [0; 4],
            argument: 0,
            app_next: false,
            pending_read: None,
            receive_pointer: core::ptr::null_mut(),
            receive_count: 0,
            mr: 0,
            sdcr: 0,
        }
    }

    /// Standard capacity, pre-v2.0 card
    pub fn sd_v1() -> Self {
        Self::new(false, false, CSD_V1)
    }

    pub fn sdhc() -> Self {
        Self::new(true, true, CSD_V2)
    }

    /// Content of one sector as it sits on the card
    pub fn sector(&self, block: usize) -> &[u8] {
        &self.media[block * SD_MMC_BLOCK_SIZE..(block + 1) * SD_MMC_BLOCK_SIZE]
    }

    /// Indexes of the commands issued so far, application commands included
    pub fn indexes(&self) -> Vec<u8> {
        self.issued.iter().map(|issued| issued.index).collect()
    }

    pub fn count(&self, index: u8, app: bool) -> usize {
        self.issued.iter().filter(|issued| issued.index == index && issued.app == app).count()
    }

    pub fn arguments_of(&self, index: u8) -> Vec<u32> {
        self.issued
            .iter()
            .filter(|issued| issued.index == index && !issued.app)
            .map(|issued| issued.argument)
            .collect()
    }

    fn addressed(&self) -> bool {
        (self.argument >> 16) as u16 == self.rca
    }

    fn byte_offset(&self, argument: u32) -> usize {
        if self.high_capacity {
            argument as usize * SD_MMC_BLOCK_SIZE
        } else {
            argument as usize
        }
    }

    fn execute(&mut self, word: u32) {
        let flags = CommandFlag::from_bits_truncate(word);
        self.responses = [0; 4];
        self.status = Status::CMDRDY.bits();
        if flags.contains(CommandFlag::INIT) {
            return;
        }

        let index = (word & CMDR_INDEX_MASK) as u8;
        let app = core::mem::replace(&mut self.app_next, false);
        self.issued.push(Issued { index, app, argument: self.argument });

        if let Some((failing, bits)) = self.fail {
            if failing == index {
                self.status |= bits.bits();
                return;
            }
        }

        let response = match (index, app) {
            (0, _) => {
                self.acmd41_count = 0;
                self.published = false;
                0
            }
            (8, _) if self.sd_v2 => self.cmd8_echo.unwrap_or(self.argument & 0xFFF),
            (41, true) => {
                self.acmd41_count += 1;
                // No CRC over R3
                self.status |= Status::RCRCE.bits();
                let mut ocr = 0x00FF_8000u32;
                if self.acmd41_count > self.busy_rounds {
                    ocr.set_bit(31, true);
                    ocr.set_bit(30, self.high_capacity && self.argument.get_bit(30));
                }
                ocr
            }
            (55, _) if !self.published || self.addressed() => {
                self.app_next = true;
                R1_TRANSFER | R1_APP_CMD
            }
            (2, false) => {
                self.responses = CID;
                return;
            }
            (3, false) => {
                self.published = true;
                (self.rca as u32) << 16 | 0x0500
            }
            (9, false) if self.addressed() => {
                self.responses = self.csd;
                return;
            }
            (7, false) if self.addressed() => R1_TRANSFER_READY,
            (16, false) => R1_TRANSFER_READY,
            (13, false) if self.addressed() => {
                if self.ready_for_data {
                    R1_TRANSFER_READY
                } else {
                    R1_TRANSFER
                }
            }
            (6, true) | (42, true) => R1_TRANSFER_READY | R1_APP_CMD,
            (17, false) => {
                let offset = self.byte_offset(self.argument);
                if offset + SD_MMC_BLOCK_SIZE > self.media.len() {
                    R1_TRANSFER_READY | R1_OUT_OF_RANGE
                } else {
                    self.pending_read = Some(self.argument);
                    R1_TRANSFER_READY
                }
            }
            _ => {
                self.status |= Status::RTOE.bits();
                0
            }
        };
        self.responses[0] = response;
    }

    fn start_receive(&mut self) {
        let argument = match self.pending_read.take() {
            Some(argument) => argument,
            None => return,
        };
        if self.hold_rx_buffer {
            return;
        }
        if let Some(bits) = self.data_error {
            self.status |= bits.bits();
            return;
        }
        let offset = self.byte_offset(argument);
        let length = self.receive_count as usize * 4;
        if offset + length > self.media.len() || self.receive_pointer.is_null() {
            self.status |= Status::DTOE.bits();
            return;
        }
        let destination = self.receive_pointer as *mut u8;
        for (i, word) in self.media[offset..offset + length].chunks_exact(4).enumerate() {
            for (j, byte) in word.iter().rev().enumerate() {
                unsafe { destination.add(i * 4 + j).write(*byte) };
            }
        }
        self.status |= Status::RXBUFF.bits() | Status::ENDRX.bits();
    }
}

impl MciRegisters for FakeCard {
    fn read(&self, reg: MciReg) -> u32 {
        match reg {
            MciReg::Sr => {
                self.status_reads.set(self.status_reads.get() + 1);
                if self.never_ready {
                    self.status & !Status::CMDRDY.bits()
                } else {
                    self.status
                }
            }
            MciReg::Rspr(n) => self.responses[n as usize & 0x3],
            MciReg::Mr => self.mr,
            MciReg::Sdcr => self.sdcr,
            MciReg::Rcr => self.receive_count,
            _ => 0,
        }
    }

    fn write(&mut self, reg: MciReg, value: u32) {
        self.writes.push((reg, value));
        match reg {
            MciReg::Argr => self.argument = value,
            MciReg::Cmdr => self.execute(value),
            MciReg::Mr => self.mr = value,
            MciReg::Sdcr => self.sdcr = value,
            MciReg::Rcr => self.receive_count = value,
            MciReg::Ptcr => {
                let control = PdcControl::from_bits_truncate(value);
                if control.contains(PdcControl::RXTEN) {
                    self.start_receive();
                }
            }
            _ => {}
        }
    }

    fn set_receive_pointer(&mut self, pointer: *mut u32) {
        self.writes.push((MciReg::Rpr, pointer as usize as u32));
        self.receive_pointer = pointer;
    }
}
