mod command;
#[cfg(test)]
pub(crate) mod mock;
mod read;
pub mod regs;

use log::debug;

use crate::bus::{Bus, SD_MMC_BLOCK_SIZE};
use crate::command_arguments::BusWidth;
use crate::commands::{Command, SDMMC_INIT_CLOCKS};
use crate::config::Config;
use crate::error::CommandError;
use crate::registers::mci::{Control, MciReg, ModeRegister, SdCard, Status};

pub use read::fix_byte_order;
pub use regs::{MciRegisters, Mmio};

/// Polled command engine and block pipeline over one MCI/PDC pair
pub struct MciBus<REGS> {
    pub regs: REGS,
    pub config: Config,
}

impl<REGS: MciRegisters> MciBus<REGS> {
    pub fn new(regs: REGS, config: Config) -> Self {
        Self { regs, config }
    }

    pub(crate) fn status(&self) -> Status {
        Status::from_bits_retain(self.regs.read(MciReg::Sr))
    }
}

impl<REGS: MciRegisters> Bus for MciBus<REGS> {
    fn config(&self) -> &Config {
        &self.config
    }

    fn init(&mut self) {
        self.regs.write(MciReg::Cr, (Control::MCIDIS | Control::PWSDIS).bits());
        // Completion is polled, nothing may raise the MCI line
        self.regs.write(MciReg::Idr, 0xFFFF_FFFF);
        self.regs.write(MciReg::Dtor, self.config.data_timeout);
        let mut mr = ModeRegister::default();
        mr.set_clock_divider(self.config.clock_divider)
            .set_power_save_divider(self.config.power_save_divider)
            .set_block_length(SD_MMC_BLOCK_SIZE as u16);
        self.regs.write(MciReg::Mr, mr.val);
        // Slot A, 1-bit until the card agrees otherwise
        self.regs.write(MciReg::Sdcr, SdCard::empty().bits());
        self.regs.write(MciReg::Cr, Control::MCIEN.bits());
        debug!("MCI enabled, MR=0x{:08X}", mr.val);
    }

    fn send_clock(&mut self) -> Result<(), CommandError> {
        self.send_command(SDMMC_INIT_CLOCKS, 0)
    }

    fn send_command(&mut self, command: Command, argument: u32) -> Result<(), CommandError> {
        // The argument is latched when CMDR is written
        self.regs.write(MciReg::Argr, argument);
        self.regs.write(MciReg::Cmdr, command.into());
        let status = self.wait_for_command_ready()?;
        let result = command::classify(command, status);
        match result {
            Ok(()) => debug!("CMD{} arg=0x{:08X} ok", command.index, argument),
            Err(e) => debug!("CMD{} arg=0x{:08X}: {}", command.index, argument, e),
        }
        result
    }

    fn get_response(&mut self) -> u32 {
        self.regs.read(MciReg::Rspr(0))
    }

    fn get_response128(&mut self) -> [u32; 4] {
        [
            self.regs.read(MciReg::Rspr(0)),
            self.regs.read(MciReg::Rspr(1)),
            self.regs.read(MciReg::Rspr(2)),
            self.regs.read(MciReg::Rspr(3)),
        ]
    }

    fn set_bus_width(&mut self, bus_width: BusWidth) {
        let mut sdcr = SdCard::from_bits_retain(self.regs.read(MciReg::Sdcr));
        sdcr.set(SdCard::SCDBUS, bus_width == BusWidth::_4BIT);
        self.regs.write(MciReg::Sdcr, sdcr.bits());
    }
}
