use core::sync::atomic::{compiler_fence, Ordering};

use log::debug;

use crate::bus::{Block, Bus, Read, SD_MMC_BLOCK_SIZE};
use crate::commands::Command;
use crate::error::ReadError;
use crate::registers::card_status::CardStatusRegister;
use crate::registers::mci::{MciReg, ModeRegister, PdcControl, Status};

use super::{MciBus, MciRegisters};

/// The MCI stores every received word byte-reversed relative to the wire.
/// Swaps bytes 0<->3 and 1<->2 of each 4-byte word, any trailing bytes are left alone.
pub fn fix_byte_order(buffer: &mut [u8]) {
    for word in buffer.chunks_exact_mut(4) {
        word.reverse();
    }
}

impl<REGS: MciRegisters> MciBus<REGS> {
    fn wait_until_read_finished(&self) -> Result<(), ReadError> {
        for _ in 0..self.config.transfer_budget {
            let status = self.status();
            if !status.errors().is_empty() {
                debug!("Receive failed, SR=0x{:08X}", status.bits());
                return Err(ReadError::TransferError);
            }
            if status.contains(Status::RXBUFF) {
                return Ok(());
            }
        }
        Err(ReadError::TransferError)
    }
}

impl<REGS: MciRegisters> Read for MciBus<REGS> {
    fn read_block(
        &mut self,
        command: Command,
        argument: u32,
        block: &mut Block,
    ) -> Result<(), ReadError> {
        let mut mr = ModeRegister { val: self.regs.read(MciReg::Mr) };
        mr.set_pdc_mode(true).set_block_length(SD_MMC_BLOCK_SIZE as u16);
        self.regs.write(MciReg::Mr, mr.val);

        self.regs.write(MciReg::Ptcr, (PdcControl::RXTDIS | PdcControl::TXTDIS).bits());
        self.regs.set_receive_pointer(block.0.as_mut_ptr() as *mut u32);
        self.regs.write(MciReg::Rcr, (SD_MMC_BLOCK_SIZE / 4) as u32);

        self.send_command(command, argument).map_err(ReadError::CommandRejected)?;
        let status = CardStatusRegister { val: self.get_response() };
        if status.out_of_range() {
            // The card sends no data for an address past its end
            return Err(ReadError::OutOfRange);
        }

        // `block` is written by the PDC, not by anything the compiler can see
        compiler_fence(Ordering::SeqCst);
        self.regs.write(MciReg::Ptcr, PdcControl::RXTEN.bits());

        let result = self.wait_until_read_finished();
        // RXBUFF alone does not settle the PDC on this part
        self.regs.write(MciReg::Ptcr, PdcControl::RXTDIS.bits());
        compiler_fence(Ordering::SeqCst);
        result?;

        fix_byte_order(&mut block.0);
        Ok(())
    }
}
