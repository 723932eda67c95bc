use crate::commands::Command;
use crate::error::CommandError;
use crate::registers::mci::Status;

use super::{MciBus, MciRegisters};

impl<REGS: MciRegisters> MciBus<REGS> {
    /// Spin on MCI_SR until CMDRDY, at most `command_budget` reads
    pub(super) fn wait_for_command_ready(&self) -> Result<Status, CommandError> {
        for _ in 0..self.config.command_budget {
            let status = self.status();
            if status.contains(Status::CMDRDY) {
                return Ok(status);
            }
        }
        Err(CommandError::ResponseTimeout)
    }
}

/// Map the error bits of a completed command to a result.
/// RCRCE is always raised on an R3 response and means nothing there.
pub(super) fn classify(command: Command, status: Status) -> Result<(), CommandError> {
    let mut errors = status.errors();
    if !command.response.has_crc() {
        errors.remove(Status::RCRCE);
    }
    if errors.is_empty() {
        Ok(())
    } else if errors.contains(Status::RTOE) {
        Err(CommandError::ResponseTimeout)
    } else if errors.contains(Status::RCRCE) {
        Err(CommandError::CrcError)
    } else {
        Err(CommandError::ResponseError(errors.bits()))
    }
}
