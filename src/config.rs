use crate::command_arguments::BusWidth;
use crate::registers::mci::DTOR_1MEGA_CYCLES;

/// Knobs for one controller. Budgets count status register polls, not time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Data bus width negotiated once the card is selected
    pub bus_width: BusWidth,
    /// MCK / (2 * (CLKDIV + 1))
    pub clock_divider: u8,
    pub power_save_divider: u8,
    /// MCI_DTOR value
    pub data_timeout: u32,
    /// Polls of MCI_SR waiting for CMDRDY
    pub command_budget: u32,
    /// CMD55 + ACMD41 rounds before the card is declared dead
    pub power_up_retries: u32,
    /// Polls of MCI_SR waiting for RXBUFF on one block
    pub transfer_budget: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_width: BusWidth::_4BIT,
            clock_divider: 0x4A,
            power_save_divider: 3,
            data_timeout: DTOR_1MEGA_CYCLES,
            command_budget: 100_000,
            // Timeout 1s = 400KHz / ((6+6+6+6)*8) cycles = 2100 retry
            power_up_retries: 2100,
            transfer_budget: 1_000_000,
        }
    }
}

impl Config {
    pub fn with_bus_width(mut self, bus_width: BusWidth) -> Self {
        self.bus_width = bus_width;
        self
    }

    pub fn with_clock_divider(mut self, divider: u8) -> Self {
        self.clock_divider = divider;
        self
    }

    pub fn with_data_timeout(mut self, dtor: u32) -> Self {
        self.data_timeout = dtor;
        self
    }

    pub fn with_command_budget(mut self, polls: u32) -> Self {
        self.command_budget = polls;
        self
    }

    pub fn with_power_up_retries(mut self, retries: u32) -> Self {
        self.power_up_retries = retries;
        self
    }

    pub fn with_transfer_budget(mut self, polls: u32) -> Self {
        self.transfer_budget = polls;
        self
    }
}
