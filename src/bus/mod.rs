pub mod mci;

use crate::command_arguments::BusWidth;
use crate::commands::Command;
use crate::config::Config;
use crate::error::{CommandError, ReadError};

pub const SD_MMC_BLOCK_SIZE: usize = 512;

/// One sector, word aligned so the PDC can fill it directly
#[repr(C, align(4))]
pub struct Block(pub [u8; SD_MMC_BLOCK_SIZE]);

impl Default for Block {
    fn default() -> Self {
        Block([0u8; SD_MMC_BLOCK_SIZE])
    }
}

pub trait Bus {
    /// Settings both the bus and the protocol layer above it run with
    fn config(&self) -> &Config;

    /// Bring the host controller to a known state: enabled, interrupts masked,
    /// 1-bit bus, initialization clock.
    fn init(&mut self);

    /// Send 74 clock cycles on the line. Required after card plug and install
    fn send_clock(&mut self) -> Result<(), CommandError>;

    /// Issue one command and wait for its response.
    /// The response registers stay valid until the next command.
    fn send_command(&mut self, command: Command, argument: u32) -> Result<(), CommandError>;

    /// Get 32 bits response of last command
    fn get_response(&mut self) -> u32;

    /// Get 128 bits response of last command, most significant word first
    fn get_response128(&mut self) -> [u32; 4];

    /// Switch the host side of the data bus
    fn set_bus_width(&mut self, bus_width: BusWidth);
}

pub trait Read {
    /// Read exactly one block with `command`, already in card byte order on return.
    /// The DMA never outlives the borrow of `block`.
    fn read_block(
        &mut self,
        command: Command,
        argument: u32,
        block: &mut Block,
    ) -> Result<(), ReadError>;
}
