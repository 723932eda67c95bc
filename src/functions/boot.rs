//! Entry points in the shape the rest of the bootloader calls them

use embedded_hal::digital::v2::InputPin;

use crate::bus::{Bus, Read};
use crate::controller::Controller;

/// Initialize the card behind `controller`, true once it accepts reads
pub fn sdcard_init<BUS: Bus + Read, DETECT: InputPin>(
    controller: &mut Controller<BUS, DETECT>,
) -> bool {
    controller.init().is_ok()
}

/// Byte addressed read, 0 on success. `length` is cut down to whole sectors.
pub fn mci_read<BUS: Bus + Read, DETECT: InputPin>(
    controller: &mut Controller<BUS, DETECT>,
    destination: &mut [u8],
    byte_offset: u32,
    length: u32,
) -> i32 {
    match controller.read(destination, byte_offset, length) {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

/// Block addressed read, 0 on success
pub fn mci_readblocks<BUS: Bus + Read, DETECT: InputPin>(
    controller: &mut Controller<BUS, DETECT>,
    destination: &mut [u8],
    block_num: u32,
    block_count: u32,
) -> i32 {
    match controller.read_blocks(destination, block_num, block_count) {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}
