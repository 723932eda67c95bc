//! C ABI over the one AT91RM9200 MCI

use core::convert::TryFrom;
use core::ffi::c_int;

use spin::Mutex;

use crate::bus::mci::{MciBus, Mmio};
use crate::bus::SD_MMC_BLOCK_SIZE;
use crate::config::Config;
use crate::controller::Controller;
use crate::dummy_input_pin::DummyInputPin;

use super::boot;

type SdCard = Controller<MciBus<Mmio>, DummyInputPin>;

static SDCARD: Mutex<Option<SdCard>> = Mutex::new(None);

/// Returned when no card was initialized, the destination is null or too large to address
const NO_DEVICE: c_int = -1;

/// Bytes covered by `count` sectors, if that fits the address space
fn blocks_length(count: u32) -> Option<usize> {
    let length = (count as u64).checked_mul(SD_MMC_BLOCK_SIZE as u64)?;
    usize::try_from(length).ok().filter(|length| *length <= isize::MAX as usize)
}

/// 1 once the card is ready for reads, 0 otherwise
#[no_mangle]
pub extern "C" fn sdcard_init() -> c_int {
    let mut slot = SDCARD.lock();
    let controller = slot.get_or_insert_with(|| {
        // Safety: this is the only place the MCI block gets mapped
        let regs = unsafe { Mmio::at91rm9200() };
        Controller::without_card_detect(MciBus::new(regs, Config::default()))
    });
    boot::sdcard_init(controller) as c_int
}

/// # Safety
/// `dest` must be valid for writes of `length` bytes.
#[no_mangle]
pub unsafe extern "C" fn MCI_read(dest: *mut u8, offset: u32, length: u32) -> c_int {
    if dest.is_null() {
        return NO_DEVICE;
    }
    let mut slot = SDCARD.lock();
    let controller = match slot.as_mut() {
        Some(controller) => controller,
        None => return NO_DEVICE,
    };
    let destination = core::slice::from_raw_parts_mut(dest, length as usize);
    boot::mci_read(controller, destination, offset, length)
}

/// # Safety
/// `dest` must be valid for writes of `count * 512` bytes.
#[no_mangle]
pub unsafe extern "C" fn MCI_readblocks(dest: *mut u8, block: u32, count: u32) -> c_int {
    if dest.is_null() {
        return NO_DEVICE;
    }
    let length = match blocks_length(count) {
        Some(length) => length,
        None => return NO_DEVICE,
    };
    let mut slot = SDCARD.lock();
    let controller = match slot.as_mut() {
        Some(controller) => controller,
        None => return NO_DEVICE,
    };
    let destination = core::slice::from_raw_parts_mut(dest, length);
    boot::mci_readblocks(controller, destination, block, count)
}
