use crate::registers::mci::{MciReg, AT91C_BASE_MCI};

/// Access to one MCI register block and its PDC channel
pub trait MciRegisters {
    fn read(&self, reg: MciReg) -> u32;

    fn write(&mut self, reg: MciReg, value: u32);

    /// PDC_RPR takes an address rather than a field value
    fn set_receive_pointer(&mut self, pointer: *mut u32);
}

/// Memory mapped register block
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    /// `base` must be the address of an MCI register block that nothing else drives.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// # Safety
    /// Only one `Mmio` may exist for the controller.
    pub const unsafe fn at91rm9200() -> Self {
        Self::new(AT91C_BASE_MCI)
    }
}

impl MciRegisters for Mmio {
    fn read(&self, reg: MciReg) -> u32 {
        unsafe { core::ptr::read_volatile((self.base + reg.offset()) as *const u32) }
    }

    fn write(&mut self, reg: MciReg, value: u32) {
        unsafe { core::ptr::write_volatile((self.base + reg.offset()) as *mut u32, value) }
    }

    fn set_receive_pointer(&mut self, pointer: *mut u32) {
        // 32-bit bus addresses
        self.write(MciReg::Rpr, pointer as usize as u32)
    }
}
