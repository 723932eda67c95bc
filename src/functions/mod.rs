pub mod boot;
#[cfg(feature = "ffi")]
#[allow(non_snake_case)]
pub mod ffi;

pub use boot::{mci_read, mci_readblocks, sdcard_init};
