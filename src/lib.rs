#![cfg_attr(not(test), no_std)]
pub mod bus;
pub mod card;
pub mod command_arguments;
pub mod command_flags;
pub mod commands;
pub mod config;
pub mod controller;
pub mod dummy_input_pin;
pub mod error;
pub mod functions;
pub mod registers;
pub mod transaction;

pub use bus::mci::{MciBus, Mmio};
pub use config::Config;
pub use controller::Controller;
pub use error::{CommandError, InitError, ReadError};
