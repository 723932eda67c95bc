mod card;

pub use card::{Card, State, TransferState, Type};
