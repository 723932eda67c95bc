pub mod card_status;
pub mod csd;
pub mod mci;
pub mod ocr;
