mod controller;
mod sdcard;

use embedded_hal::digital::v2::InputPin;
use log::{debug, warn};

use crate::bus::{Block, Bus, Read, SD_MMC_BLOCK_SIZE};
use crate::card::TransferState;
use crate::command_arguments::rca_argument;
use crate::commands::{SDMMC_CMD13_SEND_STATUS, SDMMC_CMD17_READ_SINGLE_BLOCK};
use crate::error::ReadError;
use crate::registers::card_status::CardStatusRegister;
use crate::transaction::Transaction;

pub use controller::Controller;

impl<BUS: Bus + Read, DETECT: InputPin> Controller<BUS, DETECT> {
    /// CMD13: Get status register.
    pub fn load_status(&mut self) -> Result<CardStatusRegister, ReadError> {
        self.card
            .bus
            .send_command(SDMMC_CMD13_SEND_STATUS, rca_argument(self.card.rca))
            .map_err(ReadError::CommandRejected)?;
        Ok(CardStatusRegister { val: self.card.bus.get_response() })
    }

    /// Read one sector into `destination`
    pub fn read_block(&mut self, block: u32, destination: &mut Block) -> Result<(), ReadError> {
        if !self.card.is_ready() {
            return Err(ReadError::NotReady);
        }
        let status = self.load_status()?;
        if !status.ready_for_data() {
            debug!("Card not ready for data, status 0x{:08X}", status.val);
            return Err(ReadError::NotReady);
        }

        // SDSC Card (CCS=0) uses byte unit address,
        // SDHC Cards (CCS=1) use block unit address (512 Bytes unit).
        let argument = if self.card.card_type.high_capacity() {
            block
        } else {
            block.checked_mul(SD_MMC_BLOCK_SIZE as u32).ok_or(ReadError::OutOfRange)?
        };

        self.card.transfer = TransferState::RxSingleBlock;
        let result = self.card.bus.read_block(SDMMC_CMD17_READ_SINGLE_BLOCK, argument, destination);
        self.card.transfer = TransferState::Idle;
        debug!("Block {} read: {:?}", block, result);
        result
    }

    /// Read `transaction.remain` blocks starting at `start`, counting down `remain` per block.
    /// Stops at the first failing block, which `remain` still includes.
    pub fn start_read(
        &mut self,
        transaction: &mut Transaction,
        start: u32,
        destination: &mut [u8],
    ) -> Result<(), ReadError> {
        let length = (transaction.remain as usize)
            .checked_mul(SD_MMC_BLOCK_SIZE)
            .ok_or(ReadError::BufferTooSmall)?;
        let destination = destination.get_mut(..length).ok_or(ReadError::BufferTooSmall)?;
        let mut scratch = Block::default();
        for (i, chunk) in destination.chunks_exact_mut(SD_MMC_BLOCK_SIZE).enumerate() {
            let block = start.checked_add(i as u32).ok_or(ReadError::OutOfRange)?;
            self.read_block(block, &mut scratch)?;
            chunk.copy_from_slice(&scratch.0);
            transaction.remain -= 1;
        }
        Ok(())
    }

    /// Read `count` blocks starting at `start` into the front of `destination`
    pub fn read_blocks(
        &mut self,
        destination: &mut [u8],
        start: u32,
        count: u32,
    ) -> Result<(), ReadError> {
        if !self.card.is_ready() {
            return Err(ReadError::NotReady);
        }
        let length = (count as usize).checked_mul(SD_MMC_BLOCK_SIZE).ok_or(ReadError::BufferTooSmall)?;
        if destination.len() < length {
            return Err(ReadError::BufferTooSmall);
        }
        if count > 0 && start.checked_add(count - 1).is_none() {
            return Err(ReadError::OutOfRange);
        }

        let mut transaction = Transaction::new(count);
        let result = self.start_read(&mut transaction, start, destination);
        if let Err(e) = result {
            warn!(
                "Read of {} blocks at {} stopped after {}: {}",
                transaction.total,
                start,
                transaction.done(),
                e
            );
        }
        result
    }

    /// Byte addressed read. Offset and length are cut down to whole sectors, a
    /// trailing partial sector is not read and its bytes in `destination` are untouched.
    pub fn read(&mut self, destination: &mut [u8], offset: u32, length: u32) -> Result<(), ReadError> {
        let block_size = SD_MMC_BLOCK_SIZE as u32;
        self.read_blocks(destination, offset / block_size, length / block_size)
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::mci::mock::FakeCard;
    use crate::bus::mci::MciBus;
    use crate::bus::{Block, SD_MMC_BLOCK_SIZE};
    use crate::card::TransferState;
    use crate::config::Config;
    use crate::controller::Controller;
    use crate::dummy_input_pin::DummyInputPin;
    use crate::error::{CommandError, ReadError};
    use crate::registers::mci::Status;
    use crate::transaction::Transaction;

    type TestController = Controller<MciBus<FakeCard>, DummyInputPin>;

    fn ready(card: FakeCard) -> TestController {
        let config = Config::default();
        let mut controller = Controller::without_card_detect(MciBus::new(card, config));
        controller.init().unwrap();
        controller.card.bus.regs.issued.clear();
        controller
    }

    fn read_arguments(controller: &TestController) -> Vec<u32> {
        controller.card.bus.regs.arguments_of(17)
    }

    #[test]
    fn test_read_before_init() {
        let config = Config::default();
        let mut controller = Controller::without_card_detect(MciBus::new(FakeCard::sdhc(), config));
        let mut buffer = [0u8; SD_MMC_BLOCK_SIZE];
        assert_eq!(controller.read_blocks(&mut buffer, 0, 1), Err(ReadError::NotReady));
        assert!(controller.card.bus.regs.issued.is_empty());
    }

    #[test]
    fn test_sdhc_uses_block_address() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; 2 * SD_MMC_BLOCK_SIZE];
        controller.read_blocks(&mut buffer, 3, 2).unwrap();
        assert_eq!(read_arguments(&controller), vec![3, 4]);
        let regs = &controller.card.bus.regs;
        assert_eq!(&buffer[..SD_MMC_BLOCK_SIZE], regs.sector(3));
        assert_eq!(&buffer[SD_MMC_BLOCK_SIZE..], regs.sector(4));
    }

    #[test]
    fn test_sdsc_uses_byte_address() {
        let mut controller = ready(FakeCard::sd_v1());
        let mut buffer = [0u8; 2 * SD_MMC_BLOCK_SIZE];
        controller.read_blocks(&mut buffer, 3, 2).unwrap();
        assert_eq!(read_arguments(&controller), vec![3 * 512, 4 * 512]);
        assert_eq!(&buffer[SD_MMC_BLOCK_SIZE..], controller.card.bus.regs.sector(4));
    }

    #[test]
    fn test_status_checked_before_every_block() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; 3 * SD_MMC_BLOCK_SIZE];
        controller.read_blocks(&mut buffer, 0, 3).unwrap();
        assert_eq!(controller.card.bus.regs.indexes(), vec![13, 17, 13, 17, 13, 17]);
        assert_eq!(controller.card.bus.regs.arguments_of(13), vec![0xB368_0000; 3]);
    }

    #[test]
    fn test_read_is_idempotent() {
        let mut controller = ready(FakeCard::sd_v1());
        let mut first = [0u8; 4 * SD_MMC_BLOCK_SIZE];
        let mut second = [0xA5u8; 4 * SD_MMC_BLOCK_SIZE];
        controller.read_blocks(&mut first, 5, 4).unwrap();
        controller.read_blocks(&mut second, 5, 4).unwrap();
        assert_eq!(first[..], second[..]);
    }

    #[test]
    fn test_byte_read_matches_block_read() {
        let mut controller = ready(FakeCard::sd_v1());
        let mut by_bytes = [0u8; SD_MMC_BLOCK_SIZE];
        let mut by_blocks = [0xFFu8; SD_MMC_BLOCK_SIZE];
        controller.read(&mut by_bytes, 1024, 512).unwrap();
        controller.read_blocks(&mut by_blocks, 2, 1).unwrap();
        assert_eq!(by_bytes[..], by_blocks[..]);
        assert_eq!(read_arguments(&controller), vec![1024, 1024]);
    }

    #[test]
    fn test_byte_read_truncates_partial_sector() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0xEEu8; 2 * SD_MMC_BLOCK_SIZE];
        controller.read(&mut buffer, 512 + 100, 700).unwrap();
        // Offset 612 falls in block 1, 700 bytes make one whole sector
        assert_eq!(read_arguments(&controller), vec![1]);
        assert_eq!(&buffer[..SD_MMC_BLOCK_SIZE], controller.card.bus.regs.sector(1));
        assert!(buffer[SD_MMC_BLOCK_SIZE..].iter().all(|b| *b == 0xEE));
    }

    #[test]
    fn test_byte_read_shorter_than_a_sector_reads_nothing() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0x11u8; 100];
        controller.read(&mut buffer, 0, 100).unwrap();
        assert!(controller.card.bus.regs.issued.is_empty());
        assert!(buffer.iter().all(|b| *b == 0x11));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; SD_MMC_BLOCK_SIZE + 511];
        assert_eq!(controller.read_blocks(&mut buffer, 0, 2), Err(ReadError::BufferTooSmall));
        assert!(controller.card.bus.regs.issued.is_empty());
    }

    #[test]
    fn test_block_range_overflow() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; 2 * SD_MMC_BLOCK_SIZE];
        assert_eq!(controller.read_blocks(&mut buffer, u32::MAX, 2), Err(ReadError::OutOfRange));

        let mut controller = ready(FakeCard::sd_v1());
        let mut block = Block::default();
        assert_eq!(controller.read_block(0x0080_0000, &mut block), Err(ReadError::OutOfRange));
    }

    #[test]
    fn test_not_ready_for_data() {
        let mut controller = ready(FakeCard::sdhc());
        controller.card.bus.regs.ready_for_data = false;
        let mut buffer = [0u8; SD_MMC_BLOCK_SIZE];
        assert_eq!(controller.read_blocks(&mut buffer, 0, 1), Err(ReadError::NotReady));
        assert_eq!(controller.card.bus.regs.count(17, false), 0);
    }

    #[test]
    fn test_rejected_read_command() {
        let mut controller = ready(FakeCard::sdhc());
        controller.card.bus.regs.fail = Some((17, Status::RCRCE));
        let mut buffer = [0u8; SD_MMC_BLOCK_SIZE];
        assert_eq!(
            controller.read_blocks(&mut buffer, 0, 1),
            Err(ReadError::CommandRejected(CommandError::CrcError))
        );
        assert_eq!(controller.card.transfer, TransferState::Idle);
    }

    #[test]
    fn test_error_aborts_remaining_blocks() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; 4 * SD_MMC_BLOCK_SIZE];
        // Sector 15 is the last one on the simulated card
        let mut transaction = Transaction::new(4);
        assert_eq!(
            controller.start_read(&mut transaction, 14, &mut buffer),
            Err(ReadError::OutOfRange)
        );
        assert_eq!(transaction.remain, 2);
        assert_eq!(transaction.done(), 2);
        assert_eq!(read_arguments(&controller), vec![14, 15, 16]);
        assert!(controller.card.is_ready());
    }

    #[test]
    fn test_data_phase_error() {
        let mut controller = ready(FakeCard::sdhc());
        controller.card.bus.regs.data_error = Some(Status::DCRCE);
        let mut buffer = [0u8; 2 * SD_MMC_BLOCK_SIZE];
        assert_eq!(controller.read_blocks(&mut buffer, 0, 2), Err(ReadError::TransferError));
        assert_eq!(read_arguments(&controller), vec![0]);
    }

    #[test]
    fn test_start_read_huge_transaction() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; SD_MMC_BLOCK_SIZE];
        let mut transaction = Transaction::new(u32::MAX);
        assert_eq!(
            controller.start_read(&mut transaction, 0, &mut buffer),
            Err(ReadError::BufferTooSmall)
        );
        assert_eq!(transaction.remain, u32::MAX);
        assert!(controller.card.bus.regs.issued.is_empty());
    }

    #[test]
    fn test_zero_blocks() {
        let mut controller = ready(FakeCard::sdhc());
        let mut buffer = [0u8; 0];
        controller.read_blocks(&mut buffer, 0, 0).unwrap();
        assert!(controller.card.bus.regs.issued.is_empty());
    }
}
