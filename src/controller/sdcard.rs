use embedded_hal::digital::v2::InputPin;
use log::{debug, info, warn};

use crate::bus::{Bus, Read, SD_MMC_BLOCK_SIZE};
use crate::card::State;
use crate::command_arguments::{rca_argument, BusWidth, Cmd8};
use crate::commands::{
    Command, SDMMC_CMD0_GO_IDLE_STATE, SDMMC_CMD16_SET_BLOCKLEN, SDMMC_CMD2_ALL_SEND_CID,
    SDMMC_CMD55_APP_CMD, SDMMC_CMD7_SELECT_CARD_CMD, SDMMC_CMD9_SEND_CSD, SD_ACMD42_SET_CLR_CARD_DETECT,
    SD_ACMD6_SET_BUS_WIDTH, SD_CMD3_SEND_RELATIVE_ADDR, SD_CMD8_SEND_IF_COND,
    SD_MCI_ACMD41_SD_SEND_OP_COND,
};
use crate::error::{CommandError, InitError};
use crate::registers::card_status::published_rca;
use crate::registers::csd::decode_csd;
use crate::registers::ocr::{ocr_voltage_support, OcrRegister};

use super::controller::Controller;

impl<BUS: Bus + Read, DETECT: InputPin> Controller<BUS, DETECT> {
    /// Bring the card from power-up to the transfer state with a 512 byte block length.
    /// On failure the card is left uninitialized and no read is accepted.
    pub fn init(&mut self) -> Result<(), InitError> {
        self.card.reset();
        if !self.card_present() {
            warn!("SD card not detected");
            return Err(InitError::NoCard);
        }
        match self.install() {
            Ok(()) => {
                info!(
                    "SD card ready: v2={} hc={} rca=0x{:04X} width={:?} capacity={}KiB",
                    self.card.card_type.sd_v2(),
                    self.card.card_type.high_capacity(),
                    self.card.rca,
                    self.card.bus_width,
                    self.card.capacity / 1024
                );
                Ok(())
            }
            Err(e) => {
                warn!("SD card init failed in {:?}: {}", self.card.state, e);
                self.card.reset();
                Err(e)
            }
        }
    }

    fn install(&mut self) -> Result<(), InitError> {
        self.card.bus.init();
        self.go_idle()?;

        let v2 = match self.is_v2() {
            Ok(v2) => v2,
            Err(e) => {
                warn!("{}, continuing as a v1.x card", e);
                false
            }
        };
        self.card.card_type.set_sd_v2(v2);
        self.card.state = State::CapabilityProbed;

        self.load_ocr_sdcard(v2)?;
        self.card.state = State::PoweredUp;

        // Put the card in identify mode. The CID is not used
        self.card.bus.send_command(SDMMC_CMD2_ALL_SEND_CID, 0).map_err(InitError::IdentificationFailed)?;
        let _cid = self.card.bus.get_response128();
        self.card.state = State::Identified;

        self.set_relative_address()?;
        self.card.state = State::Addressed;

        self.load_csd()?;
        self.select()?;
        let bus_width = self.card.bus.config().bus_width;
        self.set_data_bus_width(bus_width)?;
        self.set_block_length()?;
        self.card.state = State::BlockLengthSet;

        self.card.state = State::Ready;
        Ok(())
    }

    /// 74 init clocks then CMD0, resets any previous session on the card
    pub fn go_idle(&mut self) -> Result<(), InitError> {
        self.card.bus.send_clock().map_err(InitError::ResetFailed)?;
        self.card.bus.send_command(SDMMC_CMD0_GO_IDLE_STATE, 0).map_err(InitError::ResetFailed)?;
        self.card.state = State::IdleCommanded;
        Ok(())
    }

    /// CMD8 for SD card - send interface condition command.
    /// A v1.x card does not know the command, any failure here only means "not v2".
    pub fn is_v2(&mut self) -> Result<bool, InitError> {
        let mut arg = Cmd8::default();
        arg.set_cmd8_pattern(true).set_high_voltage(true);

        self.card
            .bus
            .send_command(SD_CMD8_SEND_IF_COND, arg.val)
            .map_err(|_| InitError::ProbeInconclusive)?;
        let echo = self.card.bus.get_response();
        if echo != arg.val {
            debug!("SEND_IF_COND echoed 0x{:08X}", echo);
            return Err(InitError::ProbeInconclusive);
        }
        Ok(true)
    }

    /// CMD55 addressed with the current RCA, then the application command
    fn send_app_command(&mut self, command: Command, argument: u32) -> Result<(), CommandError> {
        self.card.bus.send_command(SDMMC_CMD55_APP_CMD, rca_argument(self.card.rca))?;
        self.card.bus.send_command(command, argument)
    }

    /// Ask the card to send its operation conditions until it leaves the busy state
    /// # Arguments
    /// * `v2` Shall be true if it is a SD card V2, announces high capacity support
    pub fn load_ocr_sdcard(&mut self, v2: bool) -> Result<(), InitError> {
        let mut arg = ocr_voltage_support();
        arg.set_high_capacity_support(v2);
        let retries = self.card.bus.config().power_up_retries;
        for _ in 0..retries {
            self.send_app_command(SD_MCI_ACMD41_SD_SEND_OP_COND, arg.val)
                .map_err(InitError::PowerUpFailed)?;
            let ocr = OcrRegister { val: self.card.bus.get_response() };
            if ocr.card_powered_up_status() {
                if v2 && ocr.card_capacity_status() {
                    self.card.card_type.set_high_capacity(true);
                }
                return Ok(());
            }
        }
        Err(InitError::PowerUpTimeout)
    }

    /// CMD3, the card picks its own address
    pub fn set_relative_address(&mut self) -> Result<(), InitError> {
        self.card
            .bus
            .send_command(SD_CMD3_SEND_RELATIVE_ADDR, 0)
            .map_err(InitError::AddressingFailed)?;
        self.card.rca = published_rca(self.card.bus.get_response());
        Ok(())
    }

    /// CMD9, updates the block length exponent and the capacity
    pub fn load_csd(&mut self) -> Result<(), InitError> {
        self.card
            .bus
            .send_command(SDMMC_CMD9_SEND_CSD, rca_argument(self.card.rca))
            .map_err(InitError::CsdFetchFailed)?;
        let csd = decode_csd(self.card.bus.get_response128());
        debug!("CSD {:?}", csd);
        self.card.read_bl_len = csd.read_bl_len;
        self.card.capacity = csd.capacity();
        self.card.csd = Some(csd);
        Ok(())
    }

    /// CMD7, stand-by to transfer state
    pub fn select(&mut self) -> Result<(), InitError> {
        self.card
            .bus
            .send_command(SDMMC_CMD7_SELECT_CARD_CMD, rca_argument(self.card.rca))
            .map_err(InitError::SelectFailed)
    }

    /// ACMD42 then ACMD6, then the host side follows
    pub fn set_data_bus_width(&mut self, bus_width: BusWidth) -> Result<(), InitError> {
        self.send_app_command(SD_ACMD42_SET_CLR_CARD_DETECT, bus_width.acmd42_argument())
            .map_err(InitError::BusWidthNegotiationFailed)?;
        self.send_app_command(SD_ACMD6_SET_BUS_WIDTH, bus_width.acmd6_argument())
            .map_err(InitError::BusWidthNegotiationFailed)?;
        self.card.bus.set_bus_width(bus_width);
        self.card.bus_width = bus_width;
        Ok(())
    }

    /// CMD16, fixed at one sector
    pub fn set_block_length(&mut self) -> Result<(), InitError> {
        self.card
            .bus
            .send_command(SDMMC_CMD16_SET_BLOCKLEN, SD_MMC_BLOCK_SIZE as u32)
            .map_err(InitError::BlockLengthSetFailed)
    }
}
