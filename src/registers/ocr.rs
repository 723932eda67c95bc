use bit_field::BitField;

/// Operating Conditions Register, as sent with ACMD41 and returned in its R3 response
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OcrRegister {
    pub val: u32,
}

impl OcrRegister {
    pub fn set_vdd_27_28(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(15, value);
        self
    }

    pub fn set_vdd_28_29(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(16, value);
        self
    }

    pub fn set_vdd_29_30(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(17, value);
        self
    }

    pub fn set_vdd_30_31(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(18, value);
        self
    }

    pub fn set_vdd_31_32(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(19, value);
        self
    }

    pub fn set_vdd_32_33(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(20, value);
        self
    }

    pub fn set_vdd_33_34(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(21, value);
        self
    }

    pub fn set_vdd_34_35(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(22, value);
        self
    }

    pub fn set_vdd_35_36(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(23, value);
        self
    }

    /// HCS in the ACMD41 argument, CCS in the response
    pub fn set_high_capacity_support(&mut self, value: bool) -> &mut Self {
        self.val.set_bit(30, value);
        self
    }

    pub fn card_capacity_status(&self) -> bool {
        self.val.get_bit(30)
    }

    /// Busy bit, low while the card is still running its power-up routine
    pub fn card_powered_up_status(&self) -> bool {
        self.val.get_bit(31)
    }
}

/// Host voltage window, 2.7-3.6V
pub fn ocr_voltage_support() -> OcrRegister {
    let mut ocr = OcrRegister { val: 0 };
    ocr.set_vdd_27_28(true)
        .set_vdd_28_29(true)
        .set_vdd_29_30(true)
        .set_vdd_30_31(true)
        .set_vdd_31_32(true)
        .set_vdd_32_33(true)
        .set_vdd_33_34(true)
        .set_vdd_34_35(true)
        .set_vdd_35_36(true);
    ocr
}
