use bit_field::BitField;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SdCsdStructureVersion {
    Ver1d0 = 0,
    /// High capacity, C_SIZE widened to 22 bits
    Ver2d0 = 1,
    Unknown = 3,
}

/// Card-Specific Data as four response words, `val[0]` holding bits 127..96
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CsdRegister {
    pub val: [u32; 4],
}

impl CsdRegister {
    /// `width` bits starting at `lsb` of the 128-bit register. Fields may straddle two words.
    fn bits(&self, lsb: usize, width: usize) -> u32 {
        let mut value = 0u32;
        for bit in (lsb..lsb + width).rev() {
            let word = self.val[3 - bit / 32];
            value = (value << 1) | word.get_bit(bit % 32) as u32;
        }
        value
    }

    fn bit(&self, bit: usize) -> bool {
        self.bits(bit, 1) == 1
    }

    pub fn sd_csd_structure_version(&self) -> SdCsdStructureVersion {
        match self.bits(126, 2) {
            0 => SdCsdStructureVersion::Ver1d0,
            1 => SdCsdStructureVersion::Ver2d0,
            _ => SdCsdStructureVersion::Unknown,
        }
    }

    pub fn transmission_speed(&self) -> u8 {
        self.bits(96, 8) as u8
    }

    /// READ_BL_LEN [83:80]
    pub fn read_bl_length(&self) -> u8 {
        self.bits(80, 4) as u8
    }

    /// READ_BL_PARTIAL [79]
    pub fn read_bl_partial(&self) -> bool {
        self.bit(79)
    }

    /// WRITE_BLK_MISALIGN [78]
    pub fn write_blk_misalign(&self) -> bool {
        self.bit(78)
    }

    /// READ_BLK_MISALIGN [77]
    pub fn read_blk_misalign(&self) -> bool {
        self.bit(77)
    }

    /// C_SIZE [73:62], CSD version 1.0
    pub fn card_size(&self) -> u16 {
        self.bits(62, 12) as u16
    }

    /// C_SIZE_MULT [49:47], CSD version 1.0
    pub fn card_size_multiplier(&self) -> u8 {
        self.bits(47, 3) as u8
    }

    /// C_SIZE [69:48], CSD version 2.0
    pub fn sd_2_0_card_size(&self) -> u32 {
        self.bits(48, 22)
    }

    /// WRITE_BL_LEN [25:22]
    pub fn write_bl_length(&self) -> u8 {
        self.bits(22, 4) as u8
    }

    /// WRITE_BL_PARTIAL [21]
    pub fn write_bl_partial(&self) -> bool {
        self.bit(21)
    }
}

/// The subset of the CSD the driver acts on
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CsdInfo {
    pub structure: SdCsdStructureVersion,
    pub read_bl_len: u8,
    pub read_bl_partial: bool,
    pub write_blk_misalign: bool,
    pub read_blk_misalign: bool,
    pub write_bl_len: u8,
    pub write_bl_partial: bool,
    /// C_SIZE in the width of the structure version
    pub c_size: u32,
    /// Zero for CSD version 2.0
    pub c_size_mult: u8,
}

impl CsdInfo {
    pub fn max_read_block_length(&self) -> u32 {
        1 << self.read_bl_len
    }

    pub fn mult(&self) -> u32 {
        1 << (self.c_size_mult as u32 + 2)
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> u64 {
        match self.structure {
            SdCsdStructureVersion::Ver2d0 => (self.c_size as u64 + 1) * 512 * 1024,
            _ => {
                self.max_read_block_length() as u64 * self.mult() as u64 * (self.c_size as u64 + 1)
            }
        }
    }
}

pub fn decode_csd(words: [u32; 4]) -> CsdInfo {
    let csd = CsdRegister { val: words };
    let structure = csd.sd_csd_structure_version();
    let (c_size, c_size_mult) = match structure {
        SdCsdStructureVersion::Ver2d0 => (csd.sd_2_0_card_size(), 0),
        _ => (csd.card_size() as u32, csd.card_size_multiplier()),
    };
    CsdInfo {
        structure,
        read_bl_len: csd.read_bl_length(),
        read_bl_partial: csd.read_bl_partial(),
        write_blk_misalign: csd.write_blk_misalign(),
        read_blk_misalign: csd.read_blk_misalign(),
        write_bl_len: csd.write_bl_length(),
        write_bl_partial: csd.write_bl_partial(),
        c_size,
        c_size_mult,
    }
}
