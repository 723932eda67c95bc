/// Progress of one multi-block request
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub total: u32,
    pub remain: u32,
}

impl Transaction {
    pub fn new(num_blocks: u32) -> Self {
        Self { total: num_blocks, remain: num_blocks }
    }

    /// Blocks already delivered
    pub fn done(&self) -> u32 {
        self.total - self.remain
    }
}
