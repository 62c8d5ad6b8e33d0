//! Flash sector assignment.

use picogpio_hwinit::FLASH_SECTOR_SIZE;

/// Flash size of the Pico / Pico 2 boards the firmware ships on.
pub const PICO_FLASH_SIZE: u32 = 2 * 1024 * 1024;

/// A persisted block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Network addressing (last sector)
    Network,
    /// TCP command server port
    TcpPort,
    /// RS-232 UART baud rate
    UartBaud,
    /// Debug category flags
    DebugFlags,
    /// GPIO board settings
    Gpio,
}

impl Block {
    /// Sector index counted back from the end of flash (1 = last sector).
    const fn sectors_from_end(self) -> u32 {
        match self {
            Block::Network => 1,
            Block::TcpPort => 2,
            Block::UartBaud => 3,
            Block::DebugFlags => 4,
            Block::Gpio => 5,
        }
    }
}

/// A contiguous flash range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashRegion {
    pub offset: u32,
    pub len: u32,
}

/// Maps blocks to sectors for a device of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    capacity: u32,
}

impl Layout {
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Sector owned by `block`, or `None` if the device is too small.
    pub fn region(&self, block: Block) -> Option<FlashRegion> {
        let back = block.sectors_from_end().checked_mul(FLASH_SECTOR_SIZE)?;
        let offset = self.capacity.checked_sub(back)?;
        Some(FlashRegion { offset, len: FLASH_SECTOR_SIZE })
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(PICO_FLASH_SIZE)
    }
}
