//! Common test utilities: in-memory flash

#![allow(dead_code)]

use picogpio_hwinit::{flash::check_range, Flash, FlashError, InterruptControl, FLASH_SECTOR_SIZE};

/// In-memory flash, erased on creation
#[derive(Debug, Clone)]
pub struct MemFlash {
    pub data: Vec<u8>,
    pub erases: u32,
}

impl MemFlash {
    pub fn new(sectors: u32) -> Self {
        Self { data: vec![0xFF; (sectors * FLASH_SECTOR_SIZE) as usize], erases: 0 }
    }
}

impl Flash for MemFlash {
    fn capacity(&self) -> u32 {
        self.data.len() as u32
    }

    fn erase(&mut self, offset: u32, len: u32) -> Result<(), FlashError> {
        check_range(self.capacity(), offset, len)?;
        if offset % FLASH_SECTOR_SIZE != 0 {
            return Err(FlashError::Unaligned { offset });
        }
        self.data[offset as usize..(offset + len) as usize].fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn program(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
        check_range(self.capacity(), offset, data.len() as u32)?;
        let start = offset as usize;
        // NOR flash only clears bits
        for (cell, byte) in self.data[start..start + data.len()].iter_mut().zip(data) {
            *cell &= *byte;
        }
        Ok(())
    }

    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        check_range(self.capacity(), offset, buf.len() as u32)?;
        let start = offset as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }
}

/// Interrupt controller that counts masked windows
#[derive(Debug, Default)]
pub struct CountingIrq {
    pub masked: bool,
    pub windows: u32,
}

impl InterruptControl for CountingIrq {
    fn disable(&mut self) -> bool {
        self.windows += 1;
        let was_enabled = !self.masked;
        self.masked = true;
        was_enabled
    }

    fn restore(&mut self, was_enabled: bool) {
        self.masked = !was_enabled;
    }
}
