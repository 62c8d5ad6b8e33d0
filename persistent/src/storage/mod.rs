//! Flash-backed record storage.
//!
//! `save` is erase-then-program with interrupts masked for the whole window.
//! A power cut between the two leaves an erased sector, which `load` reports
//! as "no record" like any other invalid blob. Nothing attempts repair.

use log::{debug, info};
use thiserror::Error;

use picogpio_hwinit::{without_interrupts, Flash, FlashError, InterruptControl, InterruptGuard, FLASH_PAGE_SIZE};

use crate::layout::{Block, FlashRegion, Layout};
use crate::record::{self, Record};

/// Largest framed record. Every record fits a single program page.
pub const MAX_RECORD_LEN: usize = FLASH_PAGE_SIZE as usize;

/// Storage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("flash: {0}")]
    Flash(#[from] FlashError),
    /// Record does not fit in one flash page
    #[error("record too large ({len} bytes)")]
    RecordTooLarge { len: usize },
    /// Flash too small to hold the block
    #[error("no flash region for {0:?}")]
    NoRegion(Block),
}

/// Typed access to the record blocks of one flash device.
pub struct RecordStore<F: Flash, I: InterruptControl> {
    flash: F,
    irq: I,
    layout: Layout,
}

impl<F: Flash, I: InterruptControl> RecordStore<F, I> {
    /// Create a store spanning the whole device.
    pub fn new(flash: F, irq: I) -> Self {
        let layout = Layout::new(flash.capacity());
        Self { flash, irq, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Give back the underlying flash and interrupt controller.
    pub fn into_inner(self) -> (F, I) {
        (self.flash, self.irq)
    }

    fn region(&self, block: Block) -> Result<FlashRegion, StoreError> {
        self.layout.region(block).ok_or(StoreError::NoRegion(block))
    }

    /// Read and validate the record of type `R`.
    ///
    /// Returns `None` for erased, foreign, outdated, truncated or corrupted
    /// blobs and for read failures. Read-only.
    pub fn load<R: Record>(&self) -> Option<R> {
        let len = R::encoded_len();
        if len > MAX_RECORD_LEN {
            debug!("[CONFIG] {:?}: record too large ({} bytes)", R::BLOCK, len);
            return None;
        }
        let region = self.layout.region(R::BLOCK)?;

        let mut buf = [0xFFu8; MAX_RECORD_LEN];
        if let Err(e) = self.flash.read(region.offset, &mut buf[..len]) {
            debug!("[CONFIG] {:?}: read failed: {}", R::BLOCK, e);
            return None;
        }

        match record::decode::<R>(&buf[..len]) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("[CONFIG] {:?}: no valid record ({})", R::BLOCK, e);
                None
            }
        }
    }

    /// Erase the block and program a freshly framed `record`.
    ///
    /// Blocking; interrupts stay masked until both steps finish or one fails.
    pub fn save<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let len = R::encoded_len();
        if len > MAX_RECORD_LEN {
            return Err(StoreError::RecordTooLarge { len });
        }
        let region = self.region(R::BLOCK)?;

        // Unused tail stays in the erased state.
        let mut page = [0xFFu8; MAX_RECORD_LEN];
        record::encode(record, &mut page).map_err(|_| StoreError::RecordTooLarge { len })?;

        {
            let _guard = InterruptGuard::new(&mut self.irq);
            self.flash.erase(region.offset, region.len)?;
            self.flash.program(region.offset, &page)?;
        }

        info!("[CONFIG] {:?} saved ({} bytes at {:#x})", R::BLOCK, len, region.offset);
        Ok(())
    }

    /// Invalidate a block. The next `load` returns `None`.
    pub fn erase(&mut self, block: Block) -> Result<(), StoreError> {
        let region = self.region(block)?;
        without_interrupts(&mut self.irq, || self.flash.erase(region.offset, region.len))?;
        info!("[CONFIG] {:?} erased", block);
        Ok(())
    }
}
