//! Board identity.

/// Length of the board-unique identifier (RP2040/RP2350 flash unique id).
pub const UNIQUE_ID_LEN: usize = 8;

/// Source of the board-unique identifier burned into the flash die.
pub trait BoardIdentity {
    /// Read the unique id. The value never changes for a given board.
    fn unique_id(&self) -> [u8; UNIQUE_ID_LEN];
}

impl<T: BoardIdentity + ?Sized> BoardIdentity for &T {
    fn unique_id(&self) -> [u8; UNIQUE_ID_LEN] {
        (**self).unique_id()
    }
}
