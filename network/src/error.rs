//! Network error types

use picogpio_persistent::StoreError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, NetworkError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Version register did not read back the expected value
    #[error("offload chip unresponsive (version register {version:#04x})")]
    HardwareUnresponsive { version: u8 },
    /// Address mode byte is neither static nor DHCP
    #[error("invalid address mode {0}")]
    InvalidMode(u8),
    /// Persisting the network record failed
    #[error("config store: {0}")]
    Store(#[from] StoreError),
}
