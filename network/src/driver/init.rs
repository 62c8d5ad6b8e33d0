//! Offload chip bring-up.

use log::{debug, info, warn};

use picogpio_hwinit::Timer;

use super::link::LinkProbe;
use super::traits::NetworkChip;
use crate::error::{NetworkError, Result};
use crate::mainloop::context::LifecycleConfig;

/// VERSIONR value of a W5500.
pub const W5500_VERSION: u8 = 0x04;

/// Soft-reset the chip, verify it answers, and wait (bounded) for a link.
///
/// Returns whether the link came up. A missing cable is not an error here;
/// the connectivity monitor deals with it. A wrong version register is.
pub fn initialize_chip<C, T>(chip: &mut C, timer: &mut T, config: &LifecycleConfig) -> Result<bool>
where
    C: NetworkChip + ?Sized,
    T: Timer + ?Sized,
{
    chip.soft_reset();
    timer.delay_ms(config.chip_reset_settle_ms);

    let version = chip.version();
    if version != config.chip_version {
        warn!("[CHIP] version register {:#04x}, expected {:#04x}", version, config.chip_version);
        return Err(NetworkError::HardwareUnresponsive { version });
    }

    for poll in 0..config.link_wait_polls {
        if LinkProbe::is_link_up(chip) {
            info!("[CHIP] ready, link up after {} polls", poll);
            return Ok(true);
        }
        timer.delay_ms(config.link_wait_interval_ms);
    }

    debug!("[CHIP] ready, no link");
    Ok(false)
}
