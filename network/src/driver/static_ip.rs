//! Static address configuration.

use log::info;

use super::traits::NetworkChip;
use crate::types::{AddressMode, NetworkInfo};

/// Switch `info` to static mode and program it into the chip.
///
/// No sanity checking of the addresses happens here. Nothing is persisted;
/// the caller decides. Always succeeds on a responsive chip.
pub fn apply_static<C: NetworkChip + ?Sized>(chip: &mut C, info: &mut NetworkInfo) -> bool {
    info.mode = AddressMode::Static;
    chip.set_network(info);
    info!("[STATIC] {}", info);
    true
}
