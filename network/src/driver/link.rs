//! PHY link status.

use super::traits::NetworkChip;

/// PHYCFGR bit 0: link up.
pub const PHYCFGR_LNK_ON: u8 = 1 << 0;
/// PHYCFGR bit 1: 100 Mbit/s.
pub const PHYCFGR_SPD_100: u8 = 1 << 1;
/// PHYCFGR bit 2: full duplex.
pub const PHYCFGR_DPX_FULL: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSpeed {
    Mbps10,
    Mbps100,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplex {
    Half,
    Full,
}

/// Decoded PHY configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhyStatus {
    pub link_up: bool,
    pub speed: LinkSpeed,
    pub duplex: Duplex,
}

impl PhyStatus {
    pub fn from_register(reg: u8) -> Self {
        Self {
            link_up: reg & PHYCFGR_LNK_ON != 0,
            speed: if reg & PHYCFGR_SPD_100 != 0 { LinkSpeed::Mbps100 } else { LinkSpeed::Mbps10 },
            duplex: if reg & PHYCFGR_DPX_FULL != 0 { Duplex::Full } else { Duplex::Half },
        }
    }
}

/// Cable presence probe.
pub struct LinkProbe;

impl LinkProbe {
    /// Single synchronous read of the link bit.
    #[inline]
    pub fn is_link_up<C: NetworkChip + ?Sized>(chip: &mut C) -> bool {
        chip.phy_config() & PHYCFGR_LNK_ON != 0
    }

    /// Full PHY status (link, speed, duplex).
    pub fn status<C: NetworkChip + ?Sized>(chip: &mut C) -> PhyStatus {
        PhyStatus::from_register(chip.phy_config())
    }
}
