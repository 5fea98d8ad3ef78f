//! Command and data-phase value types exchanged across the fabric.

use crate::types::{HBurst, HExcl, HMastlock, HNonsec, HProt, HSel, HSize, HTrans, HWrite};

/// A command as presented by a manager in the address phase.
///
/// The all-defaults form (`MCmd::default()`) is the reset value: an `Idle`
/// transfer that no subordinate will act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MCmd {
    pub addr: u64,
    pub burst: HBurst,
    pub mastlock: HMastlock,
    pub prot: HProt,
    pub size: HSize,
    pub nonsec: HNonsec,
    pub excl: HExcl,
    /// Locally-assigned master id, as presented by the manager (low nibble
    /// only; the interconnect folds in the fabric-wide id on dispatch).
    pub master: u8,
    pub trans: HTrans,
    pub wstrb: u128,
    pub write: HWrite,
}

impl Default for MCmd {
    fn default() -> Self {
        Self {
            addr: 0,
            burst: HBurst::default(),
            mastlock: HMastlock::default(),
            prot: HProt::default(),
            size: HSize::default(),
            nonsec: HNonsec::default(),
            excl: HExcl::default(),
            master: 0,
            trans: HTrans::default(),
            wstrb: 0,
            write: HWrite::default(),
        }
    }
}

impl MCmd {
    /// Build an all-ones write-strobe mask for a given bus byte width.
    ///
    /// `hWstrb` defaults to all-ones for the bus width (§4.1): a write with
    /// no explicit strobe touches every byte of the transfer. One bit per
    /// bus byte, so the widest wire-level bus width in the §3 domain
    /// (128 bytes) needs the full 128 bits — hence `u128`, not `u32` — even
    /// though a particular subordinate model (e.g. the memory subordinate,
    /// bounded by its own data-word representation) may support only a
    /// narrower data path.
    #[must_use]
    pub const fn all_ones_strobe(bus_byte_width: u32) -> u128 {
        if bus_byte_width >= 128 {
            u128::MAX
        } else {
            (1 << bus_byte_width) - 1
        }
    }

    /// Tag this command as addressed to a particular subordinate and give it
    /// the fabric-wide master id assigned by the interconnect.
    #[must_use]
    pub const fn into_icmd(self, fabric_master: u8) -> ICmd {
        ICmd {
            addr: self.addr,
            burst: self.burst,
            mastlock: self.mastlock,
            prot: self.prot,
            size: self.size,
            nonsec: self.nonsec,
            excl: self.excl,
            master: fabric_master,
            trans: self.trans,
            wstrb: self.wstrb,
            write: self.write,
            sel: HSel::Sel,
        }
    }
}

/// A command as seen at a subordinate: `MCmd` plus the select flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ICmd {
    pub addr: u64,
    pub burst: HBurst,
    pub mastlock: HMastlock,
    pub prot: HProt,
    pub size: HSize,
    pub nonsec: HNonsec,
    pub excl: HExcl,
    pub master: u8,
    pub trans: HTrans,
    pub wstrb: u128,
    pub write: HWrite,
    pub sel: HSel,
}

impl Default for ICmd {
    fn default() -> Self {
        Self {
            addr: 0,
            burst: HBurst::default(),
            mastlock: HMastlock::default(),
            prot: HProt::default(),
            size: HSize::default(),
            nonsec: HNonsec::default(),
            excl: HExcl::default(),
            master: 0,
            trans: HTrans::default(),
            wstrb: 0,
            write: HWrite::default(),
            sel: HSel::default(),
        }
    }
}

impl ICmd {
    /// Whether this command should be treated as addressed and non-idle,
    /// i.e. the bits that matter for burst/exclusive tracking.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.sel, HSel::Sel) && !matches!(self.trans, HTrans::Idle | HTrans::Busy)
    }
}

/// Write-data payload presented by a manager in the data phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MData {
    pub wdata: u128,
}

/// Write-data payload as forwarded to a subordinate by the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IData {
    pub wdata: u128,
}
