//! Closed enumerations for the AHB wire protocol.
//!
//! Every domain here has a fixed integer encoding matching the bus signal it
//! stands for (`HBurst` is the `HBURST[2:0]` encoding, and so on). The
//! `Default` impl of each always picks the value the real signal resets to.

/// Burst kind carried on `HBURST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HBurst {
    Single = 0b000,
    Incr = 0b001,
    Wrap4 = 0b010,
    Incr4 = 0b011,
    Wrap8 = 0b100,
    Incr8 = 0b101,
    Wrap16 = 0b110,
    Incr16 = 0b111,
}

impl Default for HBurst {
    fn default() -> Self {
        Self::Incr
    }
}

impl HBurst {
    /// Beat count of a fixed-length burst, or `None` for `Single`/unbounded `Incr`.
    #[must_use]
    pub const fn fixed_len(self) -> Option<u32> {
        match self {
            Self::Wrap4 | Self::Incr4 => Some(4),
            Self::Wrap8 | Self::Incr8 => Some(8),
            Self::Wrap16 | Self::Incr16 => Some(16),
            Self::Single | Self::Incr => None,
        }
    }

    /// `true` for the three `WrapN` encodings.
    #[must_use]
    pub const fn is_wrapping(self) -> bool {
        matches!(self, Self::Wrap4 | Self::Wrap8 | Self::Wrap16)
    }
}

/// Transfer type carried on `HTRANS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HTrans {
    #[default]
    Idle = 0b00,
    Busy = 0b01,
    NonSeq = 0b10,
    Seq = 0b11,
}

/// Read/write direction carried on `HWRITE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HWrite {
    #[default]
    Read = 0b0,
    Write = 0b1,
}

/// Transfer size as `log2(bytes)`, carried on `HSIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HSize {
    #[default]
    Byte = 0b000,
    Halfword = 0b001,
    Word = 0b010,
    Doubleword = 0b011,
    Quadword = 0b100,
    Octupleword = 0b101,
    Bit512 = 0b110,
    Bit1024 = 0b111,
}

impl HSize {
    /// Number of bytes this size transfers (`2^hSize`).
    #[must_use]
    pub const fn bytes(self) -> u32 {
        1 << (self as u8)
    }
}

/// Secure/non-secure qualifier carried on `HNONSEC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HNonsec {
    #[default]
    Secure = 0b0,
    NonSecure = 0b1,
}

/// Exclusive-access qualifier carried on `HEXCL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HExcl {
    #[default]
    NonExcl = 0b0,
    Excl = 0b1,
}

/// Locked-sequence qualifier carried on `HMASTLOCK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HMastlock {
    #[default]
    UnLocked = 0b0,
    Locked = 0b1,
}

/// Subordinate-select qualifier carried on `HSEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HSel {
    #[default]
    NotSel = 0b0,
    Sel = 0b1,
}

/// Response kind carried on `HRESP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HResp {
    #[default]
    Successful = 0b0,
    Failed = 0b1,
}

/// Exclusive-access result carried on `HEXOKAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HExOkay {
    #[default]
    Failed = 0b0,
    Successful = 0b1,
}

/// Interconnect-to-manager ready signal (drives `HREADY` on the manager side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HReady {
    #[default]
    WaitState = 0b0,
    Working = 0b1,
}

/// Subordinate-driven ready signal (`HREADYOUT`), consumed by the interconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HReadyOut {
    #[default]
    NotReady = 0b0,
    Ready = 0b1,
}

/// Protection descriptor carried on `HPROT`.
///
/// A plain value type, not a bitfield: AHB defines these as independent
/// signal lines rather than a packed register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HProt {
    pub data: bool,
    pub privileged: bool,
    pub bufferable: bool,
    pub modifiable: bool,
    pub lookup: bool,
    pub allocate: bool,
    pub shareable: bool,
}

impl Default for HProt {
    /// Data-side, privileged, non-bufferable/modifiable/shareable: the reset
    /// value a CPU-attached manager typically drives.
    fn default() -> Self {
        Self {
            data: true,
            privileged: true,
            bufferable: false,
            modifiable: false,
            lookup: false,
            allocate: false,
            shareable: false,
        }
    }
}
