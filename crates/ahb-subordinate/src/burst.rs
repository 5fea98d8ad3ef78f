//! Burst tracker (§4.2.1): validates beat-to-beat consistency of a
//! multi-beat transfer and predicts each beat's expected address.

use std::collections::VecDeque;

use ahb_core::{HBurst, HProt, HSize, HTrans, HWrite};

/// Per-subordinate burst-in-progress state.
#[derive(Debug, Default)]
pub struct BurstTracker {
    active: Option<ActiveBurst>,
}

#[derive(Debug)]
struct ActiveBurst {
    addrs: BurstAddrs,
    size: HSize,
    kind: HBurst,
    write: HWrite,
    prot: HProt,
}

#[derive(Debug)]
enum BurstAddrs {
    /// Remaining expected addresses of a fixed-length `WrapN`/`IncrN` burst.
    Fixed(VecDeque<u64>),
    /// The single next address of an unbounded `Incr` burst.
    Incr(u64),
}

impl BurstAddrs {
    fn peek(&self) -> u64 {
        match self {
            Self::Fixed(q) => *q.front().expect("fixed burst tracked with no remaining beats"),
            Self::Incr(next) => *next,
        }
    }

    /// Advance past the current beat. Returns `true` if the burst is
    /// complete (fixed-length only; `Incr` never completes on its own).
    fn advance(&mut self, size: HSize) -> bool {
        match self {
            Self::Fixed(q) => {
                q.pop_front();
                q.is_empty()
            }
            Self::Incr(next) => {
                *next += u64::from(size.bytes());
                false
            }
        }
    }

    fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Beats N for the fixed-length burst kinds, derived directly from the
/// `HBurst` discriminant rather than by re-deriving it from a boundary
/// check (see the Open Question in SPEC_FULL.md §9: the distilled source
/// compares a beat-1 boundary check against `Incr4` twice, which reads as
/// a copy-paste of the `Incr8` branch — this derives N from the kind
/// itself instead of replicating that).
fn fixed_len(kind: HBurst) -> Option<u32> {
    kind.fixed_len()
}

impl BurstTracker {
    /// Validate and track one beat of a transfer.
    ///
    /// # Panics
    ///
    /// Panics on any of the fatal mid-burst mismatches in §4.2.1: a beat-1
    /// `IncrN` crossing a 1 KiB boundary, or a `Seq`/`Busy` beat whose
    /// address, size, kind, write direction, or protection doesn't match
    /// the burst in progress.
    pub fn on_beat(
        &mut self,
        addr: u64,
        size: HSize,
        kind: HBurst,
        trans: HTrans,
        write: HWrite,
        prot: HProt,
    ) {
        let Some(burst) = &mut self.active else {
            if trans == HTrans::NonSeq {
                self.start(addr, size, kind, write, prot);
            }
            return;
        };

        if matches!(trans, HTrans::Idle | HTrans::NonSeq) {
            if burst.addrs.is_fixed() {
                log::warn!("{trans:?} inside a fixed-length burst, possible master switch");
            }
            self.active = None;
            self.on_beat(addr, size, kind, trans, write, prot);
            return;
        }

        if trans == HTrans::Busy {
            // Legal inside a burst, consumes no slot (§4.2.1): no beat-matching
            // is required since nothing actually advances.
            return;
        }

        assert_eq!(addr, burst.addrs.peek(), "incorrect burst address: {addr:#x}");
        assert_eq!(size, burst.size, "incorrect burst size");
        assert_eq!(kind, burst.kind, "incorrect burst type");
        assert_eq!(write, burst.write, "incorrect burst operation");
        assert_eq!(prot, burst.prot, "incorrect burst protection");

        if burst.addrs.advance(size) {
            self.active = None;
        }
    }

    /// Whether a `Seq`/`Busy` beat arriving right now would have no burst
    /// in progress to belong to — a fatal condition the caller raises.
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.active.is_some()
    }

    fn start(&mut self, addr: u64, size: HSize, kind: HBurst, write: HWrite, prot: HProt) {
        let Some(n) = fixed_len(kind) else {
            self.active = if kind == HBurst::Incr {
                Some(ActiveBurst {
                    addrs: BurstAddrs::Incr(addr + u64::from(size.bytes())),
                    size,
                    kind,
                    write,
                    prot,
                })
            } else {
                None // Single: not tracked.
            };
            return;
        };

        let step = u64::from(size.bytes());
        let addrs: VecDeque<u64> = if kind.is_wrapping() {
            let span = u64::from(n) * step;
            let base = addr & !(span - 1);
            let offset = addr % span;
            (1..n)
                .map(|i| base + (offset + u64::from(i) * step) % span)
                .collect()
        } else {
            let last = addr + u64::from(n - 1) * step;
            assert_eq!(
                addr / 1024,
                last / 1024,
                "incrementing burst crosses 1KiB boundary"
            );
            (1..n).map(|i| addr + u64::from(i) * step).collect()
        };

        self.active = Some(ActiveBurst {
            addrs: BurstAddrs::Fixed(addrs),
            size,
            kind,
            write,
            prot,
        });
    }
}
