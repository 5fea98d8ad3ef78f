//! Exclusive-access monitor (§4.2.2): a reserve-modify-commit protocol
//! resembling LL/SC, scoped to a single subordinate.

use std::collections::HashSet;

use ahb_core::{HBurst, HExOkay, HExcl, HNonsec, HProt, HSize, HTrans, HWrite};

/// A reservation tuple, keyed by value (§9: a flat collection, no
/// back-pointers — `watched` is the reverse index into this set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reservation {
    pub addr: u64,
    pub size: HSize,
    pub prot: HProt,
    pub burst: HBurst,
    pub master: u8,
    pub nonsec: HNonsec,
}

impl Reservation {
    fn bytes(&self) -> impl Iterator<Item = u64> + use<> {
        let addr = self.addr;
        let end = addr + u64::from(self.size.bytes());
        addr..end
    }
}

/// Outcome of admitting an exclusive beat: the `hExOkay` value to report,
/// and whether the caller should suppress the memory write that would
/// otherwise follow (a stale exclusive write never touches memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusiveOutcome {
    pub ex_okay: HExOkay,
    pub suppress_write: bool,
}

/// Per-subordinate exclusive-access state.
#[derive(Debug, Default)]
pub struct ExclusiveMonitor {
    watched: HashSet<u64>,
    reservations: HashSet<Reservation>,
    failed: HashSet<Reservation>,
}

impl ExclusiveMonitor {
    /// Clear all reservation state (§4.2.6 reset).
    pub fn reset(&mut self) {
        self.watched.clear();
        self.reservations.clear();
        self.failed.clear();
    }

    /// Validate that an exclusive beat's transfer shape is legal.
    ///
    /// # Panics
    ///
    /// Panics if an exclusive transfer carries `Busy`, or (when bursts are
    /// enabled) a burst kind other than `Single`/`Incr`.
    pub fn validate_shape(excl: HExcl, trans: HTrans, burst_enabled: bool, burst: HBurst) {
        if excl != HExcl::Excl {
            return;
        }
        assert!(
            trans != HTrans::Busy,
            "exclusive transfer cannot have a BUSY command; use IDLE, which is not part of the exclusive transfer"
        );
        if burst_enabled {
            assert!(
                matches!(burst, HBurst::Single | HBurst::Incr),
                "exclusive transfer must be single-beat or plain Incr, got {burst:?}"
            );
        }
    }

    /// Admit one exclusive beat (§4.2.2). Non-exclusive beats are a no-op
    /// that reports `hExOkay = Failed` (the reset value).
    ///
    /// # Panics
    ///
    /// Panics on an exclusive read whose reservation tuple is already held
    /// — two exclusive reads in a row without an intervening write.
    pub fn begin(&mut self, reservation: Reservation, write: HWrite, excl: HExcl) -> ExclusiveOutcome {
        if excl != HExcl::Excl {
            return ExclusiveOutcome {
                ex_okay: HExOkay::Failed,
                suppress_write: false,
            };
        }
        match write {
            HWrite::Read => {
                assert!(
                    !self.reservations.contains(&reservation),
                    "exclusive read after exclusive read without an intervening write: {reservation:?}"
                );
                self.watched.extend(reservation.bytes());
                self.reservations.insert(reservation);
                ExclusiveOutcome {
                    ex_okay: HExOkay::Successful,
                    suppress_write: false,
                }
            }
            HWrite::Write => {
                if !self.reservations.contains(&reservation) || self.failed.contains(&reservation) {
                    self.failed.remove(&reservation);
                    ExclusiveOutcome {
                        ex_okay: HExOkay::Failed,
                        suppress_write: true,
                    }
                } else {
                    ExclusiveOutcome {
                        ex_okay: HExOkay::Successful,
                        suppress_write: false,
                    }
                }
            }
        }
    }

    /// Invalidate any reservation covering `addr`. Called for every byte a
    /// write — exclusive or not, successful or suppressed — actually
    /// targets, per §4.2.2's collision rule.
    pub fn touch(&mut self, addr: u64) {
        if !self.watched.remove(&addr) {
            return;
        }
        let stale: Vec<Reservation> = self
            .reservations
            .iter()
            .copied()
            .filter(|r| r.bytes().any(|b| b == addr))
            .collect();
        for r in stale {
            self.reservations.remove(&r);
            self.failed.insert(r);
        }
    }
}
