//! The memory subordinate (§4.2): an in-memory store behind the full AHB
//! protocol checker — burst validation, exclusive monitor, secure filter,
//! wait-state generation, and byte-strobed writes.

use std::collections::HashMap;

use ahb_core::{
    HExOkay, HNonsec, HReady, HReadyOut, HResp, HSel, HTrans, HWrite, ICmd, IData, SResp,
    SubordinateMonitor, SubordinatePort, SubordinateStatus,
};

use crate::burst::BurstTracker;
use crate::exclusive::{ExclusiveMonitor, Reservation};
use crate::poisson::WaitStateRng;

/// Construction parameters for a [`MemorySubordinate`] (§4.2), the
/// plain-struct configuration style this corpus uses for per-component
/// setup rather than a parsed file or CLI surface (§10).
#[derive(Debug, Clone, Copy)]
pub struct MemorySubordinateConfig {
    /// Byte length of the backing store; must be positive and a multiple of 1024.
    pub length: u64,
    /// Bus width in bytes; must be a power of two in `1..=16` (the `u128`
    /// data-word limit — see [`MemorySubordinate::new`]).
    pub bus_width_bytes: u32,
    pub burst: bool,
    pub exclusive: bool,
    pub secure: bool,
    pub nonsec_read: bool,
    pub nonsec_write: bool,
    pub write_strobe: bool,
    pub min_wait_states: u64,
    pub max_wait_states: u64,
    /// Seed for the deterministic wait-cycle sampler.
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    /// Idle/Busy beat: no checks, no memory access.
    Inactive,
    Read,
    Write { suppress: bool },
    /// Secure filter denial (§4.2.3): forced one wait cycle, `Failed`.
    SecureDenied,
}

#[derive(Debug, Clone, Copy)]
struct ActivePhase {
    cmd: ICmd,
    remaining: u64,
    outcome: Outcome,
    ex_okay: HExOkay,
}

#[derive(Debug, Clone, Copy, Default)]
enum Phase {
    #[default]
    Idle,
    Active(ActivePhase),
}

/// The memory subordinate model.
#[derive(Debug)]
pub struct MemorySubordinate {
    cfg: MemorySubordinateConfig,
    mem: HashMap<u64, u8>,
    burst: BurstTracker,
    excl: ExclusiveMonitor,
    rng: WaitStateRng,

    ready: HReady,
    rsp: SResp,
    phase: Phase,
    last_wdata: u128,
}

impl MemorySubordinate {
    /// Build a new subordinate from its configuration.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero or not a multiple of 1024, or if
    /// `bus_width_bytes` is not a power of two in `1..=16`. (§4.2 describes
    /// the domain up to 128 bytes; this model holds `hRData`/`hWData` in a
    /// `u128`, so a bus wider than 16 bytes cannot be represented and is
    /// rejected here rather than silently truncated or panicking on a lane
    /// shift overflow deep inside `finalize`.)
    #[must_use]
    pub fn new(cfg: MemorySubordinateConfig) -> Self {
        assert!(cfg.length > 0 && cfg.length % 1024 == 0, "length must be a positive multiple of 1024");
        assert!(
            cfg.bus_width_bytes.is_power_of_two() && cfg.bus_width_bytes <= 16,
            "bus width must be a power-of-two byte count up to 16 (u128 data-word limit)"
        );
        Self {
            cfg,
            mem: HashMap::new(),
            burst: BurstTracker::default(),
            excl: ExclusiveMonitor::default(),
            rng: WaitStateRng::new(cfg.seed),
            ready: HReady::Working,
            rsp: SResp::waiting(),
            phase: Phase::Idle,
            last_wdata: 0,
        }
    }

    /// Preload bytes into the store starting at `start_addr` (§6 memory interface).
    pub fn init(&mut self, bytes: &[u8], start_addr: u64) {
        for (i, &b) in bytes.iter().enumerate() {
            self.mem.insert(start_addr + i as u64, b);
        }
    }

    /// Snapshot the full store as `length` bytes, zero-filled where unwritten.
    #[must_use]
    pub fn dump(&self) -> Vec<u8> {
        (0..self.cfg.length)
            .map(|a| *self.mem.get(&a).unwrap_or(&0))
            .collect()
    }

    /// Clear memory, wait state, reservations, and the response latch
    /// (§4.2.6). Feature switches in `cfg` persist.
    pub fn reset(&mut self) {
        self.mem.clear();
        self.burst = BurstTracker::default();
        self.excl.reset();
        self.rsp = SResp::waiting();
        self.phase = Phase::Idle;
    }

    fn wait_mean(&self, trans: HTrans) -> f64 {
        if trans == HTrans::Seq {
            self.cfg.min_wait_states as f64
        } else {
            (self.cfg.min_wait_states + self.cfg.max_wait_states) as f64 / 2.0
        }
    }

    fn finalize(&mut self, active: &ActivePhase, data: IData) {
        let addr = active.cmd.addr;
        let size = active.cmd.size;
        let lane = (addr % u64::from(self.cfg.bus_width_bytes)) as u32;

        self.rsp = match active.outcome {
            Outcome::Inactive => SResp {
                rdata: 0,
                resp: HResp::Successful,
                ready_out: HReadyOut::Ready,
                ex_okay: active.ex_okay,
            },
            Outcome::SecureDenied => SResp {
                rdata: 0,
                resp: HResp::Failed,
                ready_out: HReadyOut::Ready,
                ex_okay: active.ex_okay,
            },
            Outcome::Read => {
                let mut rdata: u128 = 0;
                for i in 0..size.bytes() {
                    let byte = *self.mem.get(&(addr + u64::from(i))).unwrap_or(&0);
                    rdata |= u128::from(byte) << (8 * (lane + i));
                }
                SResp {
                    rdata,
                    resp: HResp::Successful,
                    ready_out: HReadyOut::Ready,
                    ex_okay: active.ex_okay,
                }
            }
            Outcome::Write { suppress } => {
                for i in 0..size.bytes() {
                    let bit = lane + i;
                    let addr_i = addr + u64::from(i);
                    if self.cfg.exclusive {
                        self.excl.touch(addr_i);
                    }
                    if self.cfg.write_strobe && (active.cmd.wstrb >> bit) & 1 == 0 {
                        continue;
                    }
                    if suppress {
                        continue;
                    }
                    let byte = ((data.wdata >> (8 * bit)) & 0xFF) as u8;
                    self.mem.insert(addr_i, byte);
                }
                SResp {
                    rdata: 0,
                    resp: HResp::Successful,
                    ready_out: HReadyOut::Ready,
                    ex_okay: active.ex_okay,
                }
            }
        };
        self.phase = Phase::Idle;
    }
}

impl SubordinatePort for MemorySubordinate {
    fn set_ready(&mut self, ready: HReady) {
        self.ready = ready;
    }

    fn is_ready(&self) -> bool {
        self.ready == HReady::Working
    }

    /// Latch an incoming command (§4.2's `put_cmd`).
    ///
    /// # Panics
    ///
    /// Panics on any testbench-fatal condition: misalignment, oversized
    /// transfer, burst inconsistency, a 1 KiB boundary crossing, or an
    /// exclusive-access protocol violation (§7 tier 1).
    fn put_cmd(&mut self, cmd: ICmd) {
        if self.ready != HReady::Working {
            return;
        }
        if cmd.sel != HSel::Sel || cmd.trans == HTrans::Idle {
            self.phase = Phase::Active(ActivePhase {
                cmd,
                remaining: 0,
                outcome: Outcome::Inactive,
                ex_okay: HExOkay::Failed,
            });
            return;
        }

        // Busy carries a real address/attributes and still participates in
        // burst and exclusive checking (§4.2.1, §4.2.2), but never touches
        // memory and never waits (§4.2.4: "Idle/Busy produce an immediate
        // zero-wait Ready response").
        let busy = cmd.trans == HTrans::Busy;

        let addr = cmd.addr % self.cfg.length;
        assert!(
            addr % u64::from(cmd.size.bytes()) == 0,
            "misaligned transfer: address {addr:#x} is not a multiple of size {:?}",
            cmd.size
        );
        assert!(
            cmd.size.bytes() <= self.cfg.bus_width_bytes,
            "transfer size {:?} exceeds bus width {} bytes",
            cmd.size,
            self.cfg.bus_width_bytes
        );

        if self.cfg.burst {
            assert!(
                self.burst.in_progress() || matches!(cmd.trans, HTrans::NonSeq),
                "Seq/Busy beat with no burst in progress"
            );
            self.burst.on_beat(addr, cmd.size, cmd.burst, cmd.trans, cmd.write, cmd.prot);
        }

        let secure_denied = !busy
            && self.cfg.secure
            && cmd.nonsec == HNonsec::NonSecure
            && match cmd.write {
                HWrite::Read => !self.cfg.nonsec_read,
                HWrite::Write => !self.cfg.nonsec_write,
            };

        // The original checks the secure filter and returns before ever
        // touching the exclusive monitor (SimMem1PSubordinate's
        // `process_secure_transfer` / `process_exclusive_transfer` order):
        // a secure-denied exclusive read must not admit a reservation or
        // report `hExOkay=Successful`.
        let mut ex_okay = HExOkay::Failed;
        let mut suppress_write = false;
        if self.cfg.exclusive && !secure_denied {
            ExclusiveMonitor::validate_shape(cmd.excl, cmd.trans, self.cfg.burst, cmd.burst);
            let reservation = Reservation {
                addr,
                size: cmd.size,
                prot: cmd.prot,
                burst: cmd.burst,
                master: cmd.master,
                nonsec: cmd.nonsec,
            };
            let outcome = self.excl.begin(reservation, cmd.write, cmd.excl);
            ex_okay = outcome.ex_okay;
            suppress_write = outcome.suppress_write;
        }

        let (remaining, outcome) = if busy {
            (0, Outcome::Inactive)
        } else if secure_denied {
            (1, Outcome::SecureDenied)
        } else {
            let sampled = self.rng.sample_poisson(self.wait_mean(cmd.trans)).min(self.cfg.max_wait_states);
            let outcome = match cmd.write {
                HWrite::Read => Outcome::Read,
                HWrite::Write => Outcome::Write { suppress: suppress_write },
            };
            (sampled, outcome)
        };

        self.phase = Phase::Active(ActivePhase {
            cmd: ICmd { addr, sel: HSel::Sel, ..cmd },
            remaining,
            outcome,
            ex_okay,
        });
        self.rsp = SResp::waiting();
    }

    /// Advance the wait-state engine by one cycle and, if due, apply the
    /// write or compose the read response (§4.2.4, §4.2.5). Invoked once
    /// per cycle for every subordinate by the interconnect's `proc_data`
    /// step (§4.5), which is what gives the wait counter a per-cycle tick
    /// without a dedicated `process` method in the subordinate interface.
    fn put_data(&mut self, data: IData) {
        self.last_wdata = data.wdata;
        let Phase::Active(active) = self.phase else {
            return;
        };
        if active.remaining > 0 {
            self.phase = Phase::Active(ActivePhase {
                remaining: active.remaining - 1,
                ..active
            });
            self.rsp = SResp::waiting();
            return;
        }
        self.finalize(&active, data);
    }

    fn get_rsp(&self) -> SResp {
        self.rsp
    }
}

impl SubordinateMonitor for MemorySubordinate {
    fn status(&self) -> SubordinateStatus {
        let command = match self.phase {
            Phase::Active(active) => active.cmd,
            Phase::Idle => ICmd::default(),
        };
        SubordinateStatus {
            ready: self.ready,
            command,
            response: self.rsp,
            wdata: self.last_wdata,
        }
    }
}
