//! Address decode, manager<->subordinate routing, and the two-phase
//! pipeline's per-cycle bookkeeping (§4.5, §4.6).

use ahb_core::{HReady, HReadyOut, ICmd, MData, ManagerPort, SubordinatePort};
use ahb_subordinate::DefaultSubordinate;

use crate::arbiter::Arbiter;

struct Route {
    base: u64,
    len: u64,
    subordinate: usize,
}

struct ManagerSlot {
    port: Box<dyn ManagerPort>,
    id: u8,
    routes: Vec<Route>,
    default_subordinate: Option<usize>,
    /// The one-cycle "delayed" data register of §4.6, advanced each time
    /// this manager's command is dispatched.
    data_lag: Option<MData>,
}

struct SubordinateSlot {
    port: Box<dyn SubordinatePort>,
    arbiter: Arbiter,
}

/// The fabric: owns every registered manager and subordinate port, and
/// drives their per-cycle protocol.
#[derive(Default)]
pub struct Interconnect {
    bus_width_bytes: Option<u32>,
    managers: Vec<ManagerSlot>,
    subordinates: Vec<SubordinateSlot>,
    bootstrapped: bool,
}

impl Interconnect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn smallest_unused_id(used: &[u8]) -> u8 {
        let mut candidate = 0u8;
        while used.contains(&candidate) {
            candidate += 1;
        }
        candidate
    }

    /// Register a manager port, returning its stable slot handle for use
    /// with [`Self::register_manager_subordinate_addr`].
    ///
    /// `id` must be unique among managers; if omitted, the smallest unused
    /// id is assigned. If `id` collides with a prior holder, that holder is
    /// displaced to the next unused id.
    pub fn register_manager(&mut self, port: Box<dyn ManagerPort>, id: Option<u8>) -> usize {
        let used: Vec<u8> = self.managers.iter().map(|m| m.id).collect();
        let assigned = match id {
            None => Self::smallest_unused_id(&used),
            Some(requested) => {
                if let Some(existing) = self.managers.iter_mut().find(|m| m.id == requested) {
                    existing.id = Self::smallest_unused_id(&used);
                }
                requested
            }
        };
        let mut port = port;
        port.set_ready(HReady::Working);
        self.managers.push(ManagerSlot {
            port,
            id: assigned,
            routes: Vec::new(),
            default_subordinate: None,
            data_lag: None,
        });
        self.managers.len() - 1
    }

    /// Register a subordinate port, returning its stable slot handle.
    ///
    /// # Panics
    ///
    /// Panics if the subordinate is registered more than once by mistake
    /// (the caller is expected to keep its own handle).
    pub fn register_subordinate(&mut self, port: Box<dyn SubordinatePort>) -> usize {
        let mut port = port;
        port.set_ready(HReady::Working);
        self.subordinates.push(SubordinateSlot {
            port,
            arbiter: Arbiter::default(),
        });
        self.subordinates.len() - 1
    }

    /// Declare (or confirm) the fabric-wide bus width in bytes.
    ///
    /// # Panics
    ///
    /// Panics if a previously registered width doesn't match.
    pub fn register_bus_width(&mut self, bytes: u32) {
        match self.bus_width_bytes {
            None => self.bus_width_bytes = Some(bytes),
            Some(existing) => assert_eq!(existing, bytes, "bus width mismatch across registered components"),
        }
    }

    /// Map an address region of a manager's local address space to a
    /// subordinate.
    ///
    /// # Panics
    ///
    /// Panics on an unaligned base, an unregistered manager/subordinate, or
    /// a region overlapping one already registered for this manager (I1).
    pub fn register_manager_subordinate_addr(&mut self, manager: usize, subordinate: usize, base: u64, len: u64) {
        assert!(base % 1024 == 0, "region base {base:#x} is not a multiple of 1024");
        assert!(manager < self.managers.len(), "unregistered manager {manager}");
        assert!(subordinate < self.subordinates.len(), "unregistered subordinate {subordinate}");
        let new_end = base + len;
        for r in &self.managers[manager].routes {
            let existing_end = r.base + r.len;
            assert!(
                new_end <= r.base || base >= existing_end,
                "address region {base:#x}..{new_end:#x} overlaps an existing region for manager {manager}"
            );
        }
        self.managers[manager].routes.push(Route { base, len, subordinate });
    }

    fn decode(&self, manager: usize, addr: u64) -> usize {
        let slot = &self.managers[manager];
        slot.routes
            .iter()
            .find(|r| addr >= r.base && addr < r.base + r.len)
            .map_or_else(
                || slot.default_subordinate.expect("default subordinate not yet bootstrapped"),
                |r| r.subordinate,
            )
    }

    /// Public view of the address decode (§4.5 `decode`), for observers that
    /// need to predict routing ahead of a cycle (e.g. a traffic-tester
    /// harness building its expectations before driving the fabric).
    ///
    /// # Panics
    ///
    /// Panics if the fabric hasn't been bootstrapped yet (no default
    /// subordinate exists to fall back on for an unmapped address).
    #[must_use]
    pub fn decode_for(&self, manager: usize, addr: u64) -> usize {
        self.decode(manager, addr)
    }

    /// The fabric-wide interconnect id assigned to a registered manager
    /// (§4.5 "Registration"), for tagging expectations against the
    /// master-id rewrite `proc_cmd` performs.
    #[must_use]
    pub fn manager_fabric_id(&self, manager: usize) -> u8 {
        self.managers[manager].id
    }

    /// Install any missing per-manager default subordinates and reset the
    /// fabric, if this is the first call since construction (§4.5
    /// "First-cycle bootstrap"). Otherwise run one cycle of the normal
    /// `proc_data`/`proc_rsp`/`proc_cmd` pipeline.
    pub fn process(&mut self) {
        if !self.bootstrapped {
            self.bootstrap();
            self.reset();
            self.bootstrapped = true;
            return;
        }
        self.proc_data();
        self.proc_rsp();
        self.proc_cmd();
    }

    fn bootstrap(&mut self) {
        for i in 0..self.managers.len() {
            if self.managers[i].default_subordinate.is_some() {
                continue;
            }
            let idx = self.subordinates.len();
            self.subordinates.push(SubordinateSlot {
                port: Box::new(DefaultSubordinate::new()),
                arbiter: Arbiter::default(),
            });
            self.managers[i].default_subordinate = Some(idx);
        }
    }

    /// Set every manager and subordinate to ready, clear every arbiter and
    /// data-lag register.
    pub fn reset(&mut self) {
        for m in &mut self.managers {
            m.port.set_ready(HReady::Working);
            m.data_lag = None;
        }
        for s in &mut self.subordinates {
            s.port.set_ready(HReady::Working);
            s.arbiter.reset();
        }
    }

    fn proc_data(&mut self) {
        for s in 0..self.subordinates.len() {
            if let Some(owner) = self.subordinates[s].arbiter.owner() {
                let data = self.managers[owner as usize].data_lag.unwrap_or_default();
                self.subordinates[s].arbiter.set_owner_data(data);
            }
            let data = self.subordinates[s].arbiter.peek_data();
            self.subordinates[s].port.put_data(data);
        }
    }

    fn proc_rsp(&mut self) {
        for s in 0..self.subordinates.len() {
            if self.subordinates[s].port.is_ready() {
                continue;
            }
            let sresp = self.subordinates[s].port.get_rsp();
            let Some(owner) = self.subordinates[s].arbiter.owner() else {
                continue;
            };
            self.managers[owner as usize].port.put_rsp(sresp.into_iresp());
            if sresp.ready_out == HReadyOut::Ready {
                log::debug!("subordinate {s} -> manager {owner} response ready");
                self.managers[owner as usize].port.set_ready(HReady::Working);
                self.subordinates[s].port.set_ready(HReady::Working);
                self.subordinates[s].arbiter.clear_owner();
            }
        }
    }

    fn proc_cmd(&mut self) {
        for i in 0..self.managers.len() {
            if !self.managers[i].port.is_ready() {
                continue;
            }
            let mcmd = self.managers[i].port.get_cmd();
            let subordinate = self.decode(i, mcmd.addr);
            let id = self.managers[i].id;
            let fabric_master = (id << 4) | (mcmd.master & 0xF);
            let icmd: ICmd = mcmd.into_icmd(fabric_master);
            log::trace!("manager {i} -> subordinate {subordinate} addr {:#x}", mcmd.addr);
            self.managers[i].data_lag = Some(self.managers[i].port.get_data());
            self.subordinates[subordinate].arbiter.queue(icmd, i as u8);
            self.managers[i].port.set_ready(HReady::WaitState);
        }

        for s in 0..self.subordinates.len() {
            if !self.subordinates[s].port.is_ready() {
                continue;
            }
            let (icmd, owner) = self.subordinates[s].arbiter.take();
            self.subordinates[s].port.put_cmd(icmd);
            if owner.is_some() {
                self.subordinates[s].port.set_ready(HReady::WaitState);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use ahb_core::{HBurst, HExcl, HMastlock, HNonsec, HProt, HResp, HSize, HTrans, HWrite, IResp, MCmd, MData};
    use ahb_subordinate::{MemorySubordinate, MemorySubordinateConfig};

    #[derive(Default)]
    struct StubState {
        ready: HReady,
        cmd: MCmd,
        data: MData,
        last_rsp: Option<IResp>,
    }

    struct StubManager(Rc<RefCell<StubState>>);

    impl ManagerPort for StubManager {
        fn set_ready(&mut self, ready: HReady) {
            self.0.borrow_mut().ready = ready;
        }
        fn is_ready(&self) -> bool {
            self.0.borrow().ready == HReady::Working
        }
        fn get_cmd(&self) -> MCmd {
            self.0.borrow().cmd
        }
        fn get_data(&self) -> MData {
            self.0.borrow().data
        }
        fn put_rsp(&mut self, rsp: IResp) {
            self.0.borrow_mut().last_rsp = Some(rsp);
        }
    }

    fn mem_config() -> MemorySubordinateConfig {
        MemorySubordinateConfig {
            length: 16 * 1024,
            bus_width_bytes: 4,
            burst: false,
            exclusive: false,
            secure: false,
            nonsec_read: true,
            nonsec_write: true,
            write_strobe: true,
            min_wait_states: 0,
            max_wait_states: 1,
            seed: 7,
        }
    }

    fn word_cmd(addr: u64, write: HWrite) -> MCmd {
        MCmd {
            addr,
            burst: HBurst::Single,
            mastlock: HMastlock::UnLocked,
            prot: HProt::default(),
            size: HSize::Word,
            nonsec: HNonsec::Secure,
            excl: HExcl::NonExcl,
            master: 0,
            trans: HTrans::NonSeq,
            wstrb: 0xF,
            write,
        }
    }

    #[test]
    fn routes_command_and_delivers_response() {
        let state = Rc::new(RefCell::new(StubState {
            ready: HReady::Working,
            ..StubState::default()
        }));

        let mut ic = Interconnect::new();
        let m = ic.register_manager(Box::new(StubManager(Rc::clone(&state))), None);
        let s = ic.register_subordinate(Box::new(MemorySubordinate::new(mem_config())));
        ic.register_manager_subordinate_addr(m, s, 0x4000, 16 * 1024);
        ic.process(); // bootstrap + reset pass

        state.borrow_mut().cmd = word_cmd(0x4008, HWrite::Write);
        state.borrow_mut().data = MData { wdata: 0xCAFEF00D };
        let write_rsp = run_until_manager_ready(&mut ic, &state);
        assert_eq!(write_rsp.resp, HResp::Successful);

        state.borrow_mut().ready = HReady::Working;
        state.borrow_mut().cmd = word_cmd(0x4008, HWrite::Read);
        let read_rsp = run_until_manager_ready(&mut ic, &state);
        assert_eq!(read_rsp.rdata, 0xCAFEF00D);
    }

    /// Step `ic` until the manager's own ready flag returns to `Working` —
    /// the only cycle on which its latched response is the real terminal
    /// one, since intermediate `NotReady` responses are also delivered
    /// every waiting cycle (§4.5 `proc_rsp`).
    fn run_until_manager_ready(ic: &mut Interconnect, state: &Rc<RefCell<StubState>>) -> IResp {
        for _ in 0..20 {
            ic.process();
            if state.borrow().ready == HReady::Working {
                return state.borrow_mut().last_rsp.take().expect("ready with no response latched");
            }
        }
        panic!("manager never became ready again");
    }

    #[test]
    fn unmapped_address_routes_to_default_subordinate() {
        let state = Rc::new(RefCell::new(StubState {
            ready: HReady::Working,
            ..StubState::default()
        }));

        let mut ic = Interconnect::new();
        let m = ic.register_manager(Box::new(StubManager(Rc::clone(&state))), None);
        let s = ic.register_subordinate(Box::new(MemorySubordinate::new(mem_config())));
        ic.register_manager_subordinate_addr(m, s, 0x4000, 16 * 1024);
        ic.process();

        state.borrow_mut().cmd = word_cmd(0x9000, HWrite::Read);

        let mut delivered = None;
        for _ in 0..10 {
            ic.process();
            if let Some(rsp) = state.borrow_mut().last_rsp.take() {
                delivered = Some(rsp);
                break;
            }
        }
        assert_eq!(delivered.expect("no response").resp, HResp::Failed);
    }

    #[test]
    fn renumbering_displaces_prior_id_holder() {
        let state_a = Rc::new(RefCell::new(StubState::default()));
        let state_b = Rc::new(RefCell::new(StubState::default()));
        let mut ic = Interconnect::new();
        let _ = ic.register_manager(Box::new(StubManager(state_a)), Some(0));
        let _ = ic.register_manager(Box::new(StubManager(state_b)), Some(0));
        assert_eq!(ic.managers[0].id, 1);
        assert_eq!(ic.managers[1].id, 0);
    }

    #[test]
    fn bus_width_matches_across_registrations() {
        let mut ic = Interconnect::new();
        ic.register_bus_width(4);
        ic.register_bus_width(4);
        assert_eq!(ic.bus_width_bytes, Some(4));
    }

    #[test]
    #[should_panic(expected = "bus width mismatch")]
    fn bus_width_mismatch_panics() {
        let mut ic = Interconnect::new();
        ic.register_bus_width(4);
        ic.register_bus_width(8);
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn overlapping_region_panics() {
        let mut ic = Interconnect::new();
        let m = ic.register_manager(Box::new(StubManager(Rc::new(RefCell::new(StubState::default())))), None);
        let s1 = ic.register_subordinate(Box::new(MemorySubordinate::new(mem_config())));
        let s2 = ic.register_subordinate(Box::new(MemorySubordinate::new(mem_config())));
        ic.register_manager_subordinate_addr(m, s1, 0x4000, 4096);
        ic.register_manager_subordinate_addr(m, s2, 0x4000, 1024);
    }
}
