use std::cell::RefCell;
use std::collections::HashSet;

use sysinfo::System;

/// Lookup of running processes by name
pub trait ProcessTable {
    /// PIDs of the processes named exactly `name`, empty when none runs
    fn pids(&self, name: &str) -> HashSet<u32>;
}

/// Live process table backed by `sysinfo`
pub struct SystemProcesses {
    sys: RefCell<System>,
}

impl SystemProcesses {
    pub fn new() -> Self {
        Self {
            sys: RefCell::new(System::new()),
        }
    }
}

impl Default for SystemProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcesses {
    fn pids(&self, name: &str) -> HashSet<u32> {
        let mut sys = self.sys.borrow_mut();
        // Reuse the buffers, refresh only the process list
        sys.refresh_processes();
        sys.processes_by_exact_name(name)
            .map(|p| p.pid().as_u32())
            .collect()
    }
}
