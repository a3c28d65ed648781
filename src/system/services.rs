use std::collections::HashSet;
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use super::process::ProcessTable;
use super::shell::Shell;
use crate::config::Timing;

/// A system process restarted after preferences change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Service {
    pub process: &'static str,
    /// launchd relaunches it right away, so a new PID is a readiness signal
    pub relaunched_eagerly: bool,
}

/// Restart order: window manager/dock, file manager, menu bar, preferences daemon
pub const SERVICES: [Service; 4] = [
    Service {
        process: "Dock",
        relaunched_eagerly: true,
    },
    Service {
        process: "Finder",
        relaunched_eagerly: true,
    },
    Service {
        process: "SystemUIServer",
        relaunched_eagerly: true,
    },
    Service {
        process: "cfprefsd",
        relaunched_eagerly: false,
    },
];

const LOGOUT_SCRIPT: &str = "tell application \"System Events\" to log out";

/// Kill every service so launchd relaunches it, then wait for the eager ones
/// to come back under a new PID.
///
/// The wait is bounded by `timing.restart_timeout`. Returns false when the
/// timeout elapsed first; nothing is retried.
pub fn restart_services<S: Shell>(
    shell: &S,
    processes: &dyn ProcessTable,
    timing: &Timing,
) -> bool {
    let watched: Vec<(&Service, HashSet<u32>)> = SERVICES
        .iter()
        .filter(|s| s.relaunched_eagerly)
        .map(|s| (s, processes.pids(s.process)))
        .collect();

    for service in &SERVICES {
        shell.run("killall", &[service.process]);
    }

    let deadline = Instant::now() + timing.restart_timeout;
    let mut pending: Vec<&str> = Vec::new();
    loop {
        pending.clear();
        for (service, old) in &watched {
            let current = processes.pids(service.process);
            if current.is_empty() || current.is_subset(old) {
                pending.push(service.process);
            }
        }

        if pending.is_empty() {
            info!("System services relaunched");
            return true;
        }
        if Instant::now() >= deadline {
            warn!(
                pending = ?pending,
                timeout_ms = timing.restart_timeout.as_millis() as u64,
                "Services did not relaunch before the timeout"
            );
            return false;
        }
        thread::sleep(timing.restart_poll);
    }
}

/// Product version as reported by `sw_vers`, `None` if the query failed
pub fn system_version<S: Shell>(shell: &S) -> Option<String> {
    shell
        .run("sw_vers", &["-productVersion"])
        .stdout_if_success()
        .map(str::to_string)
}

/// Ask System Events to end the login session
pub fn logout<S: Shell>(shell: &S) -> bool {
    info!("Requesting logout");
    shell.run("osascript", &["-e", LOGOUT_SCRIPT]).success()
}
