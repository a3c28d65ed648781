pub mod process;
pub mod services;
pub mod shell;

pub use process::{ProcessTable, SystemProcesses};
pub use services::{logout, restart_services, system_version};
pub use shell::{Shell, SystemShell};
