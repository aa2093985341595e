//! Process and window lookup used to target synthesized input.
//!
//! Every call goes to the live process table; nothing is cached between
//! calls.

use std::sync::Arc;

use robokit_core::domain::process::name_matches;
use robokit_core::{Pid, ProcessRecord, WindowHandle};
use tracing::{debug, info, warn};

use super::ports::{LookupError, ProcessError, ProcessTable, WindowError, WindowManager};

/// The Process & Window Lookup use case.
#[derive(Clone)]
pub struct ProcessLookup {
    processes: Arc<dyn ProcessTable>,
    windows: Arc<dyn WindowManager>,
}

impl ProcessLookup {
    pub fn new(processes: Arc<dyn ProcessTable>, windows: Arc<dyn WindowManager>) -> Self {
        Self { processes, windows }
    }

    // ── Processes ─────────────────────────────────────────────────────────

    pub fn list_pids(&self) -> Result<Vec<Pid>, ProcessError> {
        self.processes.list_pids()
    }

    pub fn process_exists(&self, pid: Pid) -> bool {
        self.processes.exists(pid)
    }

    /// Every process with its name.
    ///
    /// # Errors
    ///
    /// The first failed name lookup aborts the listing; no partial result is
    /// returned.
    pub fn list_processes(&self) -> Result<Vec<ProcessRecord>, ProcessError> {
        let pids = self.processes.list_pids()?;
        let mut records = Vec::with_capacity(pids.len());
        for pid in pids {
            match self.processes.lookup(pid) {
                Ok(name) => records.push(ProcessRecord::new(pid, name)),
                Err(e) => {
                    warn!("process listing aborted at pid {pid}: {e}");
                    return Err(e);
                }
            }
        }
        Ok(records)
    }

    pub fn find_name_by_pid(&self, pid: Pid) -> Result<String, ProcessError> {
        self.processes.lookup(pid)
    }

    /// Names of every running process, in pid order of the snapshot.
    pub fn find_names_for_all(&self) -> Result<Vec<String>, ProcessError> {
        Ok(self
            .list_processes()?
            .into_iter()
            .map(|record| record.name)
            .collect())
    }

    /// Pids whose process name contains `name`, ignoring case.
    pub fn find_pids_by_name(&self, name: &str) -> Result<Vec<Pid>, ProcessError> {
        let pids: Vec<Pid> = self
            .list_processes()?
            .into_iter()
            .filter(|record| name_matches(&record.name, name))
            .map(|record| record.pid)
            .collect();
        debug!("{} process(es) match {name:?}", pids.len());
        Ok(pids)
    }

    /// # Errors
    ///
    /// [`ProcessError::Kill`] or whatever the OS adapter reports.
    pub fn terminate(&self, pid: Pid) -> Result<(), ProcessError> {
        info!("terminating pid {pid}");
        self.processes.kill(pid)
    }

    // ── Windows ───────────────────────────────────────────────────────────

    /// Brings the window of `pid` to the front.  `handle` 0 means "any".
    pub fn activate_by_pid(&self, pid: Pid, handle: WindowHandle) -> Result<(), WindowError> {
        debug!("activating pid {pid} (handle {handle:#x})");
        self.windows.activate(pid, handle)
    }

    /// Activates the first process whose name contains `name`.
    ///
    /// No match is not an error: it is logged and nothing happens.
    pub fn activate_by_name(&self, name: &str) -> Result<(), LookupError> {
        let pids = self.find_pids_by_name(name)?;
        let Some(&pid) = pids.first() else {
            info!("no process matches {name:?}; nothing activated");
            return Ok(());
        };
        self.activate_by_pid(pid, 0)?;
        Ok(())
    }

    pub fn window_title(&self) -> Result<String, WindowError> {
        self.windows.title()
    }

    pub fn close_window(&self) -> Result<(), WindowError> {
        self.windows.close()
    }

    pub fn window_handle(&self) -> Result<WindowHandle, WindowError> {
        self.windows.handle()
    }

    pub fn set_window_handle(&self, handle: WindowHandle) -> Result<(), WindowError> {
        self.windows.set_handle(handle)
    }

    pub fn is_window_valid(&self) -> bool {
        self.windows.is_valid()
    }

    /// Pid owning the focused window.
    pub fn active_pid(&self) -> Result<Pid, WindowError> {
        self.windows.active_pid()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
