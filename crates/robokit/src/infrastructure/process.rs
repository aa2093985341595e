//! Process-table adapters.
//!
//! [`SysinfoProcessTable`] reads the OS table through `sysinfo`; a fresh
//! `System` is refreshed on every call so results are never stale.
//! [`FixedProcessTable`] serves a fixed list for tests and headless runs.

use std::sync::Mutex;

use robokit_core::{Pid, ProcessRecord};
use sysinfo::System;
use tracing::{debug, warn};

use crate::application::ports::{ProcessError, ProcessTable};

/// Live process table backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProcessTable;

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self
    }

    /// A `System` holding just `pid`, or `None` when it is not running.
    fn snapshot_of(pid: Pid) -> Option<(System, sysinfo::Pid)> {
        let raw = usize::try_from(pid).ok()?;
        let sys_pid = sysinfo::Pid::from(raw);
        let mut system = System::new();
        system.refresh_process(sys_pid).then_some((system, sys_pid))
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn list_pids(&self) -> Result<Vec<Pid>, ProcessError> {
        let mut system = System::new();
        system.refresh_processes();
        let mut pids = system
            .processes()
            .keys()
            .map(|pid| {
                Pid::try_from(pid.as_u32())
                    .map_err(|_| ProcessError::Enumerate(format!("pid {pid} does not fit in i32")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        pids.sort_unstable();
        debug!("enumerated {} processes", pids.len());
        Ok(pids)
    }

    fn exists(&self, pid: Pid) -> bool {
        Self::snapshot_of(pid).is_some()
    }

    fn lookup(&self, pid: Pid) -> Result<String, ProcessError> {
        let (system, sys_pid) = Self::snapshot_of(pid).ok_or(ProcessError::NotFound(pid))?;
        system
            .process(sys_pid)
            .map(|process| process.name().to_string())
            .ok_or_else(|| ProcessError::Lookup {
                pid,
                reason: "process exited during lookup".into(),
            })
    }

    fn kill(&self, pid: Pid) -> Result<(), ProcessError> {
        let (system, sys_pid) = Self::snapshot_of(pid).ok_or(ProcessError::NotFound(pid))?;
        let killed = system.process(sys_pid).is_some_and(|process| process.kill());
        if !killed {
            warn!("kill signal to pid {pid} was refused");
            return Err(ProcessError::Kill { pid });
        }
        Ok(())
    }
}

/// In-memory process table.
///
/// Pids listed in `broken` are reported by `list_pids` but fail `lookup`,
/// which mimics a process exiting between enumeration and lookup.
#[derive(Debug, Default)]
pub struct FixedProcessTable {
    records: Mutex<Vec<ProcessRecord>>,
    broken: Vec<Pid>,
}

impl FixedProcessTable {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            broken: Vec::new(),
        }
    }

    pub fn with_broken(mut self, pid: Pid) -> Self {
        self.broken.push(pid);
        self
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, Vec<ProcessRecord>>, ProcessError> {
        self.records
            .lock()
            .map_err(|_| ProcessError::Enumerate("process list lock poisoned".into()))
    }
}

impl ProcessTable for FixedProcessTable {
    fn list_pids(&self) -> Result<Vec<Pid>, ProcessError> {
        Ok(self.records()?.iter().map(|r| r.pid).collect())
    }

    fn exists(&self, pid: Pid) -> bool {
        self.records()
            .map(|records| records.iter().any(|r| r.pid == pid))
            .unwrap_or(false)
    }

    fn lookup(&self, pid: Pid) -> Result<String, ProcessError> {
        if self.broken.contains(&pid) {
            return Err(ProcessError::Lookup {
                pid,
                reason: "process exited during lookup".into(),
            });
        }
        self.records()?
            .iter()
            .find(|r| r.pid == pid)
            .map(|r| r.name.clone())
            .ok_or(ProcessError::NotFound(pid))
    }

    fn kill(&self, pid: Pid) -> Result<(), ProcessError> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.pid != pid);
        if records.len() == before {
            return Err(ProcessError::NotFound(pid));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FixedProcessTable {
        FixedProcessTable::new(vec![
            ProcessRecord::new(1, "launchd"),
            ProcessRecord::new(88, "Finder"),
        ])
    }

    #[test]
    fn test_fixed_table_lists_and_looks_up() {
        let table = table();
        assert_eq!(table.list_pids().unwrap(), vec![1, 88]);
        assert_eq!(table.lookup(88).unwrap(), "Finder");
        assert!(matches!(table.lookup(5), Err(ProcessError::NotFound(5))));
    }

    #[test]
    fn test_fixed_table_kill_removes_the_process() {
        // Arrange
        let table = table();

        // Act
        table.kill(88).unwrap();

        // Assert
        assert!(!table.exists(88));
        assert!(matches!(table.kill(88), Err(ProcessError::NotFound(88))));
    }

    #[test]
    fn test_broken_pid_is_listed_but_fails_lookup() {
        let table = table().with_broken(1);
        assert!(table.list_pids().unwrap().contains(&1));
        assert!(matches!(table.lookup(1), Err(ProcessError::Lookup { pid: 1, .. })));
    }

    #[test]
    fn test_sysinfo_table_sees_this_process() {
        // Arrange
        let table = SysinfoProcessTable::new();
        let me = std::process::id() as Pid;

        // Act / Assert
        assert!(table.exists(me));
        assert!(table.list_pids().unwrap().contains(&me));
        assert!(!table.lookup(me).unwrap().is_empty());
    }

    #[test]
    fn test_sysinfo_table_rejects_negative_pid() {
        let table = SysinfoProcessTable::new();
        assert!(!table.exists(-1));
        assert!(matches!(table.lookup(-1), Err(ProcessError::NotFound(-1))));
    }
}
