//! Window-manager adapters.
//!
//! [`CommandWindowManager`] drives the desktop's scripting tool:
//!
//! | Desktop | Tool | Window handle |
//! |---------|------|---------------|
//! | Linux (X11) | `xdotool` | X window id |
//! | macOS | `osascript` (System Events) | owning pid; windows are not addressable |
//! | Windows | `powershell` | `HWND` of the process main window |
//!
//! Each operation is one process spawn; output is trimmed stdout.
//! [`MemoryWindowManager`] is an in-process window list for tests and
//! headless runs.

use std::process::Command;
use std::sync::Mutex;

use robokit_core::{Pid, WindowHandle};
use tracing::debug;

use crate::application::ports::{WindowError, WindowManager};

/// The scripting environment a [`CommandWindowManager`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    X11,
    MacOs,
    Windows,
}

impl Desktop {
    /// Desktop for the platform this binary was built for.
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else if cfg!(target_os = "linux") {
            Some(Self::X11)
        } else {
            None
        }
    }

    fn program(self) -> &'static str {
        match self {
            Self::X11 => "xdotool",
            Self::MacOs => "osascript",
            Self::Windows => "powershell",
        }
    }
}

/// One window query or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowOp {
    /// First visible window of a process.
    Find(Pid),
    Activate(WindowHandle),
    Title(WindowHandle),
    Close(WindowHandle),
    /// Handle of the focused window.
    Focused,
    /// Pid owning the focused window.
    FocusedPid,
}

/// Arguments for `op` on `desktop`.
fn script(desktop: Desktop, op: WindowOp) -> Vec<String> {
    match desktop {
        Desktop::X11 => xdotool_args(op),
        Desktop::MacOs => osascript_lines(op)
            .into_iter()
            .flat_map(|line| ["-e".to_string(), line])
            .collect(),
        Desktop::Windows => vec![
            "-NoProfile".into(),
            "-Command".into(),
            powershell_command(op),
        ],
    }
}

fn xdotool_args(op: WindowOp) -> Vec<String> {
    let (command, target) = match op {
        WindowOp::Find(pid) => ("search --onlyvisible --pid", Some(pid.to_string())),
        WindowOp::Activate(h) => ("windowactivate", Some(h.to_string())),
        WindowOp::Title(h) => ("getwindowname", Some(h.to_string())),
        WindowOp::Close(h) => ("windowclose", Some(h.to_string())),
        WindowOp::Focused => ("getactivewindow", None),
        WindowOp::FocusedPid => ("getactivewindow getwindowpid", None),
    };
    command
        .split_whitespace()
        .map(str::to_string)
        .chain(target)
        .collect()
}

fn osascript_lines(op: WindowOp) -> Vec<String> {
    let process = |h: u64| format!("set p to first process whose unix id is {h}");
    let body = match op {
        WindowOp::Find(pid) => vec![
            process(pid as u64),
            "if (count of windows of p) > 0 then return unix id of p".into(),
        ],
        WindowOp::Activate(h) => vec![process(h), "set frontmost of p to true".into()],
        WindowOp::Title(h) => vec![process(h), "return name of front window of p".into()],
        WindowOp::Close(h) => vec![
            process(h),
            "click (first button of front window of p whose subrole is \"AXCloseButton\")".into(),
        ],
        WindowOp::Focused | WindowOp::FocusedPid => {
            vec!["return unix id of first process whose frontmost is true".into()]
        }
    };
    let mut lines = vec!["tell application \"System Events\"".to_string()];
    lines.extend(body);
    lines.push("end tell".into());
    lines
}

const PS_BY_HANDLE: &str = "$p = Get-Process | Where-Object { $_.MainWindowHandle.ToInt64() -eq {h} } | Select-Object -First 1; if (-not $p) { exit 1 }";

const PS_USER32: &str = "Add-Type -Namespace Robokit -Name User32 -MemberDefinition '\
[DllImport(\"user32.dll\")] public static extern System.IntPtr GetForegroundWindow(); \
[DllImport(\"user32.dll\")] public static extern uint GetWindowThreadProcessId(System.IntPtr h, out uint p);'";

fn powershell_command(op: WindowOp) -> String {
    let by_handle = |h: u64| PS_BY_HANDLE.replace("{h}", &h.to_string());
    match op {
        WindowOp::Find(pid) => format!(
            "(Get-Process -Id {pid} -ErrorAction Stop).MainWindowHandle.ToInt64()"
        ),
        WindowOp::Activate(h) => format!(
            "{}; [void](New-Object -ComObject WScript.Shell).AppActivate($p.Id)",
            by_handle(h)
        ),
        WindowOp::Title(h) => format!("{}; $p.MainWindowTitle", by_handle(h)),
        WindowOp::Close(h) => format!("{}; [void]$p.CloseMainWindow()", by_handle(h)),
        WindowOp::Focused => {
            format!("{PS_USER32}; [Robokit.User32]::GetForegroundWindow().ToInt64()")
        }
        WindowOp::FocusedPid => format!(
            "{PS_USER32}; $id = 0; \
             [void][Robokit.User32]::GetWindowThreadProcessId([Robokit.User32]::GetForegroundWindow(), [ref]$id); $id"
        ),
    }
}

fn parse_number<T: std::str::FromStr>(program: &str, output: &str) -> Result<T, WindowError> {
    output
        .lines()
        .next()
        .map(str::trim)
        .and_then(|line| line.parse().ok())
        .ok_or_else(|| WindowError::Parse {
            program: program.to_string(),
            output: output.to_string(),
        })
}

/// Window manager backed by the desktop's scripting tool.
#[derive(Debug)]
pub struct CommandWindowManager {
    desktop: Desktop,
    program: String,
    current: Mutex<WindowHandle>,
}

impl CommandWindowManager {
    pub fn new(desktop: Desktop) -> Self {
        Self::with_program(desktop, desktop.program())
    }

    /// Like [`CommandWindowManager::new`] with the tool at a custom path.
    pub fn with_program(desktop: Desktop, program: impl Into<String>) -> Self {
        Self {
            desktop,
            program: program.into(),
            current: Mutex::new(0),
        }
    }

    /// Adapter for this platform.
    ///
    /// # Errors
    ///
    /// [`WindowError::Unsupported`] on platforms with no known tool.
    pub fn for_platform() -> Result<Self, WindowError> {
        Desktop::current().map(Self::new).ok_or(WindowError::Unsupported)
    }

    pub fn desktop(&self) -> Desktop {
        self.desktop
    }

    fn run(&self, op: WindowOp) -> Result<String, WindowError> {
        let args = script(self.desktop, op);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| WindowError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("{} {op:?} failed: {stderr}", self.program);
            return Err(WindowError::Failed {
                program: self.program.clone(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn current(&self) -> WindowHandle {
        self.current.lock().map(|h| *h).unwrap_or(0)
    }

    fn remember(&self, handle: WindowHandle) {
        if let Ok(mut current) = self.current.lock() {
            *current = handle;
        }
    }

    /// The selected window, or an error when none is selected.
    fn selected(&self) -> Result<WindowHandle, WindowError> {
        match self.current() {
            0 => Err(WindowError::NoHandle),
            h => Ok(h),
        }
    }

    fn find(&self, pid: Pid) -> Result<WindowHandle, WindowError> {
        let output = match self.run(WindowOp::Find(pid)) {
            Ok(output) => output,
            // xdotool exits non-zero when the search matches nothing
            Err(WindowError::Failed { .. }) if self.desktop == Desktop::X11 => String::new(),
            Err(e) => return Err(e),
        };
        if output.is_empty() {
            return Err(WindowError::NoWindow { pid });
        }
        match parse_number(&self.program, &output)? {
            0 => Err(WindowError::NoWindow { pid }),
            h => Ok(h),
        }
    }
}

impl WindowManager for CommandWindowManager {
    fn activate(&self, pid: Pid, handle: WindowHandle) -> Result<(), WindowError> {
        let target = if handle != 0 { handle } else { self.find(pid)? };
        self.run(WindowOp::Activate(target))?;
        self.remember(target);
        debug!("activated window {target} (pid {pid})");
        Ok(())
    }

    fn handle(&self) -> Result<WindowHandle, WindowError> {
        match self.current() {
            0 => {
                let output = self.run(WindowOp::Focused)?;
                parse_number(&self.program, &output)
            }
            h => Ok(h),
        }
    }

    fn set_handle(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if handle == 0 {
            return Err(WindowError::NoHandle);
        }
        self.remember(handle);
        Ok(())
    }

    fn title(&self) -> Result<String, WindowError> {
        self.run(WindowOp::Title(self.selected()?))
    }

    fn close(&self) -> Result<(), WindowError> {
        self.run(WindowOp::Close(self.selected()?))?;
        self.remember(0);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.selected()
            .and_then(|h| self.run(WindowOp::Title(h)))
            .is_ok()
    }

    fn active_pid(&self) -> Result<Pid, WindowError> {
        let output = self.run(WindowOp::FocusedPid)?;
        parse_number(&self.program, &output)
    }
}

// ── In-memory window manager ──────────────────────────────────────────────────

/// One window known to a [`MemoryWindowManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub handle: WindowHandle,
    pub pid: Pid,
    pub title: String,
}

#[derive(Debug, Default)]
struct Desk {
    windows: Vec<FakeWindow>,
    focused: WindowHandle,
    current: WindowHandle,
}

/// Window manager over an in-process window list.  Activating a window
/// focuses it.
#[derive(Debug, Default)]
pub struct MemoryWindowManager {
    desk: Mutex<Desk>,
}

impl MemoryWindowManager {
    pub fn new(windows: Vec<FakeWindow>) -> Self {
        Self {
            desk: Mutex::new(Desk {
                windows,
                ..Desk::default()
            }),
        }
    }

    /// Handle of the focused window; 0 when nothing has been activated.
    pub fn focused(&self) -> WindowHandle {
        self.desk.lock().map(|d| d.focused).unwrap_or(0)
    }

    fn desk(&self) -> Result<std::sync::MutexGuard<'_, Desk>, WindowError> {
        self.desk.lock().map_err(|_| WindowError::Unsupported)
    }
}

impl WindowManager for MemoryWindowManager {
    fn activate(&self, pid: Pid, handle: WindowHandle) -> Result<(), WindowError> {
        let mut desk = self.desk()?;
        let target = desk
            .windows
            .iter()
            .find(|w| if handle != 0 { w.handle == handle } else { w.pid == pid })
            .map(|w| w.handle)
            .ok_or(WindowError::NoWindow { pid })?;
        desk.focused = target;
        desk.current = target;
        Ok(())
    }

    fn handle(&self) -> Result<WindowHandle, WindowError> {
        let desk = self.desk()?;
        match (desk.current, desk.focused) {
            (0, 0) => Err(WindowError::NoHandle),
            (0, focused) => Ok(focused),
            (current, _) => Ok(current),
        }
    }

    fn set_handle(&self, handle: WindowHandle) -> Result<(), WindowError> {
        if handle == 0 {
            return Err(WindowError::NoHandle);
        }
        self.desk()?.current = handle;
        Ok(())
    }

    fn title(&self) -> Result<String, WindowError> {
        let desk = self.desk()?;
        desk.windows
            .iter()
            .find(|w| w.handle == desk.current)
            .map(|w| w.title.clone())
            .ok_or(WindowError::NoHandle)
    }

    fn close(&self) -> Result<(), WindowError> {
        let mut desk = self.desk()?;
        let current = desk.current;
        let before = desk.windows.len();
        desk.windows.retain(|w| w.handle != current);
        if desk.windows.len() == before {
            return Err(WindowError::NoHandle);
        }
        if desk.focused == current {
            desk.focused = 0;
        }
        desk.current = 0;
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.desk()
            .map(|d| d.windows.iter().any(|w| w.handle == d.current))
            .unwrap_or(false)
    }

    fn active_pid(&self) -> Result<Pid, WindowError> {
        let desk = self.desk()?;
        desk.windows
            .iter()
            .find(|w| w.handle == desk.focused)
            .map(|w| w.pid)
            .ok_or(WindowError::NoHandle)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> MemoryWindowManager {
        MemoryWindowManager::new(vec![
            FakeWindow {
                handle: 0x400001,
                pid: 88,
                title: "Finder".into(),
            },
            FakeWindow {
                handle: 0x500001,
                pid: 120,
                title: "Terminal".into(),
            },
        ])
    }

    // ── Command construction ──────────────────────────────────────────────────

    #[test]
    fn test_xdotool_search_by_pid() {
        assert_eq!(
            script(Desktop::X11, WindowOp::Find(42)),
            vec!["search", "--onlyvisible", "--pid", "42"]
        );
        assert_eq!(
            script(Desktop::X11, WindowOp::FocusedPid),
            vec!["getactivewindow", "getwindowpid"]
        );
    }

    #[test]
    fn test_osascript_wraps_lines_in_system_events() {
        // Act
        let args = script(Desktop::MacOs, WindowOp::Activate(88));

        // Assert
        assert_eq!(args[0], "-e");
        assert_eq!(args[1], "tell application \"System Events\"");
        assert!(args.contains(&"set p to first process whose unix id is 88".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("end tell"));
    }

    #[test]
    fn test_powershell_substitutes_handle() {
        let args = script(Desktop::Windows, WindowOp::Title(1234));
        assert_eq!(args[..2], ["-NoProfile".to_string(), "-Command".to_string()]);
        assert!(args[2].contains("-eq 1234"));
        assert!(args[2].ends_with("$p.MainWindowTitle"));
    }

    #[test]
    fn test_parse_number_takes_first_line() {
        assert_eq!(parse_number::<u64>("xdotool", "4194305\n4194306").unwrap(), 4194305);
        assert!(matches!(
            parse_number::<i32>("xdotool", "not a pid"),
            Err(WindowError::Parse { .. })
        ));
    }

    // ── CommandWindowManager without a tool ──────────────────────────────────

    #[test]
    fn test_missing_tool_reports_spawn_error() {
        // Arrange
        let windows = CommandWindowManager::with_program(Desktop::X11, "robokit-no-such-tool");

        // Act
        let result = windows.active_pid();

        // Assert
        assert!(matches!(result, Err(WindowError::Spawn { .. })));
        assert!(!windows.is_valid());
    }

    #[test]
    fn test_title_without_selection_is_no_handle() {
        let windows = CommandWindowManager::with_program(Desktop::X11, "robokit-no-such-tool");
        assert!(matches!(windows.title(), Err(WindowError::NoHandle)));
        assert!(matches!(windows.set_handle(0), Err(WindowError::NoHandle)));
    }

    #[test]
    fn test_set_handle_is_returned_without_a_spawn() {
        let windows = CommandWindowManager::with_program(Desktop::X11, "robokit-no-such-tool");
        windows.set_handle(77).unwrap();
        assert_eq!(windows.handle().unwrap(), 77);
    }

    // ── MemoryWindowManager ───────────────────────────────────────────────────

    #[test]
    fn test_activate_by_pid_focuses_and_selects() {
        // Arrange
        let windows = desk();

        // Act
        windows.activate(120, 0).unwrap();

        // Assert
        assert_eq!(windows.focused(), 0x500001);
        assert_eq!(windows.handle().unwrap(), 0x500001);
        assert_eq!(windows.title().unwrap(), "Terminal");
        assert_eq!(windows.active_pid().unwrap(), 120);
    }

    #[test]
    fn test_activate_with_handle_ignores_pid() {
        let windows = desk();
        windows.activate(0, 0x400001).unwrap();
        assert_eq!(windows.active_pid().unwrap(), 88);
    }

    #[test]
    fn test_activate_unknown_pid_is_no_window() {
        assert!(matches!(
            desk().activate(9, 0),
            Err(WindowError::NoWindow { pid: 9 })
        ));
    }

    #[test]
    fn test_close_invalidates_the_selection() {
        // Arrange
        let windows = desk();
        windows.set_handle(0x400001).unwrap();
        assert!(windows.is_valid());

        // Act
        windows.close().unwrap();

        // Assert
        assert!(!windows.is_valid());
        assert!(matches!(windows.title(), Err(WindowError::NoHandle)));
    }
}
