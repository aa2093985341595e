//! Clipboard adapters.
//!
//! [`CommandClipboard`] shells out to the platform's clipboard tools:
//!
//! | Platform | Read | Write |
//! |----------|------|-------|
//! | macOS | `pbpaste` | `pbcopy` |
//! | Linux (Wayland) | `wl-paste --no-newline` | `wl-copy` |
//! | Linux (X11) | `xclip -selection clipboard -o`, then `xsel` | `xclip -selection clipboard`, then `xsel` |
//! | Windows | `powershell Get-Clipboard` | `powershell Set-Clipboard` |
//!
//! Tools are tried in order; a tool that is not installed is skipped.
//! [`MemoryClipboard`] keeps the text in process for tests and headless runs.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use tracing::debug;

use crate::application::ports::{Clipboard, ClipboardError};

/// One clipboard command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub read_args: &'static [&'static str],
    pub write_args: &'static [&'static str],
}

const PASTEBOARD: ClipboardTool = ClipboardTool {
    program: "pbpaste",
    read_args: &[],
    write_args: &[],
};

const WL_CLIPBOARD: ClipboardTool = ClipboardTool {
    program: "wl-paste",
    read_args: &["--no-newline"],
    write_args: &[],
};

const XCLIP: ClipboardTool = ClipboardTool {
    program: "xclip",
    read_args: &["-selection", "clipboard", "-o"],
    write_args: &["-selection", "clipboard", "-i"],
};

const XSEL: ClipboardTool = ClipboardTool {
    program: "xsel",
    read_args: &["--clipboard", "--output"],
    write_args: &["--clipboard", "--input"],
};

const POWERSHELL: ClipboardTool = ClipboardTool {
    program: "powershell",
    read_args: &["-NoProfile", "-Command", "Get-Clipboard -Raw"],
    write_args: &["-NoProfile", "-Command", "$input | Set-Clipboard"],
};

impl ClipboardTool {
    /// Program used for writing; the paste/copy pairs differ in name.
    fn write_program(&self) -> &'static str {
        match self.program {
            "pbpaste" => "pbcopy",
            "wl-paste" => "wl-copy",
            other => other,
        }
    }
}

/// Clipboard backed by external tools.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    tools: Vec<ClipboardTool>,
}

impl CommandClipboard {
    /// Tools for the platform this binary was built for.
    pub fn for_platform() -> Self {
        let tools = if cfg!(target_os = "macos") {
            vec![PASTEBOARD]
        } else if cfg!(target_os = "windows") {
            vec![POWERSHELL]
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            vec![WL_CLIPBOARD, XCLIP, XSEL]
        } else {
            vec![XCLIP, XSEL]
        };
        Self { tools }
    }

    pub fn with_tools(tools: Vec<ClipboardTool>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[ClipboardTool] {
        &self.tools
    }

    /// Runs the first installed tool; `NotFound` moves on to the next one.
    fn run_first<T>(
        &self,
        mut run: impl FnMut(&ClipboardTool) -> Result<T, ClipboardError>,
    ) -> Result<T, ClipboardError> {
        for tool in &self.tools {
            match run(tool) {
                Err(ClipboardError::Spawn { program, source })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    debug!("{program} is not installed; trying the next clipboard tool");
                }
                other => return other,
            }
        }
        Err(ClipboardError::Unsupported)
    }
}

impl Clipboard for CommandClipboard {
    fn read(&self) -> Result<String, ClipboardError> {
        self.run_first(|tool| {
            let output = Command::new(tool.program)
                .args(tool.read_args)
                .output()
                .map_err(|source| ClipboardError::Spawn {
                    program: tool.program.to_string(),
                    source,
                })?;
            if !output.status.success() {
                return Err(ClipboardError::Failed {
                    program: tool.program.to_string(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            let mut text = String::from_utf8(output.stdout).map_err(|_| ClipboardError::NotUtf8)?;
            if tool.program == "powershell" && text.ends_with("\r\n") {
                text.truncate(text.len() - 2);
            }
            Ok(text)
        })
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        self.run_first(|tool| {
            let program = tool.write_program();
            let spawn_err = |source: io::Error| ClipboardError::Spawn {
                program: program.to_string(),
                source,
            };
            let mut child = Command::new(program)
                .args(tool.write_args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(spawn_err)?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).map_err(spawn_err)?;
            }
            let output = child.wait_with_output().map_err(spawn_err)?;
            if !output.status.success() {
                return Err(ClipboardError::Failed {
                    program: program.to_string(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            debug!("wrote {} bytes to the clipboard with {program}", text.len());
            Ok(())
        })
    }
}

/// In-process clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&self) -> Result<String, ClipboardError> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .map_err(|_| ClipboardError::Unsupported)
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self.contents.lock().map_err(|_| ClipboardError::Unsupported)?;
        *contents = text.to_string();
        Ok(())
    }
}
