//! robokit command-line entry point.
//!
//! Loads the configuration, initialises logging, builds a `Robot` and runs
//! one command:
//!
//! ```text
//! robokit pids <name>       print the pids whose name contains <name>
//! robokit type <text>       type <text> into the focused window
//! robokit paste <text>      paste <text> through the clipboard
//! robokit activate <name>   bring the first process matching <name> forward
//! ```
//!
//! # Adapters
//!
//! Built with `--features native`, the robot drives the real OS: the native
//! input backend, clipboard tools, `sysinfo` and the window tool.  Without
//! the feature every adapter is in-memory, which is useful for trying the
//! call surface on a headless machine.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use robokit::application::robot::{Collaborators, Robot};
use robokit::infrastructure::config::{load_config, RobokitConfig};

const USAGE: &str = "usage: robokit <pids|type|paste|activate> <argument>";

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (RobokitConfig::default(), Some(e)),
    };

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    if let Some(e) = config_error {
        warn!("using default configuration: {e}");
    }

    let mut args = std::env::args().skip(1);
    let (Some(command), Some(argument)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };

    let mut robot = Robot::new(collaborators()?, (&config.input).into());
    robot.set_smooth_defaults((&config.smooth).into());
    robot.set_micro_delay(config.typing.micro_delay_ms);
    if let Some(strategy) = config.typing.strategy.strategy() {
        robot.set_text_strategy(strategy);
    }
    info!("robokit ready; running {command:?}");

    match command.as_str() {
        "pids" => {
            for pid in robot.find_pids_by_name(&argument)? {
                println!("{pid}");
            }
        }
        "type" => robot.type_text(&argument),
        "paste" => robot.paste(&argument).context("paste failed")?,
        "activate" => robot
            .activate_by_name(&argument)
            .with_context(|| format!("could not activate {argument:?}"))?,
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
    Ok(())
}

/// Native adapters for the build target.
#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "linux", target_os = "macos")
))]
fn collaborators() -> anyhow::Result<Collaborators> {
    use robokit::infrastructure::backend::{native_backend, ThreadPacer};
    use robokit::infrastructure::clipboard::CommandClipboard;
    use robokit::infrastructure::process::SysinfoProcessTable;
    use robokit::infrastructure::window::CommandWindowManager;

    Ok(Collaborators {
        backend: Arc::new(native_backend().context("could not open the input backend")?),
        clipboard: Arc::new(CommandClipboard::for_platform()),
        processes: Arc::new(SysinfoProcessTable::new()),
        windows: Arc::new(CommandWindowManager::for_platform()?),
        pacer: Arc::new(ThreadPacer),
    })
}

/// In-memory adapters; nothing reaches the OS.
#[cfg(not(all(
    feature = "native",
    any(target_os = "windows", target_os = "linux", target_os = "macos")
)))]
fn collaborators() -> anyhow::Result<Collaborators> {
    use robokit::infrastructure::backend::mock::{RecordingBackend, RecordingPacer};
    use robokit::infrastructure::clipboard::MemoryClipboard;
    use robokit::infrastructure::process::FixedProcessTable;
    use robokit::infrastructure::window::MemoryWindowManager;

    warn!("built without the `native` feature; input is recorded, not injected");
    Ok(Collaborators {
        backend: Arc::new(RecordingBackend::recording()),
        clipboard: Arc::new(MemoryClipboard::new()),
        processes: Arc::new(FixedProcessTable::default()),
        windows: Arc::new(MemoryWindowManager::default()),
        pacer: Arc::new(RecordingPacer::default()),
    })
}
