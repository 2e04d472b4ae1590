//! forgeguard CLI - Main entry point
//!
//! 권한 엔진을 터미널에서 확인하기 위한 호스트. 명령어는 실행하지 않고 판정만 보여준다.

mod check;
mod classify;
mod init;
mod render;
mod session;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forgeguard_foundation::{GuardConfig, PermissionMode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// forgeguard - permission checks for agent shell commands and tool calls
#[derive(Parser, Debug)]
#[command(name = "forgeguard")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read configuration from this file instead of the global/project config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a shell command (exit code: 0 allow, 2 prompt, 1 block)
    Check {
        /// Command text to check
        command: String,

        /// Permission mode (safe, ask, allow-all)
        #[arg(short, long)]
        mode: Option<String>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a tool invocation
    Tool {
        /// Tool name (Write, Edit, Bash, ...)
        name: String,

        /// Shell command for shell tools
        #[arg(short, long)]
        command: Option<String>,

        /// Permission mode (safe, ask, allow-all)
        #[arg(short, long)]
        mode: Option<String>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a command is classified
    Classify {
        command: String,

        /// Permission mode whose allowlist is used
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// List permission modes and their policies
    Modes,
    /// Interactive approval session on stdin
    Session {
        /// Initial permission mode
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Write .forgeguard/config.json in the current directory
    Init {
        /// Default permission mode for new sessions
        #[arg(short, long, default_value = "ask")]
        mode: String,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let (config, config_error) = match &args.config {
        Some(path) => {
            let config = GuardConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            (config, None)
        }
        None => match GuardConfig::load() {
            Ok(config) => (config, None),
            Err(e) => (GuardConfig::default(), Some(e)),
        },
    };

    init_logging(args.debug, config.log_level.as_deref());
    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    match args.command {
        Command::Check { command, mode, json } => {
            let mode = resolve_mode(mode.as_deref(), &config);
            check::run_check(&command, mode, json)
        }
        Command::Tool {
            name,
            command,
            mode,
            json,
        } => {
            let mode = resolve_mode(mode.as_deref(), &config);
            check::run_tool(&name, command.as_deref(), mode, json)
        }
        Command::Classify { command, mode } => {
            let mode = resolve_mode(mode.as_deref(), &config);
            classify::run_classify(&command, mode)
        }
        Command::Modes => classify::run_modes(),
        Command::Session { mode } => {
            let mode = resolve_mode(mode.as_deref(), &config);
            session::run_interactive(mode)
        }
        Command::Init { mode, force } => init::run_init(&mode, force),
    }
}

/// `--mode` flag, then configuration (env > project > global), then `ask`
fn resolve_mode(flag: Option<&str>, config: &GuardConfig) -> PermissionMode {
    match flag {
        Some(value) => PermissionMode::parse_or_ask(value),
        None => config.resolved_default_mode(),
    }
}

/// RUST_LOG, then `--debug`, then the configured level, then `info`
fn init_logging(debug: bool, configured: Option<&str>) {
    let log_level = if debug {
        "debug"
    } else {
        configured.unwrap_or("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_config() {
        let config = GuardConfig::new().default_mode(PermissionMode::Safe);
        assert_eq!(resolve_mode(None, &config), PermissionMode::Safe);
        assert_eq!(
            resolve_mode(Some("allow-all"), &config),
            PermissionMode::AllowAll
        );
        assert_eq!(resolve_mode(Some("bogus"), &config), PermissionMode::Ask);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["forgeguard", "check", "ls -la", "--mode", "safe"]).unwrap();
        match args.command {
            Command::Check { command, mode, json } => {
                assert_eq!(command, "ls -la");
                assert_eq!(mode.as_deref(), Some("safe"));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args = Args::try_parse_from(["forgeguard", "--debug", "tool", "Bash", "-c", "pwd"]).unwrap();
        assert!(args.debug);
        assert!(matches!(args.command, Command::Tool { command: Some(_), .. }));

        let args = Args::try_parse_from(["forgeguard", "init", "-m", "safe", "-f"]).unwrap();
        match args.command {
            Command::Init { mode, force } => {
                assert_eq!(mode, "safe");
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_verify() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
