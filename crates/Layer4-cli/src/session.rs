//! Interactive approval session
//!
//! stdin에서 명령을 한 줄씩 읽어 판정하고, prompt 판정이면 사용자에게 승인/거부를 묻는다.
//! 명령어 자체는 실행하지 않는다.

use crate::render;
use forgeguard_core::{DecisionKind, PermissionGate, PermissionMode};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const HELP: &str = "\
Type a shell command to check it. Meta commands:
  :mode <safe|ask|allow-all>  change this session's mode (clears approvals)
  :summary                    show session state
  :clear                      forget every approval and denial
  :help                       show this help
  :quit                       exit";

/// User answer to a prompt decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAnswer {
    Approve,
    Deny,
}

impl ApprovalAnswer {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" | "a" | "approve" => Some(Self::Approve),
            "n" | "no" | "d" | "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

/// `:`-prefixed session commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Mode(Option<String>),
    Summary,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl MetaCommand {
    /// Parse a line; `None` when it is not a meta command
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix(':')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("");

        Some(match name {
            "mode" | "m" => MetaCommand::Mode(parts.next().map(str::to_string)),
            "summary" | "s" => MetaCommand::Summary,
            "clear" | "c" => MetaCommand::Clear,
            "help" | "h" | "?" => MetaCommand::Help,
            "quit" | "q" | "exit" => MetaCommand::Quit,
            other => MetaCommand::Unknown(other.to_string()),
        })
    }
}

/// Counters reported when the session ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub checked: usize,
    pub allowed: usize,
    pub blocked: usize,
    pub prompted: usize,
}

/// One interactive session bound to a gate
pub struct ApprovalSession<'a> {
    gate: &'a PermissionGate,
    session_id: String,
    stats: SessionStats,
}

impl<'a> ApprovalSession<'a> {
    pub fn new(gate: &'a PermissionGate, session_id: impl Into<String>) -> Self {
        Self {
            gate,
            session_id: session_id.into(),
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Read lines until EOF or `:quit`
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> io::Result<()> {
        writeln!(output, "forgeguard session {} (:help for commands)", self.session_id)?;

        loop {
            let mode = self.gate.get_session_mode(&self.session_id);
            write!(output, "[{}]> ", mode)?;
            output.flush()?;

            let Some(line) = read_line(&mut input)? else {
                writeln!(output)?;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(meta) = MetaCommand::parse(line) {
                if !self.handle_meta(meta, output)? {
                    break;
                }
                continue;
            }

            if !self.handle_command(line, &mut input, output)? {
                break;
            }
        }

        let stats = self.stats;
        writeln!(
            output,
            "checked {} commands: {} allowed, {} blocked, {} prompted",
            stats.checked, stats.allowed, stats.blocked, stats.prompted
        )?;
        Ok(())
    }

    /// Returns false when the session should end
    fn handle_meta<W: Write>(&mut self, meta: MetaCommand, output: &mut W) -> io::Result<bool> {
        match meta {
            MetaCommand::Mode(Some(value)) => match value.parse::<PermissionMode>() {
                Ok(mode) => {
                    self.gate.set_session_mode(&self.session_id, mode);
                    writeln!(output, "mode set to {} (approvals cleared)", mode)?;
                }
                Err(e) => writeln!(output, "{}", e)?,
            },
            MetaCommand::Mode(None) => {
                let mode = self.gate.get_session_mode(&self.session_id);
                writeln!(output, "current mode: {}", mode)?;
            }
            MetaCommand::Summary => match self.gate.session_summary(&self.session_id) {
                Some(summary) => writeln!(output, "{}", render::summary_line(&summary))?,
                None => writeln!(output, "no session state yet")?,
            },
            MetaCommand::Clear => {
                let count = self.gate.clear_session_decisions(&self.session_id);
                writeln!(output, "cleared {} approvals and denials", count)?;
            }
            MetaCommand::Help => writeln!(output, "{}", HELP)?,
            MetaCommand::Quit => return Ok(false),
            MetaCommand::Unknown(name) => {
                writeln!(output, "unknown command ':{}' (try :help)", name)?
            }
        }
        Ok(true)
    }

    /// Returns false when input ended while waiting for an answer
    fn handle_command<R: BufRead, W: Write>(
        &mut self,
        command: &str,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<bool> {
        let result = self.gate.check_bash_permission(&self.session_id, command);
        self.stats.checked += 1;
        writeln!(output, "{}", render::decision_line(&result))?;

        match result.kind() {
            DecisionKind::Allow => self.stats.allowed += 1,
            DecisionKind::Block => self.stats.blocked += 1,
            DecisionKind::Prompt => {
                self.stats.prompted += 1;
                let Some(answer) = ask_approval(input, output)? else {
                    return Ok(false);
                };
                match answer {
                    ApprovalAnswer::Approve => {
                        self.gate.approve_command(&self.session_id, command)
                    }
                    ApprovalAnswer::Deny => self.gate.deny_command(&self.session_id, command),
                }
                let result = self.gate.check_bash_permission(&self.session_id, command);
                writeln!(output, "{}", render::decision_line(&result))?;
            }
        }
        Ok(true)
    }
}

/// Ask until a valid answer arrives; `None` on EOF
fn ask_approval<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<ApprovalAnswer>> {
    loop {
        write!(output, "  [y] approve / [n] deny: ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(output)?;
            return Ok(None);
        };
        match ApprovalAnswer::parse(&line) {
            Some(answer) => return Ok(Some(answer)),
            None => writeln!(output, "  please answer y or n")?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// `session` subcommand on the real terminal
pub fn run_interactive(mode: PermissionMode) -> anyhow::Result<ExitCode> {
    let gate = PermissionGate::with_default_mode(mode);
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut session = ApprovalSession::new(&gate, session_id);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}
