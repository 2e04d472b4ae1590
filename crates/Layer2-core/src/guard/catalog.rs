//! Pattern catalog
//!
//! Static policy tables, compiled once per process:
//! - always-blocked commands (checked in every mode, no override)
//! - blocked shell constructs (redirects, substitutions, background jobs)
//! - read-only allowlist
//! - side-effect flags that disqualify an allowlist match
//! - write-class tool names blocked in safe mode
//!
//! Every group uses first-match semantics.

use regex::Regex;
use std::sync::OnceLock;

// ============================================================
// Tool names
// ============================================================

/// Structured tools rejected outright in safe mode
pub const BLOCKED_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit", "TodoWrite"];

/// Tools that execute shell commands; their permission comes from the bash check
pub const SHELL_TOOLS: &[&str] = &["Bash", "Shell"];

/// Canonical tool name: ASCII lowercase with `_`, `-` and spaces removed.
///
/// `multi_edit`, `multi-edit` and `MultiEdit` all map to `multiedit`.
pub fn canonical_tool_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether `name` is one of `tools` after canonicalization
pub fn tool_in(tools: &[&str], name: &str) -> bool {
    let name = canonical_tool_name(name);
    tools.iter().any(|t| canonical_tool_name(t) == name)
}

pub fn is_shell_tool(name: &str) -> bool {
    tool_in(SHELL_TOOLS, name)
}

// ============================================================
// Pattern types
// ============================================================

/// A compiled regex with a human-readable label
#[derive(Debug, Clone)]
pub struct CommandPattern {
    label: &'static str,
    regex: Regex,
}

impl CommandPattern {
    fn compile(label: &'static str, pattern: &str) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(regex) => Some(Self { label, regex }),
            Err(e) => {
                tracing::error!(label, pattern, error = %e, "Skipping invalid command pattern");
                None
            }
        }
    }

    /// Reason (blocked groups) or category (allowlist)
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

/// Shell constructs that can hide side effects from allowlist matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockedConstruct {
    /// `<(...)` or `>(...)`
    ProcessSubstitution,
    /// `$(...)` or backticks
    CommandSubstitution,
    /// `>`, `>>`, `2>`, `&>`
    Redirect,
    /// lone `&` (not `&&`, `|&`, `>&`, `&>`)
    Background,
}

impl BlockedConstruct {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ProcessSubstitution => "Process substitution is not allowed",
            Self::CommandSubstitution => "Command substitution is not allowed",
            Self::Redirect => "Output redirection is not allowed",
            Self::Background => "Background execution is not allowed",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ProcessSubstitution => "process-substitution",
            Self::CommandSubstitution => "command-substitution",
            Self::Redirect => "redirect",
            Self::Background => "background",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstructPattern {
    construct: BlockedConstruct,
    regex: Regex,
}

impl ConstructPattern {
    pub fn construct(&self) -> BlockedConstruct {
        self.construct
    }

    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

// ============================================================
// Catalog
// ============================================================

/// All static pattern groups
#[derive(Debug)]
pub struct PatternCatalog {
    always_blocked: Vec<CommandPattern>,
    constructs: Vec<ConstructPattern>,
    read_only: Vec<CommandPattern>,
    side_effect_flags: Vec<CommandPattern>,
}

static CATALOG: OnceLock<PatternCatalog> = OnceLock::new();

/// 전역 카탈로그 접근
pub fn catalog() -> &'static PatternCatalog {
    CATALOG.get_or_init(PatternCatalog::new)
}

impl PatternCatalog {
    fn new() -> Self {
        Self {
            always_blocked: compile_all(&always_blocked_patterns()),
            constructs: construct_patterns(),
            read_only: compile_all(&read_only_patterns()),
            side_effect_flags: compile_all(&side_effect_flag_patterns()),
        }
    }

    pub fn always_blocked(&self) -> &[CommandPattern] {
        &self.always_blocked
    }

    pub fn constructs(&self) -> &[ConstructPattern] {
        &self.constructs
    }

    pub fn read_only(&self) -> &[CommandPattern] {
        &self.read_only
    }

    pub fn side_effect_flags(&self) -> &[CommandPattern] {
        &self.side_effect_flags
    }

    /// Flag that turns an allowlisted command into a writer or launcher
    pub fn side_effect_flag(&self, command: &str) -> Option<&'static str> {
        self.side_effect_flags
            .iter()
            .find(|p| p.is_match(command))
            .map(|p| p.label())
    }
}

fn compile_all(table: &[(&'static str, String)]) -> Vec<CommandPattern> {
    table
        .iter()
        .filter_map(|(label, pattern)| CommandPattern::compile(*label, pattern))
        .collect()
}

// ============================================================
// Always-blocked (destructive, no override in any mode)
// ============================================================

/// Arguments that stay inside one simple command
const ARGS: &str = r"(?:[^\s;&|]+\s+)*";
/// Recursive flag for rm / chmod
const RECURSIVE: &str = r"(?:-[a-zA-Z]*[rR][a-zA-Z]*|--recursive)";
/// Where a path argument ends (optionally after a closing quote)
const END: &str = r#"["']?(?:\s|$|[;&|)])"#;
/// Optional opening quote of a path argument
const QUOTE: &str = r#"["']?"#;
/// Home directory spellings
const HOME: &str = r#"(?:~|\$HOME|\$\{HOME\})["']?"#;
/// Block devices
const DISK: &str = r"/dev/(?:sd|hd|vd|xvd|nvme|mmcblk|disk)";

fn always_blocked_patterns() -> Vec<(&'static str, String)> {
    vec![
        (
            "Recursive deletion of root filesystem",
            format!(r"\brm\s+{ARGS}{RECURSIVE}\s+{ARGS}{QUOTE}/+\*?{END}"),
        ),
        (
            "Recursive deletion of home directory",
            format!(r"\brm\s+{ARGS}{RECURSIVE}\s+{ARGS}{QUOTE}{HOME}(?:/+{QUOTE})?\*?{END}"),
        ),
        (
            "Recursive wildcard deletion",
            format!(r"\brm\s+{ARGS}{RECURSIVE}\s+{ARGS}{QUOTE}(?:\./)?\*{END}"),
        ),
        (
            "Recursive chmod 777",
            format!(r"\bchmod\s+{ARGS}(?:-[a-zA-Z]*R[a-zA-Z]*|--recursive)\s+{ARGS}0?777\b"),
        ),
        (
            "Recursive chmod 777",
            format!(r"\bchmod\s+{ARGS}0?777\s+{ARGS}(?:-[a-zA-Z]*R[a-zA-Z]*|--recursive){END}"),
        ),
        ("Raw disk write", format!(r"\bdd\b[^;&|]*\bof={DISK}")),
        ("Raw disk write", format!(r">\s*{DISK}")),
        (
            "Filesystem creation",
            r"\b(?:mkfs(?:\.\w+)?|mke2fs|mkswap|newfs(?:_\w+)?|wipefs)\b".to_string(),
        ),
        (
            "Fork bomb",
            r":\s*\(\s*\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;?\s*:".to_string(),
        ),
        (
            "Fork bomb",
            r"\b\w+\s*\(\s*\)\s*\{\s*\w+\s*\|\s*\w+\s*&\s*\}".to_string(),
        ),
        (
            "Remote script execution",
            r"\b(?:curl|wget)\b[^|;&]*\|\s*(?:sudo\s+(?:-\S+\s+)*)?(?:ba|z|da|k|fi)?sh\b"
                .to_string(),
        ),
        (
            "Remote script execution",
            r"\b(?:ba|z|da|k)?sh\s+<\(\s*(?:curl|wget)\b".to_string(),
        ),
        (
            "Remote script execution",
            r#"\b(?:ba|z|da|k)?sh\s+-c\s+["']?\$\(\s*(?:curl|wget)\b"#.to_string(),
        ),
    ]
}

// ============================================================
// Blocked constructs (safe / ask only)
// ============================================================

fn construct_patterns() -> Vec<ConstructPattern> {
    // Process substitution comes before redirect so `>(...)` gets the specific reason.
    let table = [
        (BlockedConstruct::ProcessSubstitution, r"[<>]\("),
        (BlockedConstruct::CommandSubstitution, r"\$\(|`"),
        (BlockedConstruct::Redirect, r"[0-9&]?>>?"),
        (BlockedConstruct::Background, r"(?:^|[^&>|])&(?:[^&>]|$)"),
    ];

    table
        .iter()
        .filter_map(|(construct, pattern)| match Regex::new(pattern) {
            Ok(regex) => Some(ConstructPattern {
                construct: *construct,
                regex,
            }),
            Err(e) => {
                tracing::error!(construct = construct.name(), error = %e, "Skipping invalid construct pattern");
                None
            }
        })
        .collect()
}

// ============================================================
// Read-only allowlist
// ============================================================

/// Global git options that cannot change what a subcommand does
const GIT: &str = r"^git(?:\s+(?:-C\s+\S+|--no-pager|-P))*\s+";

fn read_only_patterns() -> Vec<(&'static str, String)> {
    let fixed: &[(&'static str, &str)] = &[
        // 파일 조회
        (
            "file inspection",
            r"^(?:ls|ll|la|dir|cat|bat|head|tail|less|more|wc|stat|file|tree|du|df|pwd|realpath|readlink|basename|dirname|nl|od|hexdump|strings|cmp|comm|diff|md5sum|sha1sum|sha256sum|sha512sum|cksum)(?:\s.*)?$",
        ),
        // xxd 두 번째 인자는 출력 파일
        (
            "file inspection",
            r"^xxd(?:\s+-[a-qs-zA-Z]+\d*(?:\s+[+-]?(?:0x)?[0-9a-fA-F]+)?)*(?:\s+[^-\s]\S*)?$",
        ),
        (
            "find without actions",
            r"^find(?:\s+(?:[^-\s]\S*|-(?:name|iname|path|ipath|wholename|regex|iregex|type|xtype|maxdepth|mindepth|size|mtime|mmin|atime|amin|ctime|cmin|newer|empty|user|group|perm|print|print0|ls|not|o|or|a|and|prune|follow|xdev|mount|readable|writable|executable|L|H|P)))*$",
        ),
        (
            "directory navigation",
            r"^(?:cd|pushd|popd)(?:\s+\S+)?$",
        ),
        // 검색
        (
            "search",
            r"^(?:grep|egrep|fgrep|rg|ag|ack|locate|which|whereis|type|command\s+-v)(?:\s.*)?$",
        ),
        // 텍스트 처리 (stdout 전용)
        (
            "text processing",
            r"^(?:sort|cut|tr|column|jq|fmt|fold|paste|expand|unexpand|rev|tac|seq|echo|printf|true|false|sleep)(?:\s.*)?$",
        ),
        // uniq 두 번째 인자는 출력 파일
        (
            "text processing",
            r"^uniq(?:\s+(?:-[a-zA-Z]*[fsw]\s*\d+|-[a-zA-Z]+|--[\w-]+(?:=\S+)?))*(?:\s+[^-\s]\S*)?$",
        ),
        // 패키지 조회
        (
            "package query",
            r"^(?:npm|pnpm|yarn)\s+(?:ls|list|ll|la|view|info|show|outdated|why|explain|search|root|prefix|help|-v|--version)(?:\s.*)?$",
        ),
        ("package query", r"^npm\s+config\s+(?:get|list|ls)(?:\s.*)?$"),
        (
            "package query",
            r"^cargo\s+(?:tree|metadata|search|pkgid|verify-project|locate-project|version|--version|-V|--list)(?:\s.*)?$",
        ),
        (
            "package query",
            r"^(?:pip|pip3|python3?\s+-m\s+pip)\s+(?:list|show|freeze|check|--version|-V)(?:\s.*)?$",
        ),
        (
            "package query",
            r"^brew\s+(?:list|ls|info|search|outdated|deps|uses|leaves|config|--version)(?:\s.*)?$",
        ),
        (
            "package query",
            r"^(?:apt|apt-cache)\s+(?:list|show|search|policy|depends|rdepends|showpkg)(?:\s.*)?$",
        ),
        (
            "package query",
            r"^dpkg(?:-query)?\s+(?:-l|-L|-s|-S|-W|--list|--listfiles|--status|--search|--show)(?:\s.*)?$",
        ),
        (
            "package query",
            r"^gem\s+(?:list|info|search|environment|env)(?:\s.*)?$",
        ),
        ("package query", r"^go\s+(?:version|list|doc)(?:\s.*)?$"),
        ("package query", r"^go\s+env(?:\s+[A-Z_][A-Z0-9_]*)*$"),
        // 시스템 정보
        (
            "system introspection",
            r"^(?:ps|pgrep|pidof|uptime|uname|whoami|id|groups|who|w|last|free|nproc|arch|lscpu|lsblk|lsusb|lspci|lsof|vmstat|iostat|mpstat|tty|locale|getconf)(?:\s.*)?$",
        ),
        ("system introspection", r"^top\s+-b(?:\s.*)?$"),
        ("system introspection", r"^hostname(?:\s+-[a-zA-Z]+)*$"),
        (
            "system introspection",
            r#"^date(?:\s+(?:-u|-R|-I\S*|--utc|--iso-8601\S*|--rfc-\S+|\+(?:"[^"]*"|'[^']*'|\S+)))*$"#,
        ),
        ("environment listing", r"^(?:env|printenv)$"),
        ("environment listing", r"^printenv(?:\s+\w+)+$"),
        (
            "service status",
            r"^systemctl\s+(?:status|is-active|is-enabled|is-failed|list-units|list-unit-files|list-timers|show|cat)(?:\s.*)?$",
        ),
        (
            "container introspection",
            r"^(?:docker|podman)\s+(?:ps|images|version|info|inspect|logs)(?:\s.*)?$",
        ),
        (
            "container introspection",
            r"^kubectl\s+(?:get|describe|logs|version|explain|api-resources|config\s+(?:view|get-contexts|current-context))(?:\s.*)?$",
        ),
        // 도움말 / 버전
        (
            "help or version",
            r"^[\w.+-]+(?:\s+[a-z][\w-]*)?\s+(?:--help|--version)$",
        ),
        (
            "help or version",
            r"^(?:man|tldr|info|help|whatis|apropos)(?:\s+[\w.:+-]+)+$",
        ),
        (
            "help or version",
            r"^(?:node|python|python3|ruby|rustc|cargo|rustup|go|java|javac|deno|bun|npm|pnpm|yarn|pip|pip3|gcc|g\+\+|clang|make|cmake|docker|kubectl|terraform|git)\s+(?:-v|-V|--version|version)$",
        ),
        ("git read-only", r"^git\s+(?:--version|--help)$"),
    ];

    let git = vec![
        (
            "git read-only",
            format!(r"{GIT}(?:status|log|diff|show|blame|shortlog|describe|rev-parse|rev-list|ls-files|ls-tree|ls-remote|cat-file|grep|whatchanged|version|help)(?:\s.*)?$"),
        ),
        (
            "git branch listing",
            format!(r"{GIT}branch(?:\s+(?:-a|-r|-v|-vv|-av|-rv|-l|--all|--remotes|--verbose|--list|--show-current|--merged|--no-merged|--sort=\S+|--format=\S+|--color(?:=\S+)?|--no-color))*$"),
        ),
        ("git remote listing", format!(r"{GIT}remote(?:\s+(?:-v|--verbose))?$")),
        ("git remote listing", format!(r"{GIT}remote\s+(?:show|get-url)(?:\s+\S+)*$")),
        ("git tag listing", format!(r"{GIT}tag(?:\s+(?:-l|--list)(?:\s+\S+)*)?$")),
        ("git stash listing", format!(r"{GIT}stash\s+(?:list|show)(?:\s.*)?$")),
        (
            "git config query",
            format!(r"{GIT}config(?:\s+--(?:global|local|system))?\s+(?:--get|--get-all|--get-regexp|--list|-l)(?:\s.*)?$"),
        ),
        ("git reflog", format!(r"{GIT}reflog(?:\s+show)?(?:\s+(?:-\S+|\d+))*$")),
    ];

    fixed
        .iter()
        .map(|(label, pattern)| (*label, pattern.to_string()))
        .chain(git)
        .collect()
}

// ============================================================
// Side-effect flags (disqualify an allowlist match)
// ============================================================

/// Start of any later argument
const LATER: &str = r"\s(?:.*\s)?";

fn side_effect_flag_patterns() -> Vec<(&'static str, String)> {
    vec![
        ("writes to a file", format!(r"^git{LATER}--output(?:=|\s|$)")),
        (
            "writes to a file",
            format!(r"^(?:sort|tree|info){LATER}(?:-[a-zA-Z]*o|--output)"),
        ),
        ("writes to a file", format!(r"^less{LATER}(?:-[a-zA-Z]*[oO]|--log-file|--LOG-FILE)")),
        ("writes to a file", format!(r"^file{LATER}-[a-zA-Z]*C")),
        // --search-zip은 압축 해제 프로그램을 실행한다
        (
            "runs another program",
            format!(r"^rg{LATER}(?:--pre|--hostname-bin|--search-zip|-[a-zA-Z]*z[a-zA-Z]*)(?:=|\s|$)"),
        ),
        ("runs another program", format!(r"^sort{LATER}--compress-program")),
        ("runs another program", format!(r"^(?:bat|ag|ack){LATER}--pager")),
        (
            "runs another program",
            format!(r"^man{LATER}(?:-[a-zA-Z]*[PH]|--pager|--html)"),
        ),
        ("runs another program", format!(r"^git{LATER}(?:-O|--open-files-in-pager)")),
        ("runs another program", format!(r"^git{LATER}ls-remote{LATER}(?:-u|--upload-pack)(?:=|\s|$)")),
    ]
}
