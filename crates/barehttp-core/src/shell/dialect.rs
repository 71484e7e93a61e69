//! Shell dialects
//!
//! A dialect owns everything that differs between the POSIX `/bin/sh`
//! world and the Windows PowerShell world: quoting, the free-text verb
//! vocabulary, the input character classes, the concrete command text for
//! each verb and the interpreter invocation. One dialect is picked at
//! startup ([`native`]) and handed to the sanitizer and the runner.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title plus the literal command line handed to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Human-readable label
    pub title: String,
    /// Exact text executed by the dialect's shell
    pub command: String,
}

impl CommandSpec {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
        }
    }
}

/// Operations the allowlisted commands can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Whoami,
    Id,
    Uname,
    Uptime,
    Df,
    Free,
    Ps,
    Env,
    Pwd,
    Hostname,
    /// Directory listing, path defaults to `.`
    List,
    /// File contents, path required
    Cat,
    Head,
    Tail,
}

impl Verb {
    /// Every verb, in display order
    pub const ALL: [Verb; 14] = [
        Verb::Whoami,
        Verb::Id,
        Verb::Uname,
        Verb::Uptime,
        Verb::Df,
        Verb::Free,
        Verb::Ps,
        Verb::Env,
        Verb::Pwd,
        Verb::Hostname,
        Verb::List,
        Verb::Cat,
        Verb::Head,
        Verb::Tail,
    ];

    /// Canonical key (POSIX spelling)
    pub fn key(&self) -> &'static str {
        match self {
            Verb::Whoami => "whoami",
            Verb::Id => "id",
            Verb::Uname => "uname",
            Verb::Uptime => "uptime",
            Verb::Df => "df",
            Verb::Free => "free",
            Verb::Ps => "ps",
            Verb::Env => "env",
            Verb::Pwd => "pwd",
            Verb::Hostname => "hostname",
            Verb::List => "ls",
            Verb::Cat => "cat",
            Verb::Head => "head",
            Verb::Tail => "tail",
        }
    }

    /// Look a verb up by canonical key (case-insensitive)
    pub fn from_key(key: &str) -> Option<Verb> {
        Verb::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(key))
    }

    /// Whether the verb interpolates a path argument
    pub fn takes_path(&self) -> bool {
        matches!(self, Verb::List | Verb::Cat | Verb::Head | Verb::Tail)
    }

    /// Whether a missing path is an error (as opposed to defaulting to `.`)
    pub fn requires_path(&self) -> bool {
        matches!(self, Verb::Cat | Verb::Head | Verb::Tail)
    }
}

/// Per-OS shell capability
pub trait ShellDialect: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Quote one argument so the shell sees it as a single literal word
    fn quote(&self, arg: &str) -> String;

    /// Free-text tokens accepted by the sanitizer and the verb each maps to
    fn allowed_verbs(&self) -> &'static [(&'static str, Verb)];

    /// Resolve a free-text token (case-insensitive)
    fn verb(&self, token: &str) -> Option<Verb> {
        self.allowed_verbs()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, verb)| *verb)
    }

    /// Pattern the whole trimmed free-text input must match
    fn safe_input(&self) -> &'static Regex;

    /// Pattern for the `path` argument of the diagnostic `ls`
    fn safe_path(&self) -> &'static Regex;

    /// Build the command for a verb; `arg` is only used by path verbs
    fn build_invocation(&self, verb: Verb, arg: &str) -> CommandSpec;

    /// Interpreter executable
    fn program(&self) -> String;

    /// Interpreter arguments that run `command` non-interactively
    fn args(&self, command: &str) -> Vec<String>;
}

static POSIX_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_./~@:+=, \t-]{1,2048}$").expect("valid POSIX input pattern")
});
static POSIX_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_./~ -]{1,4096}$").expect("valid POSIX path pattern"));
static WINDOWS_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_./~\\@:+=, \t-]{1,2048}$").expect("valid Windows input pattern")
});
static WINDOWS_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_./~ \\:-]{1,4096}$").expect("valid Windows path pattern")
});

/// `/bin/sh` with single-quote escaping
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl ShellDialect for Posix {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn quote(&self, arg: &str) -> String {
        format!("'{}'", arg.replace('\'', r#"'"'"'"#))
    }

    fn allowed_verbs(&self) -> &'static [(&'static str, Verb)] {
        &[
            ("whoami", Verb::Whoami),
            ("id", Verb::Id),
            ("uname", Verb::Uname),
            ("uptime", Verb::Uptime),
            ("df", Verb::Df),
            ("free", Verb::Free),
            ("ps", Verb::Ps),
            ("env", Verb::Env),
            ("pwd", Verb::Pwd),
            ("hostname", Verb::Hostname),
            ("ls", Verb::List),
            ("cat", Verb::Cat),
            ("head", Verb::Head),
            ("tail", Verb::Tail),
        ]
    }

    fn safe_input(&self) -> &'static Regex {
        &POSIX_INPUT
    }

    fn safe_path(&self) -> &'static Regex {
        &POSIX_PATH
    }

    fn build_invocation(&self, verb: Verb, arg: &str) -> CommandSpec {
        match verb {
            Verb::Whoami => CommandSpec::new("whoami", "whoami"),
            Verb::Id => CommandSpec::new("id", "id"),
            Verb::Uname => CommandSpec::new("uname -a", "uname -a"),
            Verb::Uptime => CommandSpec::new("uptime", "uptime"),
            Verb::Df => CommandSpec::new("df -h", "df -h"),
            Verb::Free => CommandSpec::new("free -m", "free -m"),
            Verb::Ps => CommandSpec::new("ps aux", "ps aux"),
            Verb::Env => CommandSpec::new("env", "env"),
            Verb::Pwd => CommandSpec::new("pwd", "pwd"),
            Verb::Hostname => CommandSpec::new("hostname", "hostname"),
            Verb::List => CommandSpec::new(
                format!("ls -la {}", arg),
                format!("ls -la -- {}", self.quote(arg)),
            ),
            Verb::Cat => CommandSpec::new(
                format!("cat {}", arg),
                format!("head -c 200000 -- {}", self.quote(arg)),
            ),
            Verb::Head => CommandSpec::new(
                format!("head {}", arg),
                format!("head -n 200 -- {}", self.quote(arg)),
            ),
            Verb::Tail => CommandSpec::new(
                format!("tail {}", arg),
                format!("tail -n 200 -- {}", self.quote(arg)),
            ),
        }
    }

    fn program(&self) -> String {
        if std::path::Path::new("/bin/sh").exists() {
            "/bin/sh".to_string()
        } else {
            "sh".to_string()
        }
    }

    fn args(&self, command: &str) -> Vec<String> {
        vec!["-lc".to_string(), command.to_string()]
    }
}

/// Windows PowerShell with single-quote doubling
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShell;

impl ShellDialect for PowerShell {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn quote(&self, arg: &str) -> String {
        format!("'{}'", arg.replace('\'', "''"))
    }

    fn allowed_verbs(&self) -> &'static [(&'static str, Verb)] {
        &[
            ("whoami", Verb::Whoami),
            ("hostname", Verb::Hostname),
            ("dir", Verb::List),
            ("ls", Verb::List),
            ("type", Verb::Cat),
            ("cat", Verb::Cat),
            ("ps", Verb::Ps),
            ("pwd", Verb::Pwd),
            ("env", Verb::Env),
            ("uptime", Verb::Uptime),
            ("df", Verb::Df),
            ("free", Verb::Free),
        ]
    }

    fn safe_input(&self) -> &'static Regex {
        &WINDOWS_INPUT
    }

    fn safe_path(&self) -> &'static Regex {
        &WINDOWS_PATH
    }

    fn build_invocation(&self, verb: Verb, arg: &str) -> CommandSpec {
        match verb {
            Verb::Whoami => CommandSpec::new("whoami", "whoami"),
            Verb::Hostname => CommandSpec::new("hostname", "hostname"),
            Verb::Id => CommandSpec::new("whoami /all", "whoami /all"),
            Verb::Uname => CommandSpec::new(
                "system info",
                "[System.Environment]::OSVersion | Format-List *",
            ),
            Verb::Uptime => CommandSpec::new(
                "uptime",
                "(Get-Date) - (Get-CimInstance Win32_OperatingSystem).LastBootUpTime | Out-String",
            ),
            Verb::Df => CommandSpec::new(
                "drives",
                "Get-PSDrive -PSProvider FileSystem | Format-Table -AutoSize",
            ),
            Verb::Free => CommandSpec::new(
                "memory",
                "Get-CimInstance Win32_OperatingSystem | Select-Object TotalVisibleMemorySize, FreePhysicalMemory | Format-List",
            ),
            Verb::Ps => CommandSpec::new(
                "processes",
                "Get-Process | Sort-Object CPU -Descending | Select-Object -First 200 | Format-Table -AutoSize",
            ),
            Verb::Env => CommandSpec::new(
                "env",
                "Get-ChildItem env:* | Sort-Object Name | Format-Table -AutoSize",
            ),
            Verb::Pwd => CommandSpec::new("pwd", "Get-Location"),
            Verb::List => CommandSpec::new(
                format!("ls -la {}", arg),
                format!(
                    "Get-ChildItem -Force -LiteralPath {} | Format-Table -AutoSize",
                    self.quote(arg)
                ),
            ),
            Verb::Cat => CommandSpec::new(
                format!("cat {}", arg),
                format!("Get-Content -LiteralPath {} -TotalCount 1000", self.quote(arg)),
            ),
            Verb::Head => CommandSpec::new(
                format!("head {}", arg),
                format!("Get-Content -LiteralPath {} -TotalCount 200", self.quote(arg)),
            ),
            Verb::Tail => CommandSpec::new(
                format!("tail {}", arg),
                format!("Get-Content -LiteralPath {} -Tail 200", self.quote(arg)),
            ),
        }
    }

    fn program(&self) -> String {
        "powershell".to_string()
    }

    fn args(&self, command: &str) -> Vec<String> {
        [
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            command,
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

/// The dialect of the host we are running on
pub fn native() -> &'static dyn ShellDialect {
    if cfg!(windows) {
        &PowerShell
    } else {
        &Posix
    }
}
