//! Fixed diagnostic commands for one-click runs
//!
//! No free text is parsed here: the key must be one of [`KEYS`] and the only
//! argument ever interpolated is the `ls` path, which is checked against the
//! dialect's path pattern and replaced by `.` when it does not match.

use super::dialect::{CommandSpec, ShellDialect, Verb};

/// Diagnostic keys, in the order the home page lists them
pub const KEYS: [&str; 11] = [
    "whoami", "id", "uname", "uptime", "df", "free", "ps", "ls", "env", "pwd", "hostname",
];

/// Resolve a key (case-insensitive) to its verb
pub fn verb_for(key: &str) -> Option<Verb> {
    let key = key.trim();
    KEYS.iter()
        .find(|k| k.eq_ignore_ascii_case(key))
        .and_then(|k| Verb::from_key(k))
}

/// Build the command for `key`, or `None` if the key is not a diagnostic
pub fn build(dialect: &dyn ShellDialect, key: &str, path: Option<&str>) -> Option<CommandSpec> {
    let verb = verb_for(key)?;
    let arg = if verb == Verb::List {
        listing_path(dialect, path)
    } else {
        ""
    };
    Some(dialect.build_invocation(verb, arg))
}

fn listing_path<'a>(dialect: &dyn ShellDialect, path: Option<&'a str>) -> &'a str {
    match path.map(str::trim) {
        Some(p) if dialect.safe_path().is_match(p) => p,
        _ => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::dialect::{Posix, PowerShell};

    #[test]
    fn test_every_key_builds() {
        for key in KEYS {
            assert!(build(&Posix, key, None).is_some(), "{}", key);
            assert!(build(&PowerShell, key, None).is_some(), "{}", key);
        }
    }

    #[test]
    fn test_whoami_is_literal() {
        for dialect in [&Posix as &dyn ShellDialect, &PowerShell] {
            let spec = build(dialect, "whoami", Some("/tmp; rm -rf /")).unwrap();
            assert_eq!(spec.command, "whoami");
            assert_eq!(spec.title, "whoami");
        }
    }

    #[test]
    fn test_keys_case_insensitive() {
        assert_eq!(build(&Posix, "UNAME", None).unwrap().command, "uname -a");
        assert_eq!(build(&Posix, "Df", None).unwrap().command, "df -h");
    }

    #[test]
    fn test_unknown_keys() {
        for key in ["", "rm", "cat", "head", "tail", "whoami;id", "ls -la"] {
            assert!(build(&Posix, key, None).is_none(), "{:?}", key);
        }
    }

    #[test]
    fn test_ls_path() {
        let spec = build(&Posix, "ls", Some(" /var/log ")).unwrap();
        assert_eq!(spec.command, "ls -la -- '/var/log'");
        assert_eq!(spec.title, "ls -la /var/log");
    }

    #[test]
    fn test_ls_invalid_path_falls_back() {
        for path in [None, Some(""), Some("   "), Some("/tmp;id"), Some("$(id)"), Some("a'b")] {
            let spec = build(&Posix, "ls", path).unwrap();
            assert_eq!(spec.command, "ls -la -- '.'", "{:?}", path);
        }
    }

    #[test]
    fn test_ls_windows_path() {
        let spec = build(&PowerShell, "ls", Some("C:\\Users")).unwrap();
        assert_eq!(
            spec.command,
            "Get-ChildItem -Force -LiteralPath 'C:\\Users' | Format-Table -AutoSize"
        );
        let spec = build(&Posix, "ls", Some("C:\\Users")).unwrap();
        assert_eq!(spec.command, "ls -la -- '.'");
    }
}
