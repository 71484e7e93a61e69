//! Free-text command sanitizer
//!
//! Turns raw user input from the pseudo-terminal into a [`ShellCommand`]
//! or a [`Rejection`]. Two independent layers guard the shell: the whole
//! input must match the dialect's character class, and any interpolated
//! path is quoted by the dialect on top of that.

use super::dialect::ShellDialect;
use thiserror::Error;

/// Maximum accepted input length, in characters (after trimming)
pub const MAX_INPUT_CHARS: usize = 2048;

/// A validated command ready for the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub title: String,
    pub command: String,
    /// Verb token as typed, lowercased
    pub key: String,
}

/// Why an input was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Empty")]
    Empty,
    #[error("Too long")]
    TooLong,
    #[error("Bad chars")]
    BadChars,
    #[error("Not allowed")]
    NotAllowed,
    #[error("Missing arg")]
    MissingArg,
}

impl Rejection {
    /// Hint shown next to the rejection on the shell page
    pub fn hint(&self) -> &'static str {
        match self {
            Rejection::Empty => "Type a command, for example: whoami",
            Rejection::TooLong => "The command is too long (2048 characters at most).",
            Rejection::BadChars => {
                "Only letters, digits, spaces and _ . / ~ @ : + = , - are allowed. \
                 Shell operators such as ; | & $ ` ( ) < > and quotes are refused."
            }
            Rejection::NotAllowed => "This command is not on the allowlist.",
            Rejection::MissingArg => "This command needs a file path, for example: cat /etc/hostname",
        }
    }
}

/// Validate `input` and build the command for `dialect`
pub fn try_build(dialect: &dyn ShellDialect, input: &str) -> Result<ShellCommand, Rejection> {
    if input.trim().is_empty() {
        return Err(Rejection::Empty);
    }
    // Only blanks are trimmed so a line break anywhere still fails the pattern
    let trimmed = input.trim_matches(|c: char| c == ' ' || c == '\t');
    if trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(Rejection::TooLong);
    }
    if !dialect.safe_input().is_match(trimmed) {
        return Err(Rejection::BadChars);
    }

    let (token, rest) = match trimmed.split_once(|c: char| c.is_whitespace()) {
        Some((token, rest)) => (token, rest.trim()),
        None => (trimmed, ""),
    };
    let verb = dialect.verb(token).ok_or(Rejection::NotAllowed)?;

    let arg = if verb.takes_path() && rest.is_empty() {
        if verb.requires_path() {
            return Err(Rejection::MissingArg);
        }
        "."
    } else {
        rest
    };

    let spec = dialect.build_invocation(verb, arg);
    Ok(ShellCommand {
        title: spec.title,
        command: spec.command,
        key: token.to_lowercase(),
    })
}

/// Verbs a dialect accepts, for rendering help text
pub fn vocabulary(dialect: &dyn ShellDialect) -> Vec<&'static str> {
    dialect.allowed_verbs().iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::dialect::{Posix, PowerShell, Verb};

    #[test]
    fn test_empty() {
        assert_eq!(try_build(&Posix, ""), Err(Rejection::Empty));
        assert_eq!(try_build(&Posix, "   \t "), Err(Rejection::Empty));
    }

    #[test]
    fn test_too_long() {
        let input = format!("ls {}", "a".repeat(MAX_INPUT_CHARS));
        assert_eq!(try_build(&Posix, &input), Err(Rejection::TooLong));

        let exact = format!("ls {}", "a".repeat(MAX_INPUT_CHARS - 3));
        assert!(try_build(&Posix, &exact).is_ok());
    }

    #[test]
    fn test_metacharacters_rejected() {
        let dialects: [&dyn ShellDialect; 2] = [&Posix, &PowerShell];
        for dialect in dialects {
            for bad in [";", "|", "&", "`", "$", "(", ")", "<", ">", "\"", "'", "\n", "\r"] {
                for input in [
                    format!("ls {}", bad),
                    format!("whoami{}", bad),
                    format!("cat /etc/passwd {} id", bad),
                    format!("rm{}rf", bad),
                ] {
                    assert_eq!(
                        try_build(dialect, &input),
                        Err(Rejection::BadChars),
                        "{} accepted {:?}",
                        dialect.name(),
                        input
                    );
                }
            }
        }
    }

    #[test]
    fn test_badchars_checked_before_verb() {
        assert_eq!(try_build(&Posix, "rm -rf / ; ls"), Err(Rejection::BadChars));
    }

    #[test]
    fn test_backslash_only_on_windows() {
        assert_eq!(try_build(&Posix, "ls a\\b"), Err(Rejection::BadChars));
        assert!(try_build(&PowerShell, "dir C:\\Temp").is_ok());
    }

    #[test]
    fn test_allowlist() {
        let dialects: [(&dyn ShellDialect, &str); 2] =
            [(&Posix, "/etc/hostname"), (&PowerShell, "C:\\Windows\\win.ini")];
        for (dialect, path) in dialects {
            for &(name, verb) in dialect.allowed_verbs() {
                let input = if verb.requires_path() {
                    format!("{} {}", name, path)
                } else {
                    name.to_string()
                };
                let built = try_build(dialect, &input).unwrap_or_else(|r| {
                    panic!("{} rejected {:?}: {}", dialect.name(), input, r)
                });
                assert_eq!(built.key, name);
                let arg = if verb.takes_path() { input[name.len()..].trim() } else { "" };
                let arg = if verb == Verb::List && arg.is_empty() { "." } else { arg };
                assert_eq!(built.command, dialect.build_invocation(verb, arg).command);
            }
        }
        for name in ["rm", "sudo", "curl", "dir", "type", "sh", "bash"] {
            assert_eq!(try_build(&Posix, name), Err(Rejection::NotAllowed), "{}", name);
        }
        for name in ["id", "uname", "head", "tail", "rm"] {
            assert_eq!(try_build(&PowerShell, name), Err(Rejection::NotAllowed), "{}", name);
        }
    }

    #[test]
    fn test_missing_arg() {
        assert_eq!(try_build(&Posix, "cat"), Err(Rejection::MissingArg));
        assert_eq!(try_build(&Posix, "head   "), Err(Rejection::MissingArg));
        assert_eq!(try_build(&Posix, "tail"), Err(Rejection::MissingArg));
        assert_eq!(try_build(&PowerShell, "type"), Err(Rejection::MissingArg));
    }

    #[test]
    fn test_listing_defaults_to_dot() {
        let cmd = try_build(&Posix, "ls").unwrap();
        assert_eq!(cmd.command, "ls -la -- '.'");
        assert_eq!(cmd.title, "ls -la .");
        assert_eq!(cmd.key, "ls");

        let cmd = try_build(&PowerShell, "DIR").unwrap();
        assert_eq!(
            cmd.command,
            "Get-ChildItem -Force -LiteralPath '.' | Format-Table -AutoSize"
        );
        assert_eq!(cmd.key, "dir");
    }

    #[test]
    fn test_fixed_commands_ignore_arguments() {
        let cmd = try_build(&Posix, "whoami extra words").unwrap();
        assert_eq!(cmd.command, "whoami");
        let cmd = try_build(&Posix, "  Uname ").unwrap();
        assert_eq!(cmd.command, "uname -a");
        assert_eq!(cmd.key, "uname");
    }

    #[test]
    fn test_path_argument_is_quoted() {
        let cmd = try_build(&Posix, "cat  /var/log/my file.log ").unwrap();
        assert_eq!(cmd.command, "head -c 200000 -- '/var/log/my file.log'");
        assert_eq!(cmd.title, "cat /var/log/my file.log");

        let cmd = try_build(&Posix, "tail\t/tmp/x").unwrap();
        assert_eq!(cmd.command, "tail -n 200 -- '/tmp/x'");
    }

    #[test]
    fn test_rejection_labels_and_hints() {
        assert_eq!(Rejection::BadChars.to_string(), "Bad chars");
        assert_eq!(Rejection::NotAllowed.to_string(), "Not allowed");
        assert!(Rejection::MissingArg.hint().contains("cat"));
        assert!(!Rejection::Empty.hint().is_empty());
    }

    #[test]
    fn test_vocabulary() {
        assert!(vocabulary(&Posix).contains(&"tail"));
        assert!(vocabulary(&PowerShell).contains(&"dir"));
    }
}
