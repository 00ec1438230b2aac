//! Command Tokenization and Shell Wrapping
//!
//! Splits a raw command string into an executable path and argument list.
//! Arguments are delimited by spaces or tabs; a run of characters inside
//! single or double quotes forms one argument regardless of whitespace,
//! and a backslash escapes a following quote character.

use anyhow::bail;

/// A fully resolved invocation: the program to execute plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable path or name, resolved via PATH by the OS.
    pub program: String,
    /// Arguments, one per element, quoting already stripped.
    pub args: Vec<String>,
}

impl Invocation {
    /// Tokenize `command` and run its first token directly.
    pub fn direct(command: &str) -> anyhow::Result<Invocation> {
        let mut parts = tokenize(command);
        if parts.is_empty() {
            bail!("empty command string");
        }
        let program = parts.remove(0);
        Ok(Invocation {
            program,
            args: parts,
        })
    }

    /// Run `command` through an intermediate shell.
    ///
    /// The shell receives the raw, untokenized string, so shell syntax
    /// (pipes, globs, redirects) keeps working.
    pub fn via_shell(shell: &str, command: &str) -> anyhow::Result<Invocation> {
        if command.trim().is_empty() {
            bail!("empty command string");
        }
        Ok(Invocation {
            program: shell.to_string(),
            args: vec![shell_flag(shell).to_string(), command.to_string()],
        })
    }
}

/// Default intermediate shell for this platform.
pub fn default_shell() -> &'static str {
    if cfg!(windows) {
        "cmd.exe"
    } else {
        "/bin/sh"
    }
}

/// The command-string flag the given shell expects.
fn shell_flag(shell: &str) -> &'static str {
    let stem = std::path::Path::new(shell)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(shell);
    if stem.eq_ignore_ascii_case("cmd") {
        "/C"
    } else {
        "-c"
    }
}

/// Split a command string on unquoted whitespace.
fn tokenize(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for ch in command.chars() {
        if escaped {
            // Only quotes are escapable; a backslash before anything else
            // stays literal.
            if ch != '"' && ch != '\'' {
                current.push('\\');
            }
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' | '\'' => match in_quote {
                None => in_quote = Some(ch),
                Some(open) if open == ch => in_quote = None,
                Some(_) => current.push(ch),
            },
            ' ' | '\t' if in_quote.is_none() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_split() {
        assert_eq!(tokenize("ls -la /tmp"), strings(&["ls", "-la", "/tmp"]));
    }

    #[test]
    fn test_whitespace_runs_and_tabs() {
        assert_eq!(tokenize("  ls \t -la  "), strings(&["ls", "-la"]));
    }

    #[test]
    fn test_double_quotes_group() {
        assert_eq!(
            tokenize("grep \"two words\" file"),
            strings(&["grep", "two words", "file"])
        );
    }

    #[test]
    fn test_single_quotes_group_and_nest() {
        assert_eq!(
            tokenize("echo 'he said \"hi\"'"),
            strings(&["echo", "he said \"hi\""])
        );
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        assert_eq!(tokenize(r#"echo \"hi\""#), strings(&["echo", "\"hi\""]));
    }

    #[test]
    fn test_backslash_stays_literal_elsewhere() {
        assert_eq!(tokenize(r"type C:\temp"), strings(&["type", r"C:\temp"]));
    }

    #[test]
    fn test_empty_command_is_an_error() {
        assert!(Invocation::direct("").is_err());
        assert!(Invocation::direct("   ").is_err());
        assert!(Invocation::via_shell("/bin/sh", "  ").is_err());
    }

    #[test]
    fn test_direct_invocation() {
        let invocation = Invocation::direct("sleep 0.1").unwrap();
        assert_eq!(invocation.program, "sleep");
        assert_eq!(invocation.args, strings(&["0.1"]));
    }

    #[test]
    fn test_shell_invocation_keeps_raw_string() {
        let invocation = Invocation::via_shell("/bin/sh", "ls | wc -l").unwrap();
        assert_eq!(invocation.program, "/bin/sh");
        assert_eq!(invocation.args, strings(&["-c", "ls | wc -l"]));
    }

    #[test]
    fn test_cmd_exe_uses_slash_c() {
        let invocation = Invocation::via_shell("cmd.exe", "dir").unwrap();
        assert_eq!(invocation.args[0], "/C");

        let invocation = Invocation::via_shell("/bin/zsh", "ls").unwrap();
        assert_eq!(invocation.args[0], "-c");
    }
}
