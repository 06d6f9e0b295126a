//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, `PowerShell` and elvish.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::ReadtimeError;

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if the shell is unknown or the script is not valid UTF-8.
pub fn completions(shell: &str, install: bool) -> Result<String, ReadtimeError> {
    let shell_type = shell_from_str(shell).ok_or_else(|| {
        ReadtimeError::InvalidInput(format!(
            "Unknown shell: {shell}. Supported: bash, zsh, fish, powershell, elvish"
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell_type))
    } else {
        generate_completions(shell_type)
    }
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, ReadtimeError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate_to(&mut buf, shell, &mut cmd);
    String::from_utf8(buf)
        .map_err(|e| ReadtimeError::InvalidInput(format!("Completion script is not UTF-8: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell, cmd: &mut clap::Command) {
    clap_complete::generate(shell, cmd, "readtime", buf);
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc or ~/.bash_profile:
source <(readtime completions bash)

# Or save to a file:
readtime completions bash > /usr/local/etc/bash_completion.d/readtime
"
        .to_string(),

        Shell::Zsh => r"# Add to ~/.zshrc (before compinit):
source <(readtime completions zsh)

# Or save to your fpath:
readtime completions zsh > ~/.zsh/completions/_readtime
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
readtime completions fish > ~/.config/fish/completions/readtime.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
readtime completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
readtime completions elvish > ~/.elvish/lib/readtime.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_from_str() {
        assert_eq!(shell_from_str("bash"), Some(Shell::Bash));
        assert_eq!(shell_from_str("ZSH"), Some(Shell::Zsh));
        assert_eq!(shell_from_str("pwsh"), Some(Shell::PowerShell));
        assert_eq!(shell_from_str("unknown"), None);
    }

    #[test]
    fn test_generate_bash_completions() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("readtime"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_completions_unknown_shell() {
        assert!(matches!(
            completions("tcsh", false),
            Err(ReadtimeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_install_instructions() {
        let text = completions("fish", true).unwrap();
        assert!(text.contains("readtime completions fish"));
    }
}
