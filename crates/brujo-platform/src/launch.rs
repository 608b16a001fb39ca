//! Starting applications and opening files.

use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::thread;

use brujo_common::PlatformError;
use tracing::{debug, info, warn};

/// Split a command line into words, honouring single and double quotes
/// and backslash escapes the way desktop-entry `Exec` lines use them.
pub(crate) fn split_command(command: &str) -> Result<Vec<String>, PlatformError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(PlatformError::LaunchError(format!("unterminated quote in {command:?}")));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Start `command` in its own process group with no standard streams.
/// A reaper thread waits for it so it never lingers as a zombie.
fn spawn_detached(command: &mut Command) -> std::io::Result<u32> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;
    let pid = child.id();
    reap(child);
    Ok(pid)
}

fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "child exited"),
            Err(e) => warn!(pid, "cannot wait for child: {e}"),
        });
    if let Err(e) = spawned {
        warn!(pid, "cannot start reaper thread: {e}");
    }
}

/// Spawn `command` detached from the dock and return its pid.
pub fn launch_command(command: &str) -> Result<u32, PlatformError> {
    let words = split_command(command)?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| PlatformError::LaunchError("empty command".into()))?;

    let pid = spawn_detached(Command::new(program).args(args))
        .map_err(|e| PlatformError::LaunchError(format!("{program}: {e}")))?;
    info!(pid, command, "launched");
    Ok(pid)
}

/// Open `path` with the user's preferred application via `xdg-open`.
pub fn open_path(path: &std::path::Path) -> Result<(), PlatformError> {
    spawn_detached(Command::new("xdg-open").arg(path))
        .map_err(|e| PlatformError::LaunchError(format!("xdg-open {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_words() {
        assert_eq!(split_command("firefox --new-window").unwrap(), vec!["firefox", "--new-window"]);
    }

    #[test]
    fn honours_quotes() {
        assert_eq!(
            split_command(r#"sh -c "echo hi there" 'a b'"#).unwrap(),
            vec!["sh", "-c", "echo hi there", "a b"]
        );
    }

    #[test]
    fn empty_quotes_make_an_empty_word() {
        assert_eq!(split_command(r#"prog "" x"#).unwrap(), vec!["prog", "", "x"]);
    }

    #[test]
    fn backslash_escapes_space() {
        assert_eq!(
            split_command(r"/opt/My\ App/run").unwrap(),
            vec!["/opt/My App/run"]
        );
    }

    #[test]
    fn unterminated_quote_is_error() {
        assert!(split_command("prog \"oops").is_err());
    }

    #[test]
    fn empty_command_is_error() {
        assert!(matches!(launch_command("   "), Err(PlatformError::LaunchError(_))));
    }

    /// Process state letter from `/proc/<pid>/stat`, `None` once the
    /// entry is gone.
    fn proc_state(pid: u32) -> Option<char> {
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        stat.rsplit_once(") ")?.1.chars().next()
    }

    #[test]
    fn finished_child_is_reaped() {
        let pid = launch_command("true").unwrap();
        for _ in 0..100 {
            if proc_state(pid).is_none() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("child {pid} still present in state {:?}", proc_state(pid));
    }

    #[test]
    fn child_gets_its_own_process_group() {
        let pid = launch_command("sleep 0.3").unwrap();
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).unwrap();
        // Fields after the command name: state, ppid, pgrp.
        let fields: Vec<&str> = stat.rsplit_once(") ").unwrap().1.split_whitespace().collect();
        assert_eq!(fields[2], pid.to_string());
    }

    #[test]
    fn missing_program_is_error() {
        assert!(launch_command("/nonexistent/brujo-test-binary").is_err());
    }
}
