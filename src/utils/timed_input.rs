//! Yes/no confirmation with a timeout
//!
//! Standard input cannot be read with a timeout portably, so the blocking
//! read happens in a short-lived child process (by default this executable
//! re-run with the hidden `read-line` subcommand). The parent waits for the
//! child at most `timeout` and kills it otherwise, which leaves any later
//! input on stdin for whoever reads next.

use std::ffi::OsString;
use std::io::{self, BufRead, Read, Write};
use std::process::{Command, Stdio};
use std::time::Duration;

use log::debug;
use wait_timeout::ChildExt;

/// Hidden subcommand that reads one line from stdin and echoes it
pub const READ_LINE_COMMAND: &str = "read-line";

/// Confirmation timeout of single-image strategies
pub const STRATEGY_CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);
/// Confirmation timeout of bulk sessions
pub const BULK_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Line reader bounded by a timeout
pub struct TimedInput {
    program: OsString,
    args: Vec<OsString>,
}

impl TimedInput {
    /// A reader that re-runs the current executable with [`READ_LINE_COMMAND`]
    pub fn new() -> io::Result<Self> {
        let program = std::env::current_exe()?.into_os_string();
        Ok(Self::with_reader(program, [READ_LINE_COMMAND]))
    }

    /// A reader running `program` with `args`; the child must print the line it read
    pub fn with_reader<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        TimedInput {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads one trimmed line, or `None` if nothing arrives within `timeout`
    ///
    /// A reader that exits unsuccessfully (for example on end of input) also
    /// counts as no answer.
    pub fn take(&self, timeout: Duration) -> io::Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let status = match child.wait_timeout(timeout)? {
            Some(status) => status,
            None => {
                debug!("No input within {:?}, stopping the reader", timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
        };

        if !status.success() {
            return Ok(None);
        }

        let mut output = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_string(&mut output)?;
        }

        Ok(Some(output.lines().next().unwrap_or("").trim().to_string()))
    }
}

/// Body of the hidden `read-line` subcommand
///
/// # Returns
/// `false` when stdin was already at its end
pub fn echo_one_line() -> io::Result<bool> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(false);
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line.trim_end_matches(['\r', '\n']))?;
    stdout.flush()?;
    Ok(true)
}

/// How the operator answered a confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAnswer {
    /// Nothing typed before the timeout
    Timeout,
    /// Enter on an empty line
    Default,
    /// "yes" or "y" in any case
    Yes,
    /// Anything else
    No(String),
}

impl ConfirmAnswer {
    pub fn from_input(input: Option<&str>) -> Self {
        match input {
            None => ConfirmAnswer::Timeout,
            Some("") => ConfirmAnswer::Default,
            Some(text) if text.eq_ignore_ascii_case("yes") || text.eq_ignore_ascii_case("y") => {
                ConfirmAnswer::Yes
            }
            Some(text) => ConfirmAnswer::No(text.to_string()),
        }
    }

    pub fn proceeds(&self) -> bool {
        !matches!(self, ConfirmAnswer::No(_))
    }
}

/// Prints the continue prompt and waits for the operator's answer
pub fn ask_to_continue(input: &TimedInput, timeout: Duration) -> io::Result<ConfirmAnswer> {
    println!("Please confirm the above config file contents");
    println!(
        "Do you want to continue? [ Y (Yes) | n (no) ]: < default: Yes, timeout: {} seconds >",
        timeout.as_secs()
    );
    io::stdout().flush()?;

    let answer = ConfirmAnswer::from_input(input.take(timeout)?.as_deref());
    match answer {
        ConfirmAnswer::Timeout => println!("\nYes (timeout)"),
        ConfirmAnswer::Default => println!("Yes (default)"),
        _ => {}
    }
    println!("-");
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_answer_policy() {
        assert_eq!(ConfirmAnswer::from_input(None), ConfirmAnswer::Timeout);
        assert_eq!(ConfirmAnswer::from_input(Some("")), ConfirmAnswer::Default);
        assert_eq!(ConfirmAnswer::from_input(Some("Y")), ConfirmAnswer::Yes);
        assert_eq!(ConfirmAnswer::from_input(Some("yEs")), ConfirmAnswer::Yes);
        assert_eq!(ConfirmAnswer::from_input(Some("no")), ConfirmAnswer::No("no".to_string()));
        assert_eq!(ConfirmAnswer::from_input(Some("yep")), ConfirmAnswer::No("yep".to_string()));

        assert!(ConfirmAnswer::Timeout.proceeds());
        assert!(ConfirmAnswer::Default.proceeds());
        assert!(ConfirmAnswer::Yes.proceeds());
        assert!(!ConfirmAnswer::No("n".to_string()).proceeds());
    }

    #[cfg(unix)]
    #[test]
    fn test_take_returns_trimmed_line() {
        let input = TimedInput::with_reader("sh", ["-c", "printf '  yes  \\nextra\\n'"]);
        let answer = input.take(Duration::from_secs(5)).unwrap();
        assert_eq!(answer.as_deref(), Some("yes"));
    }

    #[cfg(unix)]
    #[test]
    fn test_take_returns_empty_line() {
        let input = TimedInput::with_reader("sh", ["-c", "echo"]);
        assert_eq!(input.take(Duration::from_secs(5)).unwrap().as_deref(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_take_times_out_promptly() {
        let input = TimedInput::with_reader("sh", ["-c", "sleep 10"]);
        let started = Instant::now();
        let answer = input.take(Duration::from_millis(300)).unwrap();

        assert_eq!(answer, None);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_reader_is_no_answer() {
        let input = TimedInput::with_reader("sh", ["-c", "exit 1"]);
        assert_eq!(input.take(Duration::from_secs(5)).unwrap(), None);
    }

    #[test]
    fn test_missing_reader_is_an_error() {
        let input = TimedInput::with_reader("/definitely/not/a/reader", Vec::<String>::new());
        assert!(input.take(Duration::from_secs(1)).is_err());
    }
}
