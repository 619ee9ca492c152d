//! Terminal presentation helpers.

use anyhow::Result;
use inquire::InquireError;
use std::process::{Command, Stdio};

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, turning Ctrl+C or Escape into `T::default()`.
///
/// A newline is printed on cancellation to leave the terminal tidy.
pub fn handle_prompt_cancellation<T, F>(f: F) -> Result<T>
where
    T: Default,
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(value),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Asks the desktop to open `url` in a browser. Failures are only logged.
pub fn open_url(url: &str) {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/c", "start", "", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    let spawned = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = spawned {
        tracing::debug!(%err, url, "could not launch browser");
    }
}
