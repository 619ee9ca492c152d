//! Process-wide output settings.
//!
//! Model replies and JSON reports go to stdout so they can be piped.
//! Status lines, spinners and warnings go to stderr. `--quiet` silences
//! status lines; warnings and errors are always printed.

use std::io::{self, Write};
use std::sync::OnceLock;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            // https://no-color.org/
            no_color: std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
        }
    }
}

impl OutputConfig {
    pub fn quiet(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }
}

/// Sets the global configuration. Only the first call has an effect.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Prints to stderr unless quiet mode is on.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints to stderr, even in quiet mode.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

/// Writes a reply fragment to stdout and flushes, so partial lines show up
/// while a stream is still arriving.
pub fn write_fragment(fragment: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(fragment.as_bytes())?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_constructor() {
        assert!(OutputConfig::quiet(true).quiet);
        assert!(!OutputConfig::quiet(false).quiet);
    }

    #[test]
    fn test_default_is_not_quiet() {
        assert!(!OutputConfig::default().quiet);
    }
}
