use console::{Term, style};
use std::{env, fmt::Display};

/// Operator-visible channel for the report core:
/// - all output goes to stderr (stdout belongs to the hosting tool)
/// - fancy styling only on a real TTY and when NO_COLOR/CI are not set
///
/// Every recoverable problem during a run is reported here and nowhere
/// else: write failures, render failures, report/source skew.
#[derive(Debug, Clone)]
pub struct Ui {
    err: Term,
    fancy: bool,
    enabled: bool,

    // Observability hooks (used by unit tests and to make behavior measurable).
    // These do not affect output formatting.
    warnings: u64,
    errors: u64,
}

impl Ui {
    pub fn new() -> Self {
        let err = Term::stderr();

        let no_color = env::var_os("NO_COLOR").is_some();
        let in_ci = env::var_os("CI").is_some();

        let fancy = err.is_term() && !no_color && !in_ci;

        Self {
            err,
            fancy,
            enabled: true,
            warnings: 0,
            errors: 0,
        }
    }

    /// Channel that counts messages but prints nothing.
    ///
    /// For tests and embedders that surface problems through their own
    /// reporting instead of stderr.
    pub fn silent() -> Self {
        Self {
            err: Term::stderr(),
            fancy: false,
            enabled: false,
            warnings: 0,
            errors: 0,
        }
    }

    fn write_err(&self, s: &str) {
        if self.enabled {
            let _ = self.err.write_line(s);
        }
    }

    pub fn warn(&mut self, msg: impl Display) {
        self.warnings += 1;
        let s = msg.to_string();
        if self.fancy {
            self.write_err(&style(s).yellow().to_string());
        } else {
            self.write_err(&s);
        }
    }

    pub fn error(&mut self, msg: impl Display) {
        self.errors += 1;
        let s = msg.to_string();
        if self.fancy {
            self.write_err(&style(s).red().bold().to_string());
        } else {
            self.write_err(&s);
        }
    }

    /// Number of warnings reported so far.
    pub fn warnings(&self) -> u64 {
        self.warnings
    }

    /// Number of errors reported so far.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn is_fancy(&self) -> bool {
        self.fancy && self.enabled
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}
