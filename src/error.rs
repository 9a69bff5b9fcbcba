//! Application error type.
//!
//! Every fallible operation returns `Result<_, AppError>`. The exit code doubles
//! as a coarse error category so the menu loop can decide whether a failure
//! aborts the whole run or only the current choice.

/// Bad user input or configuration (paths, prompt answers, settings).
pub const EXIT_INPUT: u8 = 2;
/// Data problems: empty taxonomy, nothing to report.
pub const EXIT_DATA: u8 = 3;
/// External trends provider failures.
pub const EXIT_PROVIDER: u8 = 4;
/// Relational store failures.
pub const EXIT_STORE: u8 = 5;
/// Export or chart rendering failures.
pub const EXIT_EXPORT: u8 = 6;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(EXIT_STORE, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(EXIT_PROVIDER, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(EXIT_EXPORT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Provider failures terminate the run; everything else returns to the menu.
    pub fn is_fatal(&self) -> bool {
        self.exit_code == EXIT_PROVIDER
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::store(format!("Database error: {err}"))
    }
}
