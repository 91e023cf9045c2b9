/// Process-level error carrying an exit code.
///
/// Exit code conventions:
///
/// - `2` — I/O or schema problems (missing file, absent essential columns,
///   unreadable/invalid artifact). Also the "configuration precondition"
///   class: a missing model artifact at serving time fails here, at load,
///   before any prediction is attempted.
/// - `3` — no data: every row was removed by a filter stage.
/// - `4` — numeric failure: the regressor could not be fitted, or produced
///   a non-finite prediction.
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

    /// I/O, schema, or artifact-precondition failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// A filter stage left zero rows.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Fitting or prediction failed numerically.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
