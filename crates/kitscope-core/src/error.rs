use thiserror::Error;

/// All errors that can occur in kitscope-core.
#[derive(Debug, Error)]
pub enum KitscopeError {
    #[error("Invalid record id on row {row}: {value:?} (expected a positive integer)")]
    InvalidRecordId { row: usize, value: String },

    #[error("Duplicate record id: {0}")]
    DuplicateRecordId(u64),

    #[error("Missing column in input header: {0}")]
    MissingColumn(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl KitscopeError {
    /// Process exit code the CLI should use for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidRecordId { .. } | Self::DuplicateRecordId(_) | Self::MissingColumn(_) => {
                ExitCode::InvalidInput
            }
            Self::InputNotFound(_) => ExitCode::NotFound,
            Self::ConfigError(_) | Self::TomlParse(_) | Self::TomlSerialize(_) => {
                ExitCode::InvalidArgs
            }
            Self::Io(_) | Self::Csv(_) => ExitCode::FileSystemError,
        }
    }
}

/// Exit codes used by the `kitscope` binary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    FileSystemError = 4,
    InvalidInput = 5,
}

pub type Result<T> = std::result::Result<T, KitscopeError>;
