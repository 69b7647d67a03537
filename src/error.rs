use std::{fmt, process};

/// The grammar itself is inconsistent.
///
/// Raised while declarations are built or when a [`Parser`](crate::Parser) is
/// constructed over a command, never while tokens are consumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct SetupError {
    pub(crate) msg: String,
}

/// What went wrong with the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownCommand,
    UnknownOption,
    /// An option is missing its value, or a required declaration is absent.
    MissingValue,
    /// A zero-value option was given `--name=value`.
    UnexpectedValue,
    TooManyArguments,
    /// A validator rejected a token.
    InvalidValue,
    /// An interior command was reached without selecting a subcommand.
    MissingCommand,
    /// Mutually exclusive options, or a single-use option repeated.
    Conflict,
}

/// The command line does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct ParseError {
    pub(crate) kind: ErrorKind,
    pub(crate) msg: String,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

/// A validator rejected a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct ValidationError {
    pub(crate) msg: String,
}

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> ValidationError {
        ValidationError { msg: msg.into() }
    }
}

/// Intentional early exit requested from the command line, such as `--help`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{label}")]
pub struct Message {
    pub(crate) label: String,
    pub(crate) status: i32,
}

impl Message {
    pub fn new(label: impl Into<String>, status: i32) -> Message {
        Message { label: label.into(), status }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> i32 {
        self.status
    }
}

/// Every way a full parse can stop short of binding all values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Message(#[from] Message),
}

impl Error {
    /// Exit status a program should terminate with.
    pub fn status(&self) -> i32 {
        match self {
            Error::Message(it) => it.status,
            Error::Setup(_) | Error::Parse(_) => 2,
        }
    }

    /// Returns `true` for help/version requests.
    pub fn is_message(&self) -> bool {
        matches!(self, Error::Message(_))
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Parse(it) => Some(it.kind),
            Error::Setup(_) | Error::Message(_) => None,
        }
    }

    /// Prints the error to stderr and terminates the process.
    ///
    /// Terminal messages are not printed: rendering help or version text is
    /// up to the caller, see [`Program::run_or_exit`](crate::Program::run_or_exit).
    pub fn exit(self) -> ! {
        if !self.is_message() {
            eprintln!("{self}");
        }
        process::exit(self.status())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::UnknownCommand => "unknown command",
            ErrorKind::UnknownOption => "unknown option",
            ErrorKind::MissingValue => "missing value",
            ErrorKind::UnexpectedValue => "unexpected value",
            ErrorKind::TooManyArguments => "too many arguments",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::MissingCommand => "missing command",
            ErrorKind::Conflict => "conflict",
        };
        f.write_str(text)
    }
}
