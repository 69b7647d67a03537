//! A command tree grammar engine.
//!
//! A program describes its command line as a tree of [`Command`]s. Each command
//! carries positional [`Argument`]s or subcommands, plus named [`Flag`]s.
//! Every declaration owns a [`Driver`] which validates the tokens bound to it
//! and stores the typed result:
//!
//! ```
//! use argtree::{Argument, Command, Driver, Flag};
//!
//! let mut cmd = Command::new("hello");
//! cmd.add_argument(Argument::new("name", "NAME", Driver::value::<String>())?)
//!     .add_flag(Flag::new("loud", &["--loud", "-l"], Driver::on_flag())?);
//!
//! let args = ["-l", "world"].map(String::from);
//! argtree::parse(&mut cmd, &args)?;
//! assert_eq!(cmd.get::<String>("name").map(String::as_str), Some("world"));
//! assert_eq!(cmd.get::<bool>("loud"), Some(&true));
//! # Ok::<(), argtree::Error>(())
//! ```

macro_rules! format_err {
    ($kind:ident, $($tt:tt)*) => {
        $crate::ParseError { kind: $crate::ErrorKind::$kind, msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($kind:ident, $($tt:tt)*) => {
        return Err(format_err!($kind, $($tt)*).into())
    };
}

macro_rules! setup_err {
    ($($tt:tt)*) => {
        $crate::SetupError { msg: format!($($tt)*) }
    };
}

mod error;
mod reader;
mod validate;
mod datetime;
mod path;
mod driver;
mod grammar;
mod parser;
mod program;

pub use crate::{
    datetime::{DateTimeValidator, DateTimeValue},
    driver::{Driver, MessageKind, Source},
    error::{Error, ErrorKind, Message, ParseError, SetupError, ValidationError},
    grammar::{Argument, Command, Flag, Group},
    parser::{parse, Parser, ParserResult},
    path::PathValidator,
    program::Program,
    reader::{OutOfRange, Reader},
    validate::{
        BoolValidator, ChoiceValidator, FloatValidator, FromStrValidator, IntValidator,
        RangeValidator, StrChoiceValidator, StrValidator, Typed, Validator,
    },
};

pub type Result<T, E = Error> = std::result::Result<T, E>;
