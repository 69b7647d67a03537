use std::{env, ffi::OsString, process};

use crate::{Command, Error, Message, MessageKind, Result};

/// Binds a command tree to the process: program name, version line and
/// exit behavior.
#[derive(Debug)]
pub struct Program {
    command: Command,
    version: Option<String>,
    help: Option<String>,
    exit_code_for_invalid_cli: i32,
}

impl Program {
    pub fn new(command: Command) -> Program {
        Program { command, version: None, help: None, exit_code_for_invalid_cli: 2 }
    }

    pub fn version(mut self, version: &str) -> Program {
        self.version = Some(version.to_string());
        self
    }

    /// Text printed for `--help`. Rendering it is up to the caller.
    pub fn help(mut self, text: &str) -> Program {
        self.help = Some(text.to_string());
        self
    }

    pub fn exit_code_for_invalid_cli(mut self, code: i32) -> Program {
        self.exit_code_for_invalid_cli = code;
        self
    }

    pub fn name(&self) -> &str {
        self.command.name()
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// Parses a full argument vector, program name included.
    ///
    /// Drivers are reset first, so a program can be run more than once.
    pub fn run(&mut self, argv: &[String]) -> Result<Vec<String>> {
        let Some((program, args)) = argv.split_first() else {
            return Err(setup_err!("Invalid argv: At least one element is required.").into());
        };
        log::debug!("running `{}` as {program:?}", self.name());
        self.command.reset();
        crate::parse(&mut self.command, args)
    }

    pub fn run_env(&mut self) -> Result<Vec<String>> {
        let argv = args_from(env::args_os())?;
        self.run(&argv)
    }

    /// Like [`Program::run_env`], but handles errors by terminating the process.
    ///
    /// Help and version requests print to stdout and exit with their status,
    /// every other error goes to stderr.
    pub fn run_or_exit(&mut self) -> Vec<String> {
        let err = match self.run_env() {
            Ok(path) => return path,
            Err(err) => err,
        };
        match err {
            Error::Message(msg) => {
                println!("{}", self.message_text(&msg));
                process::exit(msg.status())
            }
            err => {
                eprintln!("{err}");
                process::exit(self.exit_code_for_invalid_cli)
            }
        }
    }

    /// The version line, or the help text falling back to the program name.
    fn message_text(&self, msg: &Message) -> String {
        let name = self.name();
        if msg.label() == MessageKind::Version.label() {
            return match &self.version {
                Some(version) => format!("{name} {version}"),
                None => name.to_string(),
            };
        }
        self.help.clone().unwrap_or_else(|| name.to_string())
    }
}

fn args_from(args: impl IntoIterator<Item = OsString>) -> Result<Vec<String>> {
    let mut res = Vec::new();
    for arg in args {
        match arg.into_string() {
            Ok(it) => res.push(it),
            Err(_) => bail!(InvalidValue, "invalid utf8"),
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Driver, ErrorKind, Flag};

    fn hello() -> Program {
        let mut cmd = Command::new("hello");
        cmd.add_flag(Flag::new("count", &["-c"], Driver::count_flag()).unwrap())
            .add_flag(Flag::new("version", &["--version", "-V"], Driver::version()).unwrap());
        Program::new(cmd).version("1.0")
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|it| it.to_string()).collect()
    }

    #[test]
    fn runs_are_independent() {
        let mut program = hello();
        program.run(&argv(&["hello", "-cc"])).unwrap();
        assert_eq!(program.command().get::<u32>("count"), Some(&2));

        program.run(&argv(&["hello"])).unwrap();
        assert_eq!(program.command().get::<u32>("count"), Some(&0));
    }

    #[test]
    fn empty_argv() {
        let err = hello().run(&[]).unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(err.to_string(), "Invalid argv: At least one element is required.");
    }

    #[test]
    fn version_is_a_message() {
        let err = hello().run(&argv(&["hello", "-V"])).unwrap_err();
        assert!(err.is_message());
        assert_eq!(err.status(), 0);
        assert_eq!(err.to_string(), "version");
    }

    #[test]
    fn message_texts() {
        let version = Message::new("version", 0);
        let help = Message::new("help", 0);

        let program = hello();
        assert_eq!(program.message_text(&version), "hello 1.0");
        assert_eq!(program.message_text(&help), "hello");

        let program = Program::new(Command::new("bare")).help("Usage: bare");
        assert_eq!(program.message_text(&version), "bare");
        assert_eq!(program.message_text(&help), "Usage: bare");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from("hello"), OsString::from_vec(vec![0xff, 0xfe])];
        let err = args_from(args).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidValue));
        assert_eq!(err.to_string(), "invalid utf8");
    }
}
