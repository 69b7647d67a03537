use std::{collections::HashMap, iter};

use crate::{
    grammar::{slots, Slot},
    Command, Driver, Error, Reader, Result, SetupError, Source,
};

/// Outcome of one [`Parser::parse`] step: the subcommand to descend into, if
/// one was selected.
#[derive(Debug)]
pub struct ParserResult<'c> {
    pub command: Option<&'c mut Command>,
}

/// Consumes tokens on behalf of a single command level.
pub struct Parser<'c> {
    command: &'c mut Command,
    flags: FlagConsumer,
    arguments: Vec<Slot>,
    commands: CommandConsumer,
}

impl<'c> Parser<'c> {
    pub fn new(command: &'c mut Command) -> Result<Parser<'c>, SetupError> {
        command.validate_node()?;
        let flags = FlagConsumer::new(command);
        let arguments = slots(&command.argument_groups).map(|(slot, _)| slot).collect();
        let commands = CommandConsumer::new(command);
        Ok(Parser { command, flags, arguments, commands })
    }

    /// Consumes tokens until the reader is exhausted or, for an interior
    /// command, until a subcommand name is found.
    ///
    /// Options are matched before anything else; `--` ends option scanning.
    pub fn parse(self, reader: &mut Reader<'_, String>) -> Result<ParserResult<'c>> {
        let Parser { command, flags, arguments, commands } = self;
        let leaf = command.is_leaf();
        log::debug!("parsing `{}` at token {}", command.name(), reader.cursor());

        let mut positionals = Reader::new(&arguments);
        let mut after_double_dash = false;
        let mut next = None;
        while let Ok(token) = reader.get() {
            log::trace!("token {token:?}");
            if token == "--" {
                after_double_dash = true;
                break;
            }
            if let Some(name) = token.strip_prefix("--") {
                flags.consume_long(command, name, reader)?;
            } else if let Some(cluster) = token.strip_prefix('-') {
                flags.consume_short(command, cluster, reader)?;
            } else if leaf {
                consume_argument(command, &mut positionals, token)?;
            } else {
                next = Some(commands.consume(token)?);
                break;
            }
        }

        if after_double_dash {
            if leaf {
                while let Ok(token) = reader.get() {
                    consume_argument(command, &mut positionals, token)?;
                }
            } else if let Ok(token) = reader.get() {
                next = Some(commands.consume(token)?);
            }
        }

        let command = match next {
            Some(slot) => {
                let sub = command.command_mut(slot);
                log::debug!("descending into `{}`", sub.name());
                Some(sub)
            }
            None => None,
        };
        Ok(ParserResult { command })
    }
}

struct FlagConsumer {
    long: HashMap<String, Slot>,
    short: HashMap<char, Slot>,
}

impl FlagConsumer {
    fn new(command: &Command) -> FlagConsumer {
        let mut long = HashMap::new();
        let mut short = HashMap::new();
        for (slot, flag) in slots(&command.flag_groups) {
            long.extend(flag.long().iter().map(|it| (it.clone(), slot)));
            short.extend(flag.short().iter().map(|&it| (it, slot)));
        }
        FlagConsumer { long, short }
    }

    fn consume_long(
        &self,
        command: &mut Command,
        token: &str,
        reader: &mut Reader<'_, String>,
    ) -> Result<()> {
        match token.split_once('=') {
            Some((name, value)) => {
                let flag = command.flag_mut(self.long(name)?);
                if !flag.takes_value() {
                    bail!(UnexpectedValue, "Option `--{name}` does not take a value");
                }
                invoke(&mut flag.driver, &format!("--{name}"), &[value])
            }
            None => {
                let flag = command.flag_mut(self.long(token)?);
                let spelling = format!("--{token}");
                if !flag.takes_value() {
                    return invoke(&mut flag.driver, &spelling, &[]);
                }
                let value = next_value(reader, &spelling)?;
                invoke(&mut flag.driver, &spelling, &[value])
            }
        }
    }

    /// `-abc` sets three flags; `-ovalue` and `-o value` both bind `o`.
    fn consume_short(
        &self,
        command: &mut Command,
        cluster: &str,
        reader: &mut Reader<'_, String>,
    ) -> Result<()> {
        let chars = cluster.chars().collect::<Vec<_>>();
        let mut names = Reader::new(&chars);
        while let Ok(&name) = names.get() {
            let flag = command.flag_mut(self.short(name)?);
            let spelling = format!("-{name}");
            if !flag.takes_value() {
                invoke(&mut flag.driver, &spelling, &[])?;
                continue;
            }
            let value = if names.is_eof() {
                next_value(reader, &spelling)?.to_string()
            } else {
                names.rest().iter().collect::<String>()
            };
            return invoke(&mut flag.driver, &spelling, &[&value]);
        }
        Ok(())
    }

    fn long(&self, name: &str) -> Result<Slot> {
        match self.long.get(name) {
            Some(&slot) => Ok(slot),
            None => bail!(UnknownOption, "Unknown option: `--{name}`"),
        }
    }

    fn short(&self, name: char) -> Result<Slot> {
        match self.short.get(&name) {
            Some(&slot) => Ok(slot),
            None => bail!(UnknownOption, "Unknown option: `-{name}`"),
        }
    }
}

struct CommandConsumer {
    names: HashMap<String, Slot>,
}

impl CommandConsumer {
    fn new(command: &Command) -> CommandConsumer {
        let names = slots(&command.command_groups)
            .map(|(slot, sub)| (sub.name().to_string(), slot))
            .collect();
        CommandConsumer { names }
    }

    fn consume(&self, token: &str) -> Result<Slot> {
        match self.names.get(token) {
            Some(&slot) => Ok(slot),
            None => bail!(UnknownCommand, "Unknown command: `{token}`"),
        }
    }
}

fn consume_argument(
    command: &mut Command,
    positionals: &mut Reader<'_, Slot>,
    token: &str,
) -> Result<()> {
    let slot = match positionals.get() {
        Ok(&it) => it,
        Err(_) => bail!(TooManyArguments, "Too many arguments: `{token}`"),
    };
    let argument = command.argument_mut(slot);
    let (decl, multiple) = (argument.decl().to_string(), argument.is_multiple());
    invoke(&mut argument.driver, &decl, &[token])?;
    if multiple {
        positionals
            .put()
            .map_err(|_| format_err!(TooManyArguments, "Too many arguments: `{token}`"))?;
    }
    Ok(())
}

fn next_value<'a>(reader: &mut Reader<'a, String>, flag: &str) -> Result<&'a str> {
    match reader.get() {
        Ok(value) => Ok(value.as_str()),
        Err(_) => bail!(MissingValue, "Option `{flag}` requires a value"),
    }
}

fn invoke(driver: &mut Driver, spelling: &str, values: &[&str]) -> Result<()> {
    log::trace!("`{spelling}` <- {values:?}");
    driver.apply(values, Source::Cli).map_err(|err| match err {
        Error::Parse(err) => {
            Error::Parse(format_err!(InvalidValue, "Can't parse `{spelling}`, {err}"))
        }
        err => err,
    })
}

/// Parses `tokens` against the whole tree, descending into subcommands.
///
/// Returns the names of the selected subcommands, outermost first. After all
/// tokens are bound, required declarations and option group constraints are
/// checked along that path, and an interior command at the end of the path is
/// reported as a missing subcommand.
pub fn parse(command: &mut Command, tokens: &[String]) -> Result<Vec<String>> {
    command.validate()?;

    let mut reader = Reader::new(tokens);
    let mut path = Vec::new();
    let mut node = &mut *command;
    while let Some(next) = Parser::new(node)?.parse(&mut reader)?.command {
        path.push(next.name().to_string());
        node = next;
    }

    check_path(command, &path)?;
    Ok(path)
}

fn check_path(root: &Command, path: &[String]) -> Result<()> {
    let mut names = path.iter();
    let mut last = root;
    for node in iter::successors(Some(root), |node| node.subcommand(names.next()?)) {
        check_presence(node)?;
        last = node;
    }
    if !last.is_leaf() {
        bail!(MissingCommand, "A subcommand is required");
    }
    Ok(())
}

fn check_presence(command: &Command) -> Result<()> {
    for argument in command.arguments() {
        if argument.is_required() && !argument.driver().present() {
            bail!(MissingValue, "Argument is required: `{}`", argument.decl());
        }
    }

    for group in command.flag_groups() {
        for flag in group.members() {
            if flag.is_required() && !flag.driver().present() {
                bail!(MissingValue, "Option is required: `{}`", flag.display_name());
            }
            if !flag.is_multiple() && flag.driver().count() > 1 {
                bail!(Conflict, "Option specified more than once: `{}`", flag.display_name());
            }
        }

        let present = group.members().iter().filter(|it| it.driver().present()).collect::<Vec<_>>();
        if group.is_required() && present.is_empty() {
            let names = group
                .members()
                .iter()
                .map(|it| format!("`{}`", it.display_name()))
                .collect::<Vec<_>>()
                .join(", ");
            bail!(MissingValue, "One of {names} is required");
        }
        if let [first, second, ..] = present.as_slice() {
            if !group.is_multiple() {
                bail!(
                    Conflict,
                    "Option `{}` cannot be used with `{}`",
                    first.display_name(),
                    second.display_name()
                );
            }
        }
    }
    Ok(())
}
