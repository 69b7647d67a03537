//! The declarative command tree.
//!
//! Declarations validate themselves when constructed; a [`Command`] is
//! checked as a whole by [`Command::validate`] (run by [`parse`](crate::parse)).
//! [`Parser::new`](crate::Parser::new) checks only the command it is given.

use std::{any::Any, collections::HashSet};

use crate::{Driver, SetupError};

type Result<T, E = SetupError> = std::result::Result<T, E>;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

fn check_dest(dest: &str) -> Result<()> {
    let mut chars = dest.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if !valid {
        return Err(setup_err!("Invalid dest: '{dest}' is not a valid identifier."));
    }
    if KEYWORDS.contains(&dest) {
        return Err(setup_err!("Invalid dest: '{dest}' is a keyword."));
    }
    Ok(())
}

/// A positional declaration.
#[derive(Debug)]
pub struct Argument {
    id: String,
    decl: String,
    dest: String,
    multiple: bool,
    required: bool,
    pub(crate) driver: Driver,
}

impl Argument {
    /// `decl` is the form shown in diagnostics, e.g. `FILE`.
    pub fn new(id: &str, decl: &str, driver: Driver) -> Result<Argument> {
        if decl.is_empty() {
            return Err(setup_err!("Invalid decl: Empty string is not allowed."));
        }
        check_dest(id)?;
        if driver.num_values() != 1 {
            return Err(setup_err!("Invalid nvals: Argument '{id}' must take exactly one value."));
        }
        Ok(Argument {
            id: id.to_string(),
            decl: decl.to_string(),
            dest: id.to_string(),
            multiple: false,
            required: true,
            driver,
        })
    }

    pub fn dest(mut self, dest: &str) -> Result<Argument> {
        check_dest(dest)?;
        self.dest = dest.to_string();
        Ok(self)
    }

    /// Repeatable: accepts every following bare token.
    pub fn multiple(mut self, yes: bool) -> Argument {
        self.multiple = yes;
        self
    }

    pub fn required(mut self, yes: bool) -> Argument {
        self.required = yes;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn decl(&self) -> &str {
        &self.decl
    }

    pub fn dest_name(&self) -> &str {
        &self.dest
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }
}

/// A named declaration, spelled `--long` and/or `-s`.
#[derive(Debug)]
pub struct Flag {
    id: String,
    long: Vec<String>,
    short: Vec<char>,
    dest: String,
    multiple: bool,
    required: bool,
    pub(crate) driver: Driver,
}

impl Flag {
    pub fn new(id: &str, decls: &[&str], driver: Driver) -> Result<Flag> {
        if decls.is_empty() {
            return Err(setup_err!("Invalid decls: At least one decl is required."));
        }
        let mut long = Vec::new();
        let mut short = Vec::new();
        for &decl in decls {
            if let Some(text) = decl.strip_prefix("--") {
                if text.is_empty() {
                    return Err(setup_err!(
                        "Invalid decls: Empty string following prefix is not allowed."
                    ));
                }
                if text.chars().count() < 2 {
                    return Err(setup_err!("Invalid decls: Long option '{decl}' is too short."));
                }
                long.push(text.to_string());
            } else if let Some(text) = decl.strip_prefix('-') {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => {
                        return Err(setup_err!(
                            "Invalid decls: Empty string following prefix is not allowed."
                        ))
                    }
                    (Some(c), None) => short.push(c),
                    (Some(_), Some(_)) => {
                        return Err(setup_err!("Invalid decls: Short option '{decl}' is too long."))
                    }
                }
            } else if decl.is_empty() {
                return Err(setup_err!("Invalid decls: Empty string is not allowed."));
            } else {
                return Err(setup_err!("Invalid decls: '{decl}' does not start with prefix."));
            }
        }
        check_dest(id)?;
        Ok(Flag {
            id: id.to_string(),
            long,
            short,
            dest: id.to_string(),
            multiple: true,
            required: false,
            driver,
        })
    }

    pub fn dest(mut self, dest: &str) -> Result<Flag> {
        check_dest(dest)?;
        self.dest = dest.to_string();
        Ok(self)
    }

    /// Whether the option may be given more than once. Defaults to `true`.
    pub fn multiple(mut self, yes: bool) -> Flag {
        self.multiple = yes;
        self
    }

    pub fn required(mut self, yes: bool) -> Flag {
        self.required = yes;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn long(&self) -> &[String] {
        &self.long
    }

    pub fn short(&self) -> &[char] {
        &self.short
    }

    pub fn dest_name(&self) -> &str {
        &self.dest
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn takes_value(&self) -> bool {
        self.driver.num_values() > 0
    }

    /// The preferred spelling: the first long one, else the first short one.
    pub fn display_name(&self) -> String {
        match (self.long.first(), self.short.first()) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.id.clone(),
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }
}

/// Titled, ordered members of a command.
///
/// `multiple` and `required` only constrain option groups: a group that is not
/// `multiple` accepts at most one present member, a `required` one at least one.
#[derive(Debug)]
pub struct Group<T> {
    id: String,
    title: String,
    multiple: bool,
    required: bool,
    pub(crate) members: Vec<T>,
}

impl<T> Group<T> {
    pub fn new(id: &str, title: &str) -> Group<T> {
        Group {
            id: id.to_string(),
            title: title.to_string(),
            multiple: true,
            required: false,
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, member: T) -> &mut Self {
        self.members.push(member);
        self
    }

    pub fn multiple(&mut self, yes: bool) -> &mut Self {
        self.multiple = yes;
        self
    }

    pub fn required(&mut self, yes: bool) -> &mut Self {
        self.required = yes;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Position of a member: `(group, index in group)`.
pub(crate) type Slot = (usize, usize);

/// A node of the grammar: a leaf with positional arguments, or an interior
/// node with subcommands. Options are allowed on both.
#[derive(Debug)]
pub struct Command {
    name: String,
    pub(crate) argument_groups: Vec<Group<Argument>>,
    pub(crate) flag_groups: Vec<Group<Flag>>,
    pub(crate) command_groups: Vec<Group<Command>>,
}

impl Command {
    pub fn new(name: &str) -> Command {
        Command {
            name: name.to_string(),
            argument_groups: Vec::new(),
            flag_groups: Vec::new(),
            command_groups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds to the default `arguments` group.
    pub fn add_argument(&mut self, argument: Argument) -> &mut Self {
        default_group(&mut self.argument_groups, "arguments", "Arguments").add(argument);
        self
    }

    /// Adds to the default `options` group.
    pub fn add_flag(&mut self, flag: Flag) -> &mut Self {
        default_group(&mut self.flag_groups, "options", "Options").add(flag);
        self
    }

    /// Adds to the default `commands` group.
    pub fn add_command(&mut self, command: Command) -> &mut Self {
        default_group(&mut self.command_groups, "commands", "Commands").add(command);
        self
    }

    pub fn add_argument_group(&mut self, id: &str, title: &str) -> &mut Group<Argument> {
        push_group(&mut self.argument_groups, id, title)
    }

    pub fn add_flag_group(&mut self, id: &str, title: &str) -> &mut Group<Flag> {
        push_group(&mut self.flag_groups, id, title)
    }

    pub fn add_command_group(&mut self, id: &str, title: &str) -> &mut Group<Command> {
        push_group(&mut self.command_groups, id, title)
    }

    pub fn argument_groups(&self) -> &[Group<Argument>] {
        &self.argument_groups
    }

    pub fn flag_groups(&self) -> &[Group<Flag>] {
        &self.flag_groups
    }

    pub fn command_groups(&self) -> &[Group<Command>] {
        &self.command_groups
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Argument> + '_ {
        self.argument_groups.iter().flat_map(|it| &it.members)
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> + '_ {
        self.flag_groups.iter().flat_map(|it| &it.members)
    }

    pub fn subcommands(&self) -> impl Iterator<Item = &Command> + '_ {
        self.command_groups.iter().flat_map(|it| &it.members)
    }

    /// A leaf has no subcommands.
    pub fn is_leaf(&self) -> bool {
        self.subcommands().next().is_none()
    }

    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands().find(|it| it.name == name)
    }

    /// Follows `path` of subcommand names down from this command.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter().try_fold(self, |cmd, name| cmd.subcommand(name.as_ref()))
    }

    /// Every `(dest, driver)` of this command, arguments first.
    pub fn drivers(&self) -> impl Iterator<Item = (&str, &Driver)> + '_ {
        let args = self.arguments().map(|it| (it.dest_name(), &it.driver));
        let flags = self.flags().map(|it| (it.dest_name(), &it.driver));
        args.chain(flags)
    }

    pub fn driver(&self, dest: &str) -> Option<&Driver> {
        self.drivers().find(|(it, _)| *it == dest).map(|(_, driver)| driver)
    }

    pub fn driver_mut(&mut self, dest: &str) -> Option<&mut Driver> {
        let mut args = self.argument_groups.iter_mut().flat_map(|it| &mut it.members);
        if let Some(it) = args.find(|it| it.dest == dest) {
            return Some(&mut it.driver);
        }
        let mut flags = self.flag_groups.iter_mut().flat_map(|it| &mut it.members);
        flags.find(|it| it.dest == dest).map(|it| &mut it.driver)
    }

    /// Shorthand for `driver(dest)?.get()`.
    pub fn get<T: Any>(&self, dest: &str) -> Option<&T> {
        self.driver(dest)?.get()
    }

    pub fn get_many<T: Any>(&self, dest: &str) -> Vec<&T> {
        match self.driver(dest) {
            Some(driver) => driver.get_many().collect(),
            None => Vec::new(),
        }
    }

    pub fn is_present(&self, dest: &str) -> bool {
        self.driver(dest).map_or(false, Driver::present)
    }

    /// Resets every driver in this command and all subcommands.
    pub fn reset(&mut self) {
        for group in &mut self.argument_groups {
            group.members.iter_mut().for_each(|it| it.driver.reset());
        }
        for group in &mut self.flag_groups {
            group.members.iter_mut().for_each(|it| it.driver.reset());
        }
        for group in &mut self.command_groups {
            group.members.iter_mut().for_each(Command::reset);
        }
    }

    /// Checks the whole tree for inconsistencies.
    pub fn validate(&self) -> Result<()> {
        self.validate_node()?;
        self.subcommands().try_for_each(Command::validate)
    }

    /// Checks this node only: no mixing of positionals and subcommands, unique
    /// option spellings, dests and subcommand names.
    pub(crate) fn validate_node(&self) -> Result<()> {
        if !self.is_leaf() && self.arguments().next().is_some() {
            return Err(setup_err!(
                "Command '{}' can not have both subcommands and arguments.",
                self.name
            ));
        }

        let mut dests = HashSet::new();
        for (dest, _) in self.drivers() {
            if !dests.insert(dest) {
                return Err(setup_err!("Dest '{dest}' conflict detected in '{}'.", self.name));
            }
        }

        let mut long = HashSet::new();
        let mut short = HashSet::new();
        for flag in self.flags() {
            for name in &flag.long {
                if !long.insert(name.as_str()) {
                    return Err(setup_err!("Long option '--{name}' conflict detected."));
                }
            }
            for name in &flag.short {
                if !short.insert(*name) {
                    return Err(setup_err!("Short option '-{name}' conflict detected."));
                }
            }
        }

        let mut names = HashSet::new();
        for sub in self.subcommands() {
            if sub.name.is_empty() || sub.name.starts_with('-') {
                return Err(setup_err!("Invalid command name: '{}'.", sub.name));
            }
            if !names.insert(sub.name.as_str()) {
                return Err(setup_err!("Command '{}' conflict detected.", sub.name));
            }
        }
        Ok(())
    }

    pub(crate) fn argument_mut(&mut self, (group, idx): Slot) -> &mut Argument {
        &mut self.argument_groups[group].members[idx]
    }

    pub(crate) fn flag_mut(&mut self, (group, idx): Slot) -> &mut Flag {
        &mut self.flag_groups[group].members[idx]
    }

    pub(crate) fn command_mut(&mut self, (group, idx): Slot) -> &mut Command {
        &mut self.command_groups[group].members[idx]
    }
}

fn default_group<'a, T>(groups: &'a mut Vec<Group<T>>, id: &str, title: &str) -> &'a mut Group<T> {
    match groups.iter().position(|it| it.id == id) {
        Some(idx) => &mut groups[idx],
        None => push_group(groups, id, title),
    }
}

fn push_group<'a, T>(groups: &'a mut Vec<Group<T>>, id: &str, title: &str) -> &'a mut Group<T> {
    groups.push(Group::new(id, title));
    let last = groups.len() - 1;
    &mut groups[last]
}

pub(crate) fn slots<T>(groups: &[Group<T>]) -> impl Iterator<Item = (Slot, &T)> + '_ {
    groups.iter().enumerate().flat_map(|(group, it)| {
        it.members.iter().enumerate().map(move |(idx, member)| ((group, idx), member))
    })
}
