//! Binding of raw tokens to typed destination values.
//!
//! A [`Driver`] sits behind every argument and option declaration. The parser
//! hands it the token(s) it consumed together with a [`Source`]; the driver
//! runs its validator, stores the result and counts the invocation.

use std::{any::Any, fmt};

use crate::{
    validate::{Typed, Validator},
    Error, Message, ValidationError,
};

/// Where the current value of a driver came from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    #[default]
    Default,
    Cli,
    Env,
}

/// The request carried by a message driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Help,
    Version,
}

impl MessageKind {
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Help => "help",
            MessageKind::Version => "version",
        }
    }
}

trait Value: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug> Value for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

trait Convert {
    fn convert(&self, token: &str) -> Result<Box<dyn Value>, ValidationError>;
}

impl<V> Convert for V
where
    V: Validator,
    V::Output: Any + fmt::Debug,
{
    fn convert(&self, token: &str) -> Result<Box<dyn Value>, ValidationError> {
        let value = self.validate(token)?;
        Ok(Box::new(value))
    }
}

enum Kind {
    Scalar {
        convert: Box<dyn Convert>,
        default: Option<Box<dyn Value>>,
        value: Option<Box<dyn Value>>,
    },
    List {
        convert: Box<dyn Convert>,
        defaults: Vec<Box<dyn Value>>,
        values: Vec<Box<dyn Value>>,
    },
    OnFlag(bool),
    OffFlag(bool),
    Count(u32),
    Message(MessageKind),
}

pub struct Driver {
    kind: Kind,
    count: usize,
    source: Source,
}

impl Driver {
    fn new(kind: Kind) -> Driver {
        Driver { kind, count: 0, source: Source::Default }
    }

    /// Single value, overwritten by every invocation.
    pub fn scalar<V>(validator: V) -> Driver
    where
        V: Validator + 'static,
        V::Output: Any + fmt::Debug,
    {
        Driver::new(Kind::Scalar { convert: Box::new(validator), default: None, value: None })
    }

    pub fn scalar_or<V>(validator: V, default: V::Output) -> Driver
    where
        V: Validator + 'static,
        V::Output: Any + fmt::Debug,
    {
        Driver::new(Kind::Scalar {
            convert: Box::new(validator),
            default: Some(Box::new(default)),
            value: None,
        })
    }

    /// Appends every invocation's value.
    pub fn list<V>(validator: V) -> Driver
    where
        V: Validator + 'static,
        V::Output: Any + fmt::Debug,
    {
        Driver::list_or(validator, Vec::new())
    }

    /// The defaults are replaced, not extended, by the first explicit value.
    pub fn list_or<V>(validator: V, defaults: Vec<V::Output>) -> Driver
    where
        V: Validator + 'static,
        V::Output: Any + fmt::Debug,
    {
        let defaults = defaults.into_iter().map(|it| Box::new(it) as Box<dyn Value>).collect();
        Driver::new(Kind::List { convert: Box::new(validator), defaults, values: Vec::new() })
    }

    /// Scalar driver using the default validator for `T`.
    pub fn value<T>() -> Driver
    where
        T: Typed + Any + fmt::Debug,
        T::Validator: 'static,
    {
        Driver::scalar(T::Validator::default())
    }

    /// List driver using the default validator for `T`.
    pub fn values<T>() -> Driver
    where
        T: Typed + Any + fmt::Debug,
        T::Validator: 'static,
    {
        Driver::list(T::Validator::default())
    }

    /// `false` until invoked.
    pub fn on_flag() -> Driver {
        Driver::new(Kind::OnFlag(false))
    }

    /// `true` until invoked.
    pub fn off_flag() -> Driver {
        Driver::new(Kind::OffFlag(true))
    }

    /// Counts invocations, as in `-vvv`.
    pub fn count_flag() -> Driver {
        Driver::new(Kind::Count(0))
    }

    pub fn help() -> Driver {
        Driver::new(Kind::Message(MessageKind::Help))
    }

    pub fn version() -> Driver {
        Driver::new(Kind::Message(MessageKind::Version))
    }

    /// How many tokens one invocation consumes: 1 for value drivers, 0 otherwise.
    pub fn num_values(&self) -> usize {
        match self.kind {
            Kind::Scalar { .. } | Kind::List { .. } => 1,
            Kind::OnFlag(_) | Kind::OffFlag(_) | Kind::Count(_) | Kind::Message(_) => 0,
        }
    }

    /// Binds `values` coming from `source`.
    ///
    /// Value drivers expect exactly one token, the others ignore them. Message
    /// drivers always fail with [`Error::Message`].
    pub fn apply(&mut self, values: &[&str], source: Source) -> Result<(), Error> {
        log::trace!("applying {values:?} from {source:?}");
        match &mut self.kind {
            Kind::Scalar { convert, value, .. } => {
                *value = Some(convert_one(&**convert, values)?);
            }
            Kind::List { convert, values: stored, .. } => {
                let value = convert_one(&**convert, values)?;
                if self.count == 0 {
                    stored.clear();
                }
                stored.push(value);
            }
            Kind::OnFlag(it) => *it = true,
            Kind::OffFlag(it) => *it = false,
            Kind::Count(it) => *it += 1,
            Kind::Message(kind) => {
                let kind = *kind;
                self.count += 1;
                self.source = source;
                return Err(Message::new(kind.label(), 0).into());
            }
        }
        self.count += 1;
        self.source = source;
        Ok(())
    }

    /// Number of successful invocations.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn present(&self) -> bool {
        self.count > 0
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// The current value if it is a `T`.
    ///
    /// Scalars yield their value or default, on/off flags yield `bool` and
    /// count flags yield `u32`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        match &self.kind {
            Kind::Scalar { default, value, .. } => {
                value.as_ref().or(default.as_ref()).and_then(|it| (**it).as_any().downcast_ref())
            }
            Kind::OnFlag(it) | Kind::OffFlag(it) => (it as &dyn Any).downcast_ref(),
            Kind::Count(it) => (it as &dyn Any).downcast_ref(),
            Kind::List { .. } | Kind::Message(_) => None,
        }
    }

    /// The values of a list driver, or its defaults if it was never invoked.
    pub fn get_many<T: Any>(&self) -> impl Iterator<Item = &T> + '_ {
        self.list_values().iter().filter_map(|it| (**it).as_any().downcast_ref::<T>())
    }

    fn list_values(&self) -> &[Box<dyn Value>] {
        match &self.kind {
            Kind::List { defaults, .. } if self.count == 0 => defaults,
            Kind::List { values, .. } => values,
            _ => &[],
        }
    }

    /// Forgets every invocation, restoring the default state.
    pub fn reset(&mut self) {
        match &mut self.kind {
            Kind::Scalar { value, .. } => *value = None,
            Kind::List { values, .. } => values.clear(),
            Kind::OnFlag(it) => *it = false,
            Kind::OffFlag(it) => *it = true,
            Kind::Count(it) => *it = 0,
            Kind::Message(_) => (),
        }
        self.count = 0;
        self.source = Source::Default;
    }
}

fn convert_one(convert: &dyn Convert, values: &[&str]) -> Result<Box<dyn Value>, Error> {
    match values {
        [token] => convert.convert(token).map_err(|err| format_err!(InvalidValue, "{err}").into()),
        _ => Err(format_err!(MissingValue, "expected one value, got {}", values.len()).into()),
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Scalar { default, value, .. } => match value.as_ref().or(default.as_ref()) {
                Some(it) => write!(f, "{it:?}"),
                None => f.write_str("None"),
            },
            Kind::List { .. } => f.debug_list().entries(self.list_values()).finish(),
            Kind::OnFlag(it) | Kind::OffFlag(it) => write!(f, "{it}"),
            Kind::Count(it) => write!(f, "{it}"),
            Kind::Message(kind) => write!(f, "<{}>", kind.label()),
        }
    }
}
