//! Conversion of raw tokens into typed values.
//!
//! A [`Validator`] is a pure function from a token to a value. Composite
//! validators ([`ChoiceValidator`], [`RangeValidator`]) wrap an inner one and
//! restrict its output.

use std::{fmt, marker::PhantomData, path::PathBuf, str::FromStr};

use crate::{DateTimeValidator, DateTimeValue, PathValidator, SetupError, ValidationError};

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

pub trait Validator {
    type Output;

    fn validate(&self, token: &str) -> Result<Self::Output>;
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    type Output = V::Output;

    fn validate(&self, token: &str) -> Result<Self::Output> {
        (**self).validate(token)
    }
}

/// Types with a validator used when none is given explicitly.
pub trait Typed: Sized {
    type Validator: Validator<Output = Self> + Default;
}

impl Typed for String {
    type Validator = StrValidator;
}

impl Typed for bool {
    type Validator = BoolValidator;
}

impl Typed for i64 {
    type Validator = IntValidator;
}

impl Typed for f64 {
    type Validator = FloatValidator;
}

impl Typed for PathBuf {
    type Validator = PathValidator;
}

impl Typed for DateTimeValue {
    type Validator = DateTimeValidator;
}

/// Accepts any token as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrValidator;

impl Validator for StrValidator {
    type Output = String;

    fn validate(&self, token: &str) -> Result<String> {
        Ok(token.to_string())
    }
}

/// Case-insensitive `t/true/y/yes/on/1` and `f/false/n/no/off/0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolValidator;

impl Validator for BoolValidator {
    type Output = bool;

    fn validate(&self, token: &str) -> Result<bool> {
        match token.to_lowercase().as_str() {
            "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
            "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
            _ => Err(ValidationError::new(format!("'{token}' is not a valid boolean."))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntValidator;

impl Validator for IntValidator {
    type Output = i64;

    fn validate(&self, token: &str) -> Result<i64> {
        token
            .trim()
            .parse()
            .map_err(|_| ValidationError::new(format!("'{token}' is not a valid integer.")))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FloatValidator;

impl Validator for FloatValidator {
    type Output = f64;

    fn validate(&self, token: &str) -> Result<f64> {
        token.trim().parse().map_err(|_| {
            ValidationError::new(format!("'{token}' is not a valid floating point number."))
        })
    }
}

/// Converts through [`FromStr`], reporting the type's own parse error.
pub struct FromStrValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrValidator<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for FromStrValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromStrValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromStrValidator")
    }
}

impl<T: FromStr> Validator for FromStrValidator<T>
where
    T::Err: fmt::Display,
{
    type Output = T;

    fn validate(&self, token: &str) -> Result<T> {
        token.parse::<T>().map_err(|err| ValidationError::new(format!("'{token}': {err}")))
    }
}

/// Restricts the output of `V` to a fixed set.
#[derive(Debug, Clone)]
pub struct ChoiceValidator<V: Validator> {
    inner: V,
    choices: Vec<V::Output>,
}

impl<V> ChoiceValidator<V>
where
    V: Validator,
    V::Output: PartialEq + fmt::Debug,
{
    pub fn new(
        inner: V,
        choices: impl IntoIterator<Item = V::Output>,
    ) -> Result<Self, SetupError> {
        let choices = choices.into_iter().collect::<Vec<_>>();
        if choices.is_empty() {
            return Err(setup_err!("Invalid choices: At least one choice is required."));
        }
        Ok(Self { inner, choices })
    }

    pub fn choices(&self) -> &[V::Output] {
        &self.choices
    }
}

impl ChoiceValidator<IntValidator> {
    pub fn int(choices: impl IntoIterator<Item = i64>) -> Result<Self, SetupError> {
        Self::new(IntValidator, choices)
    }
}

impl ChoiceValidator<FloatValidator> {
    pub fn float(choices: impl IntoIterator<Item = f64>) -> Result<Self, SetupError> {
        Self::new(FloatValidator, choices)
    }
}

impl<V> Validator for ChoiceValidator<V>
where
    V: Validator,
    V::Output: PartialEq + fmt::Debug,
{
    type Output = V::Output;

    fn validate(&self, token: &str) -> Result<V::Output> {
        let value = self.inner.validate(token)?;
        if !self.choices.contains(&value) {
            let choices = self.choices.iter().map(|it| format!("{it:?}")).collect::<Vec<_>>();
            return Err(not_a_choice(token, &choices));
        }
        Ok(value)
    }
}

/// String choices, optionally matched without regard to case.
///
/// With `norm_case`, a case-insensitive match returns the declared spelling
/// of the choice rather than the token: `"ios"` against `["Android", "iOS"]`
/// yields `"iOS"`.
#[derive(Debug, Clone)]
pub struct StrChoiceValidator {
    choices: Vec<String>,
    ignore_case: bool,
    norm_case: bool,
}

impl StrChoiceValidator {
    pub fn new<I>(choices: I) -> Result<Self, SetupError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let choices = choices.into_iter().map(Into::into).collect::<Vec<String>>();
        if choices.is_empty() {
            return Err(setup_err!("Invalid choices: At least one choice is required."));
        }
        Ok(Self { choices, ignore_case: false, norm_case: false })
    }

    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    /// Has no effect unless `ignore_case` is set.
    pub fn norm_case(mut self, yes: bool) -> Self {
        self.norm_case = yes;
        self
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl Validator for StrChoiceValidator {
    type Output = String;

    fn validate(&self, token: &str) -> Result<String> {
        let found = if self.ignore_case {
            let lower = token.to_lowercase();
            self.choices.iter().find(|it| it.to_lowercase() == lower)
        } else {
            self.choices.iter().find(|it| *it == token)
        };
        match found {
            Some(choice) if self.ignore_case && self.norm_case => Ok(choice.clone()),
            Some(_) => Ok(token.to_string()),
            None => {
                let choices = self.choices.iter().map(|it| format!("'{it}'")).collect::<Vec<_>>();
                Err(not_a_choice(token, &choices))
            }
        }
    }
}

fn not_a_choice(token: &str, choices: &[String]) -> ValidationError {
    let joined = choices.join(", ");
    if choices.len() < 2 {
        ValidationError::new(format!("'{token}' is not {joined}."))
    } else {
        ValidationError::new(format!("'{token}' is not one of {joined}."))
    }
}

/// Restricts the output of `V` to an inclusive range; either bound may be open.
#[derive(Debug, Clone)]
pub struct RangeValidator<V: Validator> {
    inner: V,
    min: Option<V::Output>,
    max: Option<V::Output>,
}

impl<V> RangeValidator<V>
where
    V: Validator,
    V::Output: PartialOrd + fmt::Debug,
{
    pub fn new(
        inner: V,
        min: Option<V::Output>,
        max: Option<V::Output>,
    ) -> Result<Self, SetupError> {
        if let (Some(min), Some(max)) = (&min, &max) {
            if min > max {
                return Err(setup_err!("Invalid range: min must be less than or equal to max."));
            }
        }
        Ok(Self { inner, min, max })
    }
}

impl RangeValidator<IntValidator> {
    pub fn int(min: Option<i64>, max: Option<i64>) -> Result<Self, SetupError> {
        Self::new(IntValidator, min, max)
    }
}

impl RangeValidator<FloatValidator> {
    pub fn float(min: Option<f64>, max: Option<f64>) -> Result<Self, SetupError> {
        Self::new(FloatValidator, min, max)
    }
}

impl<V> Validator for RangeValidator<V>
where
    V: Validator,
    V::Output: PartialOrd + fmt::Debug,
{
    type Output = V::Output;

    fn validate(&self, token: &str) -> Result<V::Output> {
        let value = self.inner.validate(token)?;
        if let Some(min) = &self.min {
            if value < *min {
                return Err(ValidationError::new(format!(
                    "'{token}' must be greater than or equal to {min:?}."
                )));
            }
        }
        if let Some(max) = &self.max {
            if value > *max {
                return Err(ValidationError::new(format!(
                    "'{token}' must be less than or equal to {max:?}."
                )));
            }
        }
        Ok(value)
    }
}
