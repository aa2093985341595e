//! Positional optional arguments and the all-or-nothing default rule.
//!
//! Many robokit operations accept a short list of optional values after their
//! required parameters, e.g. `click_args(&opt_args!["right", true])`.
//! The list is a closed set of typed values ([`ArgValue`]); an operation
//! declares what it expects at each position by implementing [`FromArgs`] on
//! an options struct.
//!
//! # The recovery boundary
//!
//! Extraction is attempted for every slot in one go.  If *any* slot is missing
//! or carries the wrong kind of value, the whole attempt is thrown away and
//! the options struct's `Default` is used instead.  There is no per-slot
//! fallback: `click_args(&opt_args!["right"])` is a single *left* click because
//! the `double` slot is missing.
//!
//! ```
//! use robokit_core::args::{ArgValue, FromArgs, OptionalArgs};
//! use robokit_core::domain::mouse::ClickOptions;
//!
//! let args = OptionalArgs::from(vec![ArgValue::from("right"), ArgValue::from(true)]);
//! let opts = ClickOptions::from_args(&args);
//! assert!(opts.double);
//! ```

use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Why an extraction attempt was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgShapeError {
    /// A required slot has no value at this position.
    #[error("no optional argument at index {index}")]
    Missing { index: usize },

    /// The value at this position is of another kind.
    #[error("optional argument {index}: expected {expected}, found {found}")]
    WrongType {
        index: usize,
        expected: ArgKind,
        found: ArgKind,
    },

    /// A numeric slot holds a value outside its allowed range.
    #[error("optional argument {index} is out of range")]
    OutOfRange { index: usize },
}

/// The kind of an [`ArgValue`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    Int,
    Float,
    Bool,
    Keys,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Str => "string",
            ArgKind::Int => "integer",
            ArgKind::Float => "float",
            ArgKind::Bool => "bool",
            ArgKind::Keys => "key sequence",
        };
        f.write_str(name)
    }
}

/// One loosely-typed optional value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// An ordered sequence of key names (chord modifiers).
    Keys(Vec<String>),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Str(_) => ArgKind::Str,
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Float(_) => ArgKind::Float,
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::Keys(_) => ArgKind::Keys,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        ArgValue::Keys(value)
    }
}

impl From<&[&str]> for ArgValue {
    fn from(value: &[&str]) -> Self {
        ArgValue::Keys(value.iter().map(|k| (*k).to_string()).collect())
    }
}

/// The ordered optional values of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionalArgs {
    values: Vec<ArgValue>,
}

impl OptionalArgs {
    /// An empty argument list (every operation falls back to its defaults).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access without a shape check.
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    fn at(&self, index: usize) -> Result<&ArgValue, ArgShapeError> {
        self.values.get(index).ok_or(ArgShapeError::Missing { index })
    }

    /// Requires a string at `index`.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent or not a string.
    pub fn str_at(&self, index: usize) -> Result<&str, ArgShapeError> {
        match self.at(index)? {
            ArgValue::Str(s) => Ok(s),
            other => Err(mismatch(index, ArgKind::Str, other)),
        }
    }

    /// Requires an integer at `index`.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent or not an integer.
    pub fn int_at(&self, index: usize) -> Result<i64, ArgShapeError> {
        match self.at(index)? {
            ArgValue::Int(n) => Ok(*n),
            other => Err(mismatch(index, ArgKind::Int, other)),
        }
    }

    /// Requires a non-negative integer that fits a millisecond delay.
    ///
    /// Negative values are reported as a shape mismatch so the caller's
    /// defaults apply.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent, not an integer, or negative.
    pub fn delay_at(&self, index: usize) -> Result<u32, ArgShapeError> {
        let n = self.int_at(index)?;
        u32::try_from(n).map_err(|_| ArgShapeError::OutOfRange { index })
    }

    /// Requires a float at `index`.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent or not a float.
    pub fn float_at(&self, index: usize) -> Result<f64, ArgShapeError> {
        match self.at(index)? {
            ArgValue::Float(n) => Ok(*n),
            other => Err(mismatch(index, ArgKind::Float, other)),
        }
    }

    /// Requires a bool at `index`.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent or not a bool.
    pub fn bool_at(&self, index: usize) -> Result<bool, ArgShapeError> {
        match self.at(index)? {
            ArgValue::Bool(b) => Ok(*b),
            other => Err(mismatch(index, ArgKind::Bool, other)),
        }
    }

    /// Requires a key sequence at `index`.
    ///
    /// # Errors
    ///
    /// [`ArgShapeError`] if the slot is absent or not a key sequence.
    pub fn keys_at(&self, index: usize) -> Result<&[String], ArgShapeError> {
        match self.at(index)? {
            ArgValue::Keys(keys) => Ok(keys),
            other => Err(mismatch(index, ArgKind::Keys, other)),
        }
    }
}

fn mismatch(index: usize, expected: ArgKind, found: &ArgValue) -> ArgShapeError {
    ArgShapeError::WrongType {
        index,
        expected,
        found: found.kind(),
    }
}

impl From<Vec<ArgValue>> for OptionalArgs {
    fn from(values: Vec<ArgValue>) -> Self {
        Self { values }
    }
}

impl FromIterator<ArgValue> for OptionalArgs {
    fn from_iter<I: IntoIterator<Item = ArgValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Builds [`OptionalArgs`] from heterogeneous literals.
///
/// ```
/// use robokit_core::opt_args;
///
/// let args = opt_args!["v", "command"];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! opt_args {
    () => {
        $crate::args::OptionalArgs::none()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::args::OptionalArgs::from(vec![$($crate::args::ArgValue::from($value)),+])
    };
}

/// An options struct that can be filled from [`OptionalArgs`].
///
/// Implementors describe their slot layout in [`FromArgs::try_from_args`];
/// callers use [`FromArgs::from_args`], which applies the all-or-nothing
/// default rule.
pub trait FromArgs: Default + Sized {
    /// Attempts to fill every slot.
    ///
    /// # Errors
    ///
    /// The first [`ArgShapeError`] encountered.
    fn try_from_args(args: &OptionalArgs) -> Result<Self, ArgShapeError>;

    /// Fills every slot, or returns `Self::default()` if any slot fails.
    fn from_args(args: &OptionalArgs) -> Self {
        match Self::try_from_args(args) {
            Ok(filled) => filled,
            Err(e) => {
                debug!(
                    "optional arguments rejected ({e}); using defaults for {}",
                    std::any::type_name::<Self>()
                );
                Self::default()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
