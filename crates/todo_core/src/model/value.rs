//! Todo value objects.
//!
//! # Responsibility
//! - Wrap each primitive todo field and run admission rules on construction.
//! - Keep rules pluggable so new checks do not touch use-case code.
//!
//! # Invariants
//! - Values are immutable once constructed.
//! - `TodoId` is always positive.
//! - `Title` never exceeds `TITLE_MAX_CHARS` Unicode scalar values.
//! - `Status`/`Priority` only hold their enumerated values.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length, counted in `char`s rather than bytes.
pub const TITLE_MAX_CHARS: usize = 10;

/// Admission rule applied by a value object constructor.
pub type Rule<T> = fn(&T) -> Result<(), ValueError>;

/// Reason a raw value was refused by a value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    NonPositiveId(i64),
    TitleTooLong { max: usize, actual: usize },
    UnknownStatus(u32),
    UnknownPriority(u32),
    /// Raised by rules plugged in through `with_rules`.
    Rejected(&'static str),
}

impl Display for ValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(value) => write!(f, "todo id must be positive, got {value}"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title must be at most {max} chars, got {actual}")
            }
            Self::UnknownStatus(value) => write!(f, "unknown status id {value}"),
            Self::UnknownPriority(value) => write!(f, "unknown priority id {value}"),
            Self::Rejected(reason) => write!(f, "value rejected: {reason}"),
        }
    }
}

impl Error for ValueError {}

fn check<T: ?Sized>(value: &T, rules: &[Rule<T>]) -> Result<(), ValueError> {
    rules.iter().try_for_each(|rule| rule(value))
}

fn id_is_positive(value: &i64) -> Result<(), ValueError> {
    if *value <= 0 {
        return Err(ValueError::NonPositiveId(*value));
    }
    Ok(())
}

fn title_within_limit(value: &str) -> Result<(), ValueError> {
    let actual = value.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(ValueError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

pub const ID_RULES: &[Rule<i64>] = &[id_is_positive];
pub const TITLE_RULES: &[Rule<str>] = &[title_within_limit];
pub const IMPLEMENTATION_DATE_RULES: &[Rule<DateTime<Utc>>] = &[];
pub const DUE_DATE_RULES: &[Rule<DateTime<Utc>>] = &[];
pub const MEMO_RULES: &[Rule<str>] = &[];

/// Storage identifier assigned by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Result<Self, ValueError> {
        Self::with_rules(value, ID_RULES)
    }

    pub fn with_rules(value: i64, rules: &[Rule<i64>]) -> Result<Self, ValueError> {
        check(&value, rules)?;
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short todo headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        Self::with_rules(value, TITLE_RULES)
    }

    pub fn with_rules(value: impl Into<String>, rules: &[Rule<str>]) -> Result<Self, ValueError> {
        let value = value.into();
        check(value.as_str(), rules)?;
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Day the work is planned to happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplementationDate(DateTime<Utc>);

impl ImplementationDate {
    pub fn new(value: DateTime<Utc>) -> Result<Self, ValueError> {
        Self::with_rules(value, IMPLEMENTATION_DATE_RULES)
    }

    pub fn with_rules(
        value: DateTime<Utc>,
        rules: &[Rule<DateTime<Utc>>],
    ) -> Result<Self, ValueError> {
        check(&value, rules)?;
        Ok(Self(value))
    }

    pub fn value(self) -> DateTime<Utc> {
        self.0
    }
}

/// Deadline for the todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    pub fn new(value: DateTime<Utc>) -> Result<Self, ValueError> {
        Self::with_rules(value, DUE_DATE_RULES)
    }

    pub fn with_rules(
        value: DateTime<Utc>,
        rules: &[Rule<DateTime<Utc>>],
    ) -> Result<Self, ValueError> {
        check(&value, rules)?;
        Ok(Self(value))
    }

    pub fn value(self) -> DateTime<Utc> {
        self.0
    }
}

/// Free-form annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo(String);

impl Memo {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        Self::with_rules(value, MEMO_RULES)
    }

    pub fn with_rules(value: impl Into<String>, rules: &[Rule<str>]) -> Result<Self, ValueError> {
        let value = value.into();
        check(value.as_str(), rules)?;
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Progress state. Ids match the `statuses` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not started.
    Todo = 1,
    /// In progress.
    Doing = 2,
    /// Complete.
    Done = 3,
}

impl Status {
    pub fn new(value: u32) -> Result<Self, ValueError> {
        Self::try_from(value)
    }

    pub fn value(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Status {
    type Error = ValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Todo),
            2 => Ok(Self::Doing),
            3 => Ok(Self::Done),
            other => Err(ValueError::UnknownStatus(other)),
        }
    }
}

/// Urgency. Ids match the `priorities` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Unknown = 1,
    Low = 2,
    Medium = 3,
    High = 4,
}

impl Priority {
    pub fn new(value: u32) -> Result<Self, ValueError> {
        Self::try_from(value)
    }

    pub fn value(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Priority {
    type Error = ValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unknown),
            2 => Ok(Self::Low),
            3 => Ok(Self::Medium),
            4 => Ok(Self::High),
            other => Err(ValueError::UnknownPriority(other)),
        }
    }
}
