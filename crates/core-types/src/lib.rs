//! Shared primitives for the self-healing locator crates.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while constructing locator primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorTypeError {
    #[error("unsupported locator kind: {0}")]
    UnknownLocatorKind(String),
    #[error("element name must not be blank")]
    BlankElementName,
}

/// Closed set of identification schemes a driver understands.
#[cfg_attr(
    feature = "serde-full",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LocatorKind {
    Css,
    Xpath,
    Id,
    Name,
    Class,
    Tag,
}

impl LocatorKind {
    pub const ALL: [LocatorKind; 6] = [
        LocatorKind::Css,
        LocatorKind::Xpath,
        LocatorKind::Id,
        LocatorKind::Name,
        LocatorKind::Class,
        LocatorKind::Tag,
    ];

    /// Wire name used in the persisted store (`by` field).
    pub fn name(&self) -> &'static str {
        match self {
            LocatorKind::Css => "css",
            LocatorKind::Xpath => "xpath",
            LocatorKind::Id => "id",
            LocatorKind::Name => "name",
            LocatorKind::Class => "class",
            LocatorKind::Tag => "tag",
        }
    }

    /// Kinds whose expression is a single bare token rather than a query.
    pub fn is_single_token(&self) -> bool {
        matches!(
            self,
            LocatorKind::Id | LocatorKind::Name | LocatorKind::Class | LocatorKind::Tag
        )
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocatorKind {
    type Err = LocatorTypeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "css" | "css selector" => Ok(LocatorKind::Css),
            "xpath" => Ok(LocatorKind::Xpath),
            "id" => Ok(LocatorKind::Id),
            "name" => Ok(LocatorKind::Name),
            "class" | "classname" | "class name" => Ok(LocatorKind::Class),
            "tag" | "tagname" | "tag name" => Ok(LocatorKind::Tag),
            _ => Err(LocatorTypeError::UnknownLocatorKind(raw.to_string())),
        }
    }
}

impl TryFrom<String> for LocatorKind {
    type Error = LocatorTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocatorKind> for String {
    fn from(kind: LocatorKind) -> Self {
        kind.name().to_string()
    }
}

/// A kind plus the expression used to find one UI element.
///
/// Fields are private so a strategy cannot change after construction.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocatorStrategy {
    kind: LocatorKind,
    expression: String,
}

impl LocatorStrategy {
    pub fn new(kind: LocatorKind, expression: impl Into<String>) -> Self {
        Self {
            kind,
            expression: expression.into(),
        }
    }

    /// Build a strategy from a string kind, rejecting unknown kinds.
    pub fn parse(kind: &str, expression: impl Into<String>) -> Result<Self, LocatorTypeError> {
        Ok(Self::new(kind.parse()?, expression))
    }

    pub fn css(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Css, expression)
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Xpath, expression)
    }

    pub fn id(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Id, expression)
    }

    pub fn name(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Name, expression)
    }

    pub fn class(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Class, expression)
    }

    pub fn tag(expression: impl Into<String>) -> Self {
        Self::new(LocatorKind::Tag, expression)
    }

    pub fn kind(&self) -> LocatorKind {
        self.kind
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.expression)
    }
}

/// Logical name of a UI role, e.g. `addToCartButton`.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementName(String);

impl ElementName {
    pub fn new(name: impl Into<String>) -> Result<Self, LocatorTypeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LocatorTypeError::BlankElementName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ElementName {
    type Error = LocatorTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
