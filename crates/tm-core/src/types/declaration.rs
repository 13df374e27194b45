//! Located type declarations.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::range::ByteRange;

/// The kind of a movable type declaration.
///
/// # Examples
///
/// ```
/// use tm_core::TypeKind;
///
/// assert_eq!(TypeKind::Interface.keyword(), "interface");
/// assert_eq!(TypeKind::TypeAlias.keyword(), "type");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// `type Foo = ...`
    TypeAlias,
    /// `interface Foo { ... }`
    Interface,
    /// `enum Foo { ... }` (including `const enum`)
    Enum,
}

impl TypeKind {
    /// Returns the TypeScript keyword introducing this declaration.
    #[inline]
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::TypeAlias => "type",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }

    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TypeAlias => "type alias",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

/// A type declaration located in a source file.
///
/// Created by the type locator and immutable afterward. The declaring file
/// owns the text covered by [`declaration_span`](Self::declaration_span)
/// until the move is applied.
///
/// # Examples
///
/// ```
/// use tm_core::{ByteRange, TypeInfo, TypeKind};
///
/// let info = TypeInfo::new(
///     "Foo",
///     TypeKind::Interface,
///     ByteRange::new(0, 36),
///     ByteRange::new(17, 20),
///     ["Bar"],
/// );
/// assert_eq!(info.name(), "Foo");
/// assert_eq!(info.dependencies(), ["Bar"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    declaration_span: ByteRange,
    name_range: ByteRange,
    dependencies: SmallVec<[String; 4]>,
}

impl TypeInfo {
    /// Creates a new type info.
    #[must_use]
    pub fn new<I, S>(
        name: impl Into<String>,
        kind: TypeKind,
        declaration_span: ByteRange,
        name_range: ByteRange,
        dependencies: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            declaration_span,
            name_range,
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared name, unique within its declaring file.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaration kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The span covering the whole declaration, including `export`/`declare`
    /// modifiers and a trailing semicolon.
    #[inline]
    #[must_use]
    pub const fn declaration_span(&self) -> ByteRange {
        self.declaration_span
    }

    /// The span of the declared name identifier.
    #[inline]
    #[must_use]
    pub const fn name_range(&self) -> ByteRange {
        self.name_range
    }

    /// Type names referenced inside the declaration, in first-occurrence order.
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the declaration text from the declaring file's source.
    ///
    /// Returns `None` if the span does not fit `source`.
    #[must_use]
    pub fn declaration_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.declaration_span.start..self.declaration_span.end)
    }
}
