//! Error types for code generation and for the runtime codecs.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// RUNTIME (decode / encode)
// ————————————————————————————————————————————————————————————————————————————

/// Failure while decoding or encoding a polymorphic value.
///
/// Messages follow the `unmarshal <what>: <cause>` shape so nested failures read
/// as a single path from the outermost container down to the offending value.
#[derive(Debug, Error)]
pub enum Error {
    /// The discriminant member could not be read from the input.
    #[error("unmarshal {union} {discriminant}: {source}")]
    Probe {
        union: &'static str,
        discriminant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The discriminant was readable but names no declared variant.
    #[error("could not unmarshal {union} JSON: unknown variant {value:?}")]
    UnknownVariant { union: &'static str, value: String },

    /// The discriminant matched, but the variant's own shape did not.
    #[error("unmarshal {variant}: {source}")]
    Variant {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Phase one of a container decode failed (structure of the container itself).
    #[error("unmarshal {container} at {path}: {source}")]
    Container {
        container: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Phase two failed while resolving one polymorphic field.
    #[error("unmarshal {path}: {source}")]
    Field {
        path: FieldPath,
        #[source]
        source: Box<Error>,
    },

    /// A `null` element inside a sequence or keyed field.
    #[error("{union} element is null")]
    AbsentElement { union: &'static str },

    #[error("marshal {variant}: {source}")]
    Encode {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("marshal {variant}: serialized form is not a JSON object")]
    NotAnObject { variant: &'static str },

    #[error("marshal {variant}: member {discriminant:?} collides with the discriminant")]
    DiscriminantCollision {
        variant: &'static str,
        discriminant: &'static str,
    },
}

impl Error {
    pub(crate) fn field(path: FieldPath, source: Error) -> Self {
        Self::Field {
            path,
            source: Box::new(source),
        }
    }

    /// The innermost error, following phase-two field wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Location of a polymorphic field inside a container: `Drawing.shapes[1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub container: &'static str,
    pub field: &'static str,
    pub segment: Option<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl FieldPath {
    pub fn new(container: &'static str, field: &'static str) -> Self {
        Self {
            container,
            field,
            segment: None,
        }
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segment = Some(Segment::Index(index));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segment = Some(Segment::Key(key.into()));
        self
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.container, self.field)?;
        match &self.segment {
            None => Ok(()),
            Some(Segment::Index(index)) => write!(f, "[{index}]"),
            Some(Segment::Key(key)) => write!(f, "[{key}]"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// GENERATION
// ————————————————————————————————————————————————————————————————————————————

/// Failure while validating an inventory or emitting code for it.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("a package identifier is required")]
    MissingPackage,

    #[error("no union types to generate codecs for")]
    EmptyInventory,

    #[error("invalid package path {package:?}: {source}")]
    InvalidPackage {
        package: String,
        #[source]
        source: syn::Error,
    },

    #[error("{what} name {name:?} is not a valid Rust identifier")]
    InvalidIdent { what: &'static str, name: String },

    #[error("field {container}.{field} has invalid type {ty:?}: {source}")]
    InvalidType {
        container: String,
        field: String,
        ty: String,
        #[source]
        source: syn::Error,
    },

    #[error("union {union:?} has invalid derive {derive:?}")]
    InvalidDerive { union: String, derive: String },

    #[error("union {0:?} is declared more than once")]
    DuplicateUnion(String),

    #[error("union {0:?} has no variants")]
    EmptyUnion(String),

    #[error("union {union:?} lists variant {variant:?} more than once")]
    DuplicateVariant { union: String, variant: String },

    #[error("union {0:?} has an empty discriminant")]
    EmptyDiscriminant(String),

    #[error("union {0:?} has the same name as a variant or container")]
    UnionNameCollision(String),

    #[error("container {0:?} is declared more than once")]
    DuplicateContainer(String),

    #[error("container {0:?} has no polymorphic fields")]
    NoPolymorphicFields(String),

    #[error("container {container:?} declares field {field:?} more than once")]
    DuplicateField { container: String, field: String },

    #[error("container {container:?} serializes more than one field as {json_name:?}")]
    DuplicateJsonName { container: String, json_name: String },

    #[error("{container}.{field} references unknown union {union:?}")]
    UnknownUnion {
        container: String,
        field: String,
        union: String,
    },

    #[error("discriminant {discriminant:?} of union {union:?} collides with a field of {variant:?}")]
    DiscriminantCollision {
        union: String,
        discriminant: String,
        variant: String,
    },

    #[error("inventory {path}: {message}")]
    Inventory { path: String, message: String },

    #[error("rendered code does not parse: {0}")]
    Render(#[from] syn::Error),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
