//! The type inventory: which unions exist and which containers hold them.
//!
//! Usually loaded from JSON:
//!
//! ```json
//! {
//!   "package": "crate::shapes",
//!   "unions": [
//!     { "name": "Shape", "discriminant": "kind",
//!       "variants": ["Triangle", "Square", "Polygon", "Circle"] }
//!   ],
//!   "containers": [
//!     { "name": "Drawing",
//!       "fields": [{ "name": "title", "ty": "String" }],
//!       "polymorphic": [
//!         { "name": "shapes", "kind": "sequence", "union": "Shape" },
//!         { "name": "layers", "kind": "keyed", "union": "Shape", "json_name": "named_layers" }
//!       ] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::GenerateError;
use crate::path_de::from_slice_with_path_message;

pub const DEFAULT_DISCRIMINANT: &str = "kind";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inventory {
    /// Rust path under which the declared types are reachable from the generated code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub unions: Vec<UnionDecl>,
    #[serde(default)]
    pub containers: Vec<ContainerDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnionDecl {
    pub name: String,
    #[serde(default = "default_discriminant")]
    pub discriminant: String,
    pub variants: Vec<String>,
    /// Derives placed on the generated enum.
    #[serde(default = "default_derives")]
    pub derive: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerDecl {
    pub name: String,
    /// Plain fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    pub polymorphic: Vec<PolyFieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    /// Rust type syntax, e.g. `String` or `Vec<u32>`.
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    /// Use `Default::default()` when the member is missing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolyFieldDecl {
    pub name: String,
    pub kind: PolyKind,
    pub union: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
}

/// How a container field holds values of a union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolyKind {
    /// One optional value.
    Scalar,
    /// An ordered list.
    Sequence,
    /// A string-keyed collection.
    Keyed,
}

fn default_discriminant() -> String {
    DEFAULT_DISCRIMINANT.to_owned()
}

fn default_derives() -> Vec<String> {
    ["Debug", "Clone", "PartialEq"].map(String::from).to_vec()
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        from_slice_with_path_message(bytes)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| GenerateError::File {
            path: path.to_owned(),
            source,
        })?;
        Self::from_slice(&bytes).map_err(|message| GenerateError::Inventory {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn union(mut self, union: UnionDecl) -> Self {
        self.unions.push(union);
        self
    }

    pub fn container(mut self, container: ContainerDecl) -> Self {
        self.containers.push(container);
        self
    }

    /// Append `other`'s declarations. The first package seen wins.
    pub fn merge(&mut self, other: Inventory) {
        if self.package.is_none() {
            self.package = other.package;
        }
        self.unions.extend(other.unions);
        self.containers.extend(other.containers);
    }
}

impl UnionDecl {
    pub fn new<I, S>(name: impl Into<String>, discriminant: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            discriminant: discriminant.into(),
            variants: variants.into_iter().map(Into::into).collect(),
            derive: default_derives(),
        }
    }

    pub fn derive<I, S>(mut self, derives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derive = derives.into_iter().map(Into::into).collect();
        self
    }
}

impl ContainerDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            polymorphic: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn poly(mut self, field: PolyFieldDecl) -> Self {
        self.polymorphic.push(field);
        self
    }
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            json_name: None,
            default: false,
        }
    }

    pub fn json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    pub fn with_default(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn serialized_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.name)
    }
}

impl PolyFieldDecl {
    pub fn new(name: impl Into<String>, kind: PolyKind, union: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            union: union.into(),
            json_name: None,
        }
    }

    pub fn scalar(name: impl Into<String>, union: impl Into<String>) -> Self {
        Self::new(name, PolyKind::Scalar, union)
    }

    pub fn sequence(name: impl Into<String>, union: impl Into<String>) -> Self {
        Self::new(name, PolyKind::Sequence, union)
    }

    pub fn keyed(name: impl Into<String>, union: impl Into<String>) -> Self {
        Self::new(name, PolyKind::Keyed, union)
    }

    pub fn json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    pub fn serialized_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.name)
    }
}
