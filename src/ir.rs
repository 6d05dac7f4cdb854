// Strongly-typed plan for codegen. Names and types are already validated and parsed;
// nothing here is a raw string that still needs checking.

use quote::format_ident;
use syn::{Ident, Path, Type};

pub use crate::inventory::PolyKind;

#[derive(Debug, Clone)]
pub struct Plan {
    /// Where the declared types live, as seen from the generated code.
    pub package: Path,
    /// Every distinct type name across all variants and containers, first-seen order.
    pub backing: Vec<Ident>,
    pub unions: Vec<UnionPlan>,
    pub containers: Vec<ContainerPlan>,
}

#[derive(Debug, Clone)]
pub struct UnionPlan {
    pub name: Ident,
    pub discriminant: String,
    pub variants: Vec<Ident>, // declaration order
    pub derives: Vec<Path>,
}

#[derive(Debug, Clone)]
pub struct ContainerPlan {
    pub name: Ident,
    pub fields: Vec<PlainField>,
    pub polymorphic: Vec<PolyField>,
}

#[derive(Debug, Clone)]
pub struct PlainField {
    pub name: Ident,
    pub json_name: String,
    pub ty: Type,
    pub default: bool,
}

#[derive(Debug, Clone)]
pub struct PolyField {
    pub name: Ident,
    pub json_name: String,
    pub kind: PolyKind,
    pub union: Ident,
}

impl Plan {
    pub fn union(&self, name: &str) -> Option<&UnionPlan> {
        self.unions.iter().find(|u| u.name == name)
    }

    pub fn container(&self, name: &str) -> Option<&ContainerPlan> {
        self.containers.iter().find(|c| c.name == name)
    }
}

impl ContainerPlan {
    /// Name of the generated phase-one struct.
    pub fn captured_name(&self) -> Ident {
        format_ident!("{}Captured", self.name)
    }

    /// Serialized member names in emission order: plain fields, then polymorphic ones.
    pub fn json_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|f| f.json_name.as_str())
            .chain(self.polymorphic.iter().map(|f| f.json_name.as_str()))
    }
}
