//! Validate an inventory and resolve it into a [`Plan`].
//!
//! Every check that can be made without the user's types happens here, so that
//! codegen only ever sees names and types that are known to be well formed.

use std::collections::HashSet;

use indexmap::IndexSet;
use syn::{Ident, Path, Type};

use crate::GenerateError;
use crate::inventory::{ContainerDecl, UnionDecl};
use crate::ir::{ContainerPlan, PlainField, Plan, PolyField, UnionPlan};

pub fn lower_to_ir(
    package: &str,
    unions: &[UnionDecl],
    containers: &[ContainerDecl],
) -> Result<Plan, GenerateError> {
    // Configuration problems come before anything about individual types.
    let package = package.trim();
    if package.is_empty() {
        return Err(GenerateError::MissingPackage);
    }
    if unions.is_empty() {
        return Err(GenerateError::EmptyInventory);
    }
    let package = syn::parse_str::<Path>(package).map_err(|source| GenerateError::InvalidPackage {
        package: package.to_owned(),
        source,
    })?;

    let unions = unions.iter().map(lower_union).collect::<Result<Vec<_>, _>>()?;
    let mut seen = HashSet::new();
    for union in &unions {
        if !seen.insert(union.name.to_string()) {
            return Err(GenerateError::DuplicateUnion(union.name.to_string()));
        }
    }

    let containers = containers
        .iter()
        .map(|c| lower_container(c, &seen))
        .collect::<Result<Vec<_>, _>>()?;
    let mut names = HashSet::new();
    if let Some(dup) = containers.iter().find(|c| !names.insert(c.name.to_string())) {
        return Err(GenerateError::DuplicateContainer(dup.name.to_string()));
    }

    check_union_names(&unions, &containers)?;
    check_discriminants(&unions, &containers)?;

    let backing = backing_set(&unions, &containers);
    tracing::debug!(
        unions = unions.len(),
        containers = containers.len(),
        backing = backing.len(),
        "inventory lowered"
    );

    Ok(Plan {
        package,
        backing,
        unions,
        containers,
    })
}

fn ident(what: &'static str, name: &str) -> Result<Ident, GenerateError> {
    syn::parse_str::<Ident>(name).map_err(|_| GenerateError::InvalidIdent {
        what,
        name: name.to_owned(),
    })
}

fn lower_union(decl: &UnionDecl) -> Result<UnionPlan, GenerateError> {
    let name = ident("union", &decl.name)?;
    if decl.variants.is_empty() {
        return Err(GenerateError::EmptyUnion(decl.name.clone()));
    }
    if decl.discriminant.is_empty() {
        return Err(GenerateError::EmptyDiscriminant(decl.name.clone()));
    }

    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(decl.variants.len());
    for variant in &decl.variants {
        if !seen.insert(variant.as_str()) {
            return Err(GenerateError::DuplicateVariant {
                union: decl.name.clone(),
                variant: variant.clone(),
            });
        }
        variants.push(ident("variant", variant)?);
    }

    let derives = decl
        .derive
        .iter()
        .map(|derive| {
            syn::parse_str::<Path>(derive).map_err(|_| GenerateError::InvalidDerive {
                union: decl.name.clone(),
                derive: derive.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UnionPlan {
        name,
        discriminant: decl.discriminant.clone(),
        variants,
        derives,
    })
}

fn lower_container(
    decl: &ContainerDecl,
    unions: &HashSet<String>,
) -> Result<ContainerPlan, GenerateError> {
    let name = ident("container", &decl.name)?;
    if decl.polymorphic.is_empty() {
        return Err(GenerateError::NoPolymorphicFields(decl.name.clone()));
    }

    let mut field_names = HashSet::new();
    let mut json_names = HashSet::new();
    let mut claim = |field: &str, json_name: &str| {
        if !field_names.insert(field.to_owned()) {
            return Err(GenerateError::DuplicateField {
                container: decl.name.clone(),
                field: field.to_owned(),
            });
        }
        if !json_names.insert(json_name.to_owned()) {
            return Err(GenerateError::DuplicateJsonName {
                container: decl.name.clone(),
                json_name: json_name.to_owned(),
            });
        }
        Ok(())
    };

    let mut fields = Vec::with_capacity(decl.fields.len());
    for field in &decl.fields {
        claim(&field.name, field.serialized_name())?;
        let ty = syn::parse_str::<Type>(&field.ty).map_err(|source| GenerateError::InvalidType {
            container: decl.name.clone(),
            field: field.name.clone(),
            ty: field.ty.clone(),
            source,
        })?;
        fields.push(PlainField {
            name: ident("field", &field.name)?,
            json_name: field.serialized_name().to_owned(),
            ty,
            default: field.default,
        });
    }

    let mut polymorphic = Vec::with_capacity(decl.polymorphic.len());
    for field in &decl.polymorphic {
        claim(&field.name, field.serialized_name())?;
        if !unions.contains(&field.union) {
            return Err(GenerateError::UnknownUnion {
                container: decl.name.clone(),
                field: field.name.clone(),
                union: field.union.clone(),
            });
        }
        polymorphic.push(PolyField {
            name: ident("field", &field.name)?,
            json_name: field.serialized_name().to_owned(),
            kind: field.kind,
            union: ident("union", &field.union)?,
        });
    }

    Ok(ContainerPlan {
        name,
        fields,
        polymorphic,
    })
}

/// A union's enum shares a namespace with the types it is generated next to,
/// including each container's phase-one `…Captured` struct.
fn check_union_names(unions: &[UnionPlan], containers: &[ContainerPlan]) -> Result<(), GenerateError> {
    let taken = unions
        .iter()
        .flat_map(|u| u.variants.iter())
        .chain(containers.iter().map(|c| &c.name))
        .map(Ident::to_string)
        .chain(containers.iter().map(|c| c.captured_name().to_string()))
        .collect::<HashSet<_>>();
    match unions.iter().find(|u| taken.contains(&u.name.to_string())) {
        Some(union) => Err(GenerateError::UnionNameCollision(union.name.to_string())),
        None => Ok(()),
    }
}

/// Only variants that are also containers have fields we know about; the rest
/// are checked at encode time.
fn check_discriminants(unions: &[UnionPlan], containers: &[ContainerPlan]) -> Result<(), GenerateError> {
    for union in unions {
        for variant in &union.variants {
            let Some(container) = containers.iter().find(|c| &c.name == variant) else {
                continue;
            };
            if container.json_names().any(|name| name == union.discriminant) {
                return Err(GenerateError::DiscriminantCollision {
                    union: union.name.to_string(),
                    discriminant: union.discriminant.clone(),
                    variant: variant.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn backing_set(unions: &[UnionPlan], containers: &[ContainerPlan]) -> Vec<Ident> {
    unions
        .iter()
        .flat_map(|u| u.variants.iter())
        .chain(containers.iter().map(|c| &c.name))
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
