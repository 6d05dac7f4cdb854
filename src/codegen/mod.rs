//! Render a [`Plan`] as Rust source.
//!
//! Items are built with `quote`, collected, parsed back as a `syn::File` (so a
//! rendering bug surfaces as an error here rather than in the user's build) and
//! printed with `prettyplease`.
//!
//! Generated code names everything through absolute paths (`::polyjson::..`,
//! `::core::..` and the plan's package path), so it can be `include!`d or
//! written to a module file without any `use` declarations.

mod container;
mod variant;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path};

use crate::GenerateError;
use crate::ir::Plan;

pub const HEADER: &str = "// Code generated by polyjson. DO NOT EDIT.";

#[derive(Debug, Default)]
pub struct Codegen {
    items: Vec<TokenStream>,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append everything `plan` needs: one `Record` impl per backing type, then
    /// each union, then each container.
    pub fn emit(&mut self, plan: &Plan) -> &mut Self {
        let package = &plan.package;
        for name in &plan.backing {
            self.items.push(record_impl(package, name));
        }
        for union in &plan.unions {
            self.items.push(variant::union_items(package, union));
        }
        for container in &plan.containers {
            self.items.push(container::container_items(package, container));
        }
        tracing::debug!(items = self.items.len(), "codegen emitted");
        self
    }

    pub fn into_string(self) -> Result<String, GenerateError> {
        let items = self.items;
        let file = syn::parse2::<syn::File>(quote! { #(#items)* })?;
        Ok(format!("{HEADER}\n\n{}", prettyplease::unparse(&file)))
    }
}

fn record_impl(package: &Path, name: &Ident) -> TokenStream {
    let type_name = name.to_string();
    quote! {
        impl ::polyjson::Record for #package::#name {
            const TYPE_NAME: &'static str = #type_name;
        }
    }
}
