use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

use crate::ir::{ContainerPlan, PlainField, PolyField, PolyKind};

/// Phase-one capture struct, `Container` impl and serde impls for one container.
pub(super) fn container_items(package: &Path, container: &ContainerPlan) -> TokenStream {
    let name = &container.name;
    let captured = container.captured_name();
    let type_name = name.to_string();

    let captured_fields = container
        .fields
        .iter()
        .map(captured_plain)
        .chain(container.polymorphic.iter().map(captured_poly));

    let plain = container.fields.iter().map(|f| &f.name);
    let poly_inits = container.polymorphic.iter().map(resolve_poly);

    let member_count = container.fields.len() + container.polymorphic.len();
    let members = container
        .fields
        .iter()
        .map(|f| (&f.name, &f.json_name))
        .chain(container.polymorphic.iter().map(|f| (&f.name, &f.json_name)))
        .map(|(field, json_name)| {
            quote! { state.serialize_field(#json_name, &self.#field)?; }
        });

    quote! {
        #[doc(hidden)]
        #[derive(::polyjson::__private::serde::Deserialize)]
        #[serde(crate = "::polyjson::__private::serde")]
        pub struct #captured {
            #( #captured_fields, )*
        }

        impl ::polyjson::Container for #package::#name {
            type Captured = #captured;

            fn resolve(captured: Self::Captured) -> ::core::result::Result<Self, ::polyjson::Error> {
                ::core::result::Result::Ok(Self {
                    #( #plain: captured.#plain, )*
                    #( #poly_inits, )*
                })
            }
        }

        impl ::polyjson::__private::serde::Serialize for #package::#name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::polyjson::__private::serde::Serializer,
            {
                use ::polyjson::__private::serde::ser::SerializeStruct as _;

                let mut state = serializer.serialize_struct(#type_name, #member_count)?;
                #( #members )*
                state.end()
            }
        }

        impl<'de> ::polyjson::__private::serde::Deserialize<'de> for #package::#name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::polyjson::__private::serde::Deserializer<'de>,
            {
                ::polyjson::deserialize_container(deserializer)
            }
        }
    }
}

fn captured_plain(field: &PlainField) -> TokenStream {
    let PlainField {
        name,
        json_name,
        ty,
        default,
    } = field;
    let default = default.then(|| quote! { #[serde(default)] });
    quote! {
        #[serde(rename = #json_name)]
        #default
        pub #name: #ty
    }
}

fn captured_poly(field: &PolyField) -> TokenStream {
    let PolyField {
        name,
        json_name,
        kind,
        ..
    } = field;
    let raw = quote! { ::std::boxed::Box<::polyjson::__private::RawValue> };
    let ty = match kind {
        PolyKind::Scalar => raw,
        PolyKind::Sequence => quote! { ::std::vec::Vec<#raw> },
        PolyKind::Keyed => {
            quote! { ::polyjson::__private::IndexMap<::std::string::String, #raw> }
        }
    };
    quote! {
        #[serde(rename = #json_name, default)]
        pub #name: ::core::option::Option<#ty>
    }
}

fn resolve_poly(field: &PolyField) -> TokenStream {
    let PolyField {
        name, kind, union, ..
    } = field;
    let field_name = name.to_string();
    let resolve = match kind {
        PolyKind::Scalar => quote! { ::polyjson::resolve_scalar::<Self, #union> },
        PolyKind::Sequence => quote! { ::polyjson::resolve_sequence::<Self, #union, _> },
        PolyKind::Keyed => quote! { ::polyjson::resolve_keyed::<Self, #union, _> },
    };
    quote! { #name: #resolve(#field_name, captured.#name)? }
}
