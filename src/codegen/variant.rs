use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

use crate::ir::UnionPlan;

/// The enum for one union plus its glue to the runtime codec.
pub(super) fn union_items(package: &Path, union: &UnionPlan) -> TokenStream {
    let UnionPlan {
        name,
        discriminant,
        variants,
        derives,
    } = union;
    let union_name = name.to_string();
    let variant_names = variants.iter().map(ToString::to_string).collect::<Vec<_>>();

    let derive_attr = if derives.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derives),*)] }
    };
    let doc = format!(" One of the `{union_name}` variants, tagged by `{discriminant}` on the wire.");

    quote! {
        #[doc = #doc]
        #derive_attr
        pub enum #name {
            #( #variants(#package::#variants), )*
        }

        #(
            impl ::core::convert::From<#package::#variants> for #name {
                fn from(value: #package::#variants) -> Self {
                    Self::#variants(value)
                }
            }

            impl ::polyjson::Variant<#name> for #package::#variants {}
        )*

        impl ::polyjson::Union for #name {
            const NAME: &'static str = #union_name;
            const DISCRIMINANT: &'static str = #discriminant;

            fn variant_set() -> &'static ::polyjson::VariantSet<Self> {
                static VARIANTS: ::polyjson::__private::Lazy<::polyjson::VariantSet<#name>> =
                    ::polyjson::__private::Lazy::new(|| {
                        ::polyjson::VariantSet::new()
                            #( .with::<#package::#variants>() )*
                    });
                &VARIANTS
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    #( Self::#variants(_) => #variant_names, )*
                }
            }

            fn to_tagged_value(
                &self,
            ) -> ::core::result::Result<::polyjson::__private::Value, ::polyjson::Error> {
                match self {
                    #( Self::#variants(value) => ::polyjson::tagged_value::<Self, #package::#variants>(value), )*
                }
            }
        }

        impl #name {
            /// Decode one value; empty input and `null` give `None`.
            pub fn decode(bytes: &[u8]) -> ::core::result::Result<::core::option::Option<Self>, ::polyjson::Error> {
                ::polyjson::decode_union(bytes)
            }

            /// Encode the held variant with its discriminant appended.
            pub fn encode(&self) -> ::core::result::Result<::std::vec::Vec<u8>, ::polyjson::Error> {
                ::polyjson::encode_union(self)
            }
        }

        impl ::polyjson::__private::serde::Serialize for #name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::polyjson::__private::serde::Serializer,
            {
                ::polyjson::serialize_union(self, serializer)
            }
        }

        impl<'de> ::polyjson::__private::serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::polyjson::__private::serde::Deserializer<'de>,
            {
                ::polyjson::deserialize_union(deserializer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::Item;

    use super::super::tests::{render, shape, trait_impls};
    use crate::inventory::UnionDecl;

    fn enum_item<'a>(file: &'a syn::File, name: &str) -> &'a syn::ItemEnum {
        file.items
            .iter()
            .find_map(|item| match item {
                Item::Enum(item) if item.ident == name => Some(item),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn enum_wraps_each_variant_in_order() {
        let file = syn::parse_file(&render(&[shape()], &[])).unwrap();
        let shape = enum_item(&file, "Shape");
        let variants = shape.variants.iter().map(|v| v.ident.to_string()).collect::<Vec<_>>();
        assert_eq!(variants, ["Triangle", "Square", "Polygon", "Circle"]);

        let derive = shape
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("derive"))
            .unwrap();
        let derive = quote::quote!(#derive).to_string();
        assert!(derive.contains("Debug") && derive.contains("PartialEq"), "{derive}");
    }

    #[test]
    fn emits_glue_per_variant() {
        let file = syn::parse_file(&render(&[shape()], &[])).unwrap();
        let impls = trait_impls(&file);
        let count = |trait_name: &str| impls.iter().filter(|(t, _)| t == trait_name).count();
        assert_eq!(count("From"), 4);
        assert_eq!(count("Variant"), 4);
        assert_eq!(count("Union"), 1);
        assert_eq!(count("Serialize"), 1);
        assert_eq!(count("Deserialize"), 1);
    }

    #[test]
    fn registry_follows_declaration_order() {
        let code = render(&[shape()], &[]);
        let positions = ["Triangle", "Square", "Polygon", "Circle"]
            .map(|v| code.find(&format!("with::<crate::shapes::{v}>()")).unwrap());
        assert!(positions.is_sorted(), "{code}");
        assert!(code.contains(r#"const DISCRIMINANT: &'static str = "kind";"#));
    }

    #[test]
    fn derives_are_configurable() {
        let bare = UnionDecl::new("Shape", "type", ["Circle"]).derive(Vec::<String>::new());
        let file = syn::parse_file(&render(&[bare], &[])).unwrap();
        let shape = enum_item(&file, "Shape");
        assert!(!shape.attrs.iter().any(|attr| attr.path().is_ident("derive")));
    }
}
