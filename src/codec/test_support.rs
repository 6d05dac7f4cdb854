//! Hand-written equivalents of generated code, for exercising the runtime directly.

use serde::{Deserialize, Serialize};

use super::Record;

macro_rules! records {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Record for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
            }
        )+
    };
}

macro_rules! test_union {
    ($union:ident, $discriminant:literal, [$($variant:ident),+ $(,)?]) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum $union {
            $($variant($variant)),+
        }

        $(
            impl From<$variant> for $union {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }

            impl $crate::codec::Variant<$union> for $variant {}
        )+

        impl $crate::codec::Union for $union {
            const NAME: &'static str = stringify!($union);
            const DISCRIMINANT: &'static str = $discriminant;

            fn variant_set() -> &'static $crate::codec::VariantSet<Self> {
                static VARIANTS: once_cell::sync::Lazy<$crate::codec::VariantSet<$union>> =
                    once_cell::sync::Lazy::new(|| {
                        $crate::codec::VariantSet::new()$(.with::<$variant>())+
                    });
                &VARIANTS
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant)),+
                }
            }

            fn to_tagged_value(&self) -> Result<serde_json::Value, $crate::Error> {
                match self {
                    $(Self::$variant(value) => $crate::codec::tagged_value::<Self, _>(value)),+
                }
            }
        }

        impl serde::Serialize for $union {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::codec::serialize_union(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $union {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::codec::deserialize_union(deserializer)
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(rename = "Center")]
    pub center: [i32; 2],
    #[serde(rename = "Radius")]
    pub radius: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Square {
    #[serde(rename = "TopLeft")]
    pub top_left: [i32; 2],
    #[serde(rename = "Width")]
    pub width: i32,
    #[serde(rename = "Height")]
    pub height: i32,
}

/// Carries its own `kind` member, which collides with the discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labeled {
    pub kind: String,
}

/// Serializes to a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Count(pub u32);

/// Holds an integer that only fits in `Value` up to `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wide {
    pub value: u128,
}

records!(Circle, Square, Labeled, Count, Wide);

test_union!(Shape, "kind", [Circle, Square]);
test_union!(Odd, "kind", [Labeled, Count, Wide]);
