//! Runtime half of the polymorphic codec.
//!
//! Generated code is thin: it declares the union enum, registers each variant
//! with a [`VariantSet`] and forwards serde calls to the functions in this
//! module. All dispatch, probing and two-phase decoding lives here.

mod container;
mod variant;

#[cfg(test)]
pub(crate) mod test_support;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::Error;

pub use container::{
    decode_container, deserialize_container, resolve_keyed, resolve_scalar, resolve_sequence,
};
pub use variant::{
    DecodeFn, VariantSet, decode_union, deserialize_union, encode_union, encode_variant,
    is_absent, probe_discriminant, serialize_union, tagged_value,
};

/// A named record type taking part in generated codecs.
///
/// Emitted once per distinct type name, whether the type is a variant, a
/// container, or both.
pub trait Record {
    const TYPE_NAME: &'static str;
}

/// A record type that is one of the variants of union `U`.
///
/// Its discriminant value on the wire is [`Record::TYPE_NAME`].
///
/// Encoding goes through [`serde_json::Value`] so the discriminant can be
/// appended, which means the variant's serialized form must fit in a `Value`.
/// Without serde_json's `arbitrary_precision` feature, integers outside the
/// `i64`/`u64` range fail with [`Error::Encode`].
pub trait Variant<U>: Record + Serialize + DeserializeOwned + Into<U> {}

/// A closed set of variants sharing one discriminant member.
pub trait Union: Sized + 'static {
    const NAME: &'static str;
    /// Name of the JSON member holding the variant name.
    const DISCRIMINANT: &'static str;

    /// The registry used to dispatch decodes, built once per process.
    fn variant_set() -> &'static VariantSet<Self>;

    /// Declared name of the variant currently held.
    fn variant_name(&self) -> &'static str;

    /// The held variant's JSON object with the discriminant appended.
    fn to_tagged_value(&self) -> Result<Value, Error>;
}

/// A record with one or more polymorphic fields, decoded in two phases.
pub trait Container: Record + Sized {
    /// Phase-one shape: plain fields as declared, polymorphic fields as raw captures.
    type Captured: DeserializeOwned;

    /// Phase two: route each captured fragment through its union's decoder.
    fn resolve(captured: Self::Captured) -> Result<Self, Error>;
}
