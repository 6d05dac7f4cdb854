use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use super::{Container, Record, Union};
use crate::error::{Error, FieldPath};
use crate::path_de::from_slice_with_path;

/// Two-phase decode of a container.
///
/// Phase one decodes plain fields and captures each polymorphic field as raw
/// JSON; a failure there names the container and the JSON path. Phase two is
/// [`Container::resolve`].
pub fn decode_container<C: Container>(bytes: &[u8]) -> Result<C, Error> {
    let captured = from_slice_with_path::<C::Captured>(bytes).map_err(|err| Error::Container {
        container: C::TYPE_NAME,
        path: err.path,
        source: err.source,
    })?;
    C::resolve(captured)
}

/// serde entry point for generated `Deserialize` impls of containers.
pub fn deserialize_container<'de, C, D>(deserializer: D) -> Result<C, D::Error>
where
    C: Container,
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let captured = C::Captured::deserialize(deserializer)?;
    C::resolve(captured).map_err(D::Error::custom)
}

// ————————————————————————————————————————————————————————————————————————————
// PHASE TWO
// ————————————————————————————————————————————————————————————————————————————

/// A missing, empty or `null` capture resolves to `None`.
pub fn resolve_scalar<C, U>(field: &'static str, raw: Option<Box<RawValue>>) -> Result<Option<U>, Error>
where
    C: Record,
    U: Union,
{
    let Some(raw) = raw else {
        return Ok(None);
    };
    U::variant_set()
        .decode_raw(&raw)
        .map_err(|err| Error::field(FieldPath::new(C::TYPE_NAME, field), err))
}

/// Resolve every element in order; the first failure aborts with its index.
pub fn resolve_sequence<C, U, Out>(
    field: &'static str,
    raws: Option<Vec<Box<RawValue>>>,
) -> Result<Out, Error>
where
    C: Record,
    U: Union,
    Out: FromIterator<U>,
{
    raws.unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            resolve_element::<U>(raw)
                .map_err(|err| Error::field(FieldPath::new(C::TYPE_NAME, field).index(index), err))
        })
        .collect()
}

/// Resolve every entry, keeping its key; the first failure (in document order) aborts with its key.
pub fn resolve_keyed<C, U, Out>(
    field: &'static str,
    raws: Option<IndexMap<String, Box<RawValue>>>,
) -> Result<Out, Error>
where
    C: Record,
    U: Union,
    Out: FromIterator<(String, U)>,
{
    raws.unwrap_or_default()
        .into_iter()
        .map(|(key, raw)| match resolve_element::<U>(&raw) {
            Ok(value) => Ok((key, value)),
            Err(err) => Err(Error::field(
                FieldPath::new(C::TYPE_NAME, field).key(key),
                err,
            )),
        })
        .collect()
}

fn resolve_element<U: Union>(raw: &RawValue) -> Result<U, Error> {
    U::variant_set()
        .decode_raw(raw)?
        .ok_or(Error::AbsentElement { union: U::NAME })
}
