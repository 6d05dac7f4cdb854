use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::value::RawValue;

use super::{Record, Union, Variant};
use crate::Error;

/// Decoder for one registered variant: full decode of the bytes as that variant's shape.
pub type DecodeFn<U> = fn(&[u8]) -> Result<U, serde_json::Error>;

/// Ordered lookup from discriminant value to variant decoder.
///
/// Registration order is declaration order. Lookup is an exact string match, so
/// the order never changes which decoder is picked.
pub struct VariantSet<U> {
    variants: IndexMap<&'static str, DecodeFn<U>>,
}

impl<U: Union> Default for VariantSet<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Union> VariantSet<U> {
    pub fn new() -> Self {
        Self {
            variants: IndexMap::new(),
        }
    }

    /// Builder form of [`VariantSet::register`].
    pub fn with<V: Variant<U>>(mut self) -> Self {
        self.register::<V>();
        self
    }

    /// Register `V` under its type name. A second registration of the same name is ignored.
    pub fn register<V: Variant<U>>(&mut self) -> &mut Self {
        match self.variants.entry(V::TYPE_NAME) {
            Entry::Occupied(_) => {
                tracing::warn!(
                    union = U::NAME,
                    variant = V::TYPE_NAME,
                    "variant registered twice; keeping the first registration"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(decode_as::<U, V>);
            }
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Decode one serialized value of the union.
    ///
    /// Empty input and `null` are absence, not errors. Otherwise the
    /// discriminant is probed first and the bytes are decoded in full as the
    /// variant it names.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<U>, Error> {
        if is_absent(bytes) {
            return Ok(None);
        }

        let tag = probe_discriminant(bytes, U::DISCRIMINANT).map_err(|source| Error::Probe {
            union: U::NAME,
            discriminant: U::DISCRIMINANT,
            source,
        })?;

        let Some((&variant, decode)) = self.variants.get_key_value(tag.as_str()) else {
            return Err(Error::UnknownVariant {
                union: U::NAME,
                value: tag,
            });
        };

        tracing::trace!(union = U::NAME, variant, "dispatching decode");
        decode(bytes)
            .map(Some)
            .map_err(|source| Error::Variant { variant, source })
    }

    pub fn decode_raw(&self, raw: &RawValue) -> Result<Option<U>, Error> {
        self.decode(raw.get().as_bytes())
    }
}

impl<U> fmt::Debug for VariantSet<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.variants.keys()).finish()
    }
}

fn decode_as<U, V>(bytes: &[u8]) -> Result<U, serde_json::Error>
where
    V: Variant<U>,
{
    serde_json::from_slice::<V>(bytes).map(Into::into)
}

/// `true` for empty input and for a bare `null`.
pub fn is_absent(bytes: &[u8]) -> bool {
    let trimmed = bytes.trim_ascii();
    trimmed.is_empty() || trimmed == b"null"
}

// ————————————————————————————————————————————————————————————————————————————
// PROBE
// ————————————————————————————————————————————————————————————————————————————

/// Read only the `field` member of a JSON object.
///
/// Every other member is skipped without being materialized. A missing or
/// `null` member probes as the empty string; a repeated member keeps its last
/// value.
pub fn probe_discriminant(bytes: &[u8], field: &str) -> Result<String, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let tag = Probe { field }.deserialize(&mut de)?;
    de.end()?;
    Ok(tag.unwrap_or_default())
}

struct Probe<'a> {
    field: &'a str,
}

impl<'de> DeserializeSeed<'de> for Probe<'_> {
    type Value = Option<String>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for Probe<'_> {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a JSON object with a string {:?} member", self.field)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tag = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.field {
                tag = map.next_value::<Option<String>>()?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(tag)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

pub fn decode_union<U: Union>(bytes: &[u8]) -> Result<Option<U>, Error> {
    U::variant_set().decode(bytes)
}

/// Serialize `value`'s own fields, then append `U::DISCRIMINANT = V::TYPE_NAME`.
pub fn tagged_value<U, V>(value: &V) -> Result<Value, Error>
where
    U: Union,
    V: Variant<U>,
{
    let encoded = serde_json::to_value(value).map_err(|source| Error::Encode {
        variant: V::TYPE_NAME,
        source,
    })?;
    let Value::Object(mut members) = encoded else {
        return Err(Error::NotAnObject {
            variant: V::TYPE_NAME,
        });
    };
    if members.contains_key(U::DISCRIMINANT) {
        return Err(Error::DiscriminantCollision {
            variant: V::TYPE_NAME,
            discriminant: U::DISCRIMINANT,
        });
    }
    members.insert(
        U::DISCRIMINANT.to_owned(),
        Value::String(V::TYPE_NAME.to_owned()),
    );
    Ok(Value::Object(members))
}

pub fn encode_union<U: Union>(value: &U) -> Result<Vec<u8>, Error> {
    let tagged = value.to_tagged_value()?;
    serde_json::to_vec(&tagged).map_err(|source| Error::Encode {
        variant: value.variant_name(),
        source,
    })
}

/// Encode a bare variant exactly as it would appear inside its union.
pub fn encode_variant<U, V>(value: &V) -> Result<Vec<u8>, Error>
where
    U: Union,
    V: Variant<U>,
{
    let tagged = tagged_value::<U, V>(value)?;
    serde_json::to_vec(&tagged).map_err(|source| Error::Encode {
        variant: <V as Record>::TYPE_NAME,
        source,
    })
}

pub fn serialize_union<U, S>(value: &U, serializer: S) -> Result<S::Ok, S::Error>
where
    U: Union,
    S: Serializer,
{
    use serde::ser::Error as _;

    value
        .to_tagged_value()
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Deserialize a present union value. Only works with `serde_json` deserializers.
pub fn deserialize_union<'de, U, D>(deserializer: D) -> Result<U, D::Error>
where
    U: Union,
    D: Deserializer<'de>,
{
    use de::Error as _;

    let raw = Box::<RawValue>::deserialize(deserializer)?;
    match U::variant_set().decode_raw(&raw) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(D::Error::custom(format_args!("{} value is null", U::NAME))),
        Err(err) => Err(D::Error::custom(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_support::{Circle, Count, Labeled, Odd, Shape, Square, Wide};

    fn circle() -> Circle {
        Circle {
            center: [0, 0],
            radius: 5,
        }
    }

    #[test]
    fn encode_appends_discriminant_last() {
        let bytes = encode_union(&Shape::Circle(circle())).unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"Center":[0,0],"Radius":5,"kind":"Circle"}"#
        );
    }

    #[test]
    fn bare_variant_encodes_with_tag() {
        let bytes = encode_variant::<Shape, _>(&circle()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["kind"], "Circle");
        assert_eq!(value["Radius"], 5);
    }

    #[test]
    fn decode_dispatches_on_discriminant() {
        let shape =
            decode_union::<Shape>(br#"{"kind":"Square","TopLeft":[1,1],"Width":2,"Height":2}"#)
                .unwrap();
        assert_eq!(
            shape,
            Some(Shape::Square(Square {
                top_left: [1, 1],
                width: 2,
                height: 2,
            }))
        );
    }

    #[test]
    fn discriminant_position_does_not_matter() {
        let shape = decode_union::<Shape>(br#"{"Radius":5,"kind":"Circle","Center":[0,0]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(shape, Shape::Circle(circle()));
        assert_eq!(shape.variant_name(), "Circle");
    }

    #[test]
    fn round_trip_every_variant() {
        let shapes = [
            Shape::Circle(circle()),
            Shape::Square(Square {
                top_left: [-3, 7],
                width: 10,
                height: 1,
            }),
        ];
        for shape in shapes {
            let bytes = encode_union(&shape).unwrap();
            assert_eq!(decode_union::<Shape>(&bytes).unwrap(), Some(shape));
        }
    }

    #[test]
    fn absent_input_is_not_an_error() {
        for input in [&b""[..], b"null", b"  null\n", b" "] {
            assert_eq!(decode_union::<Shape>(input).unwrap(), None);
        }
    }

    #[test]
    fn unknown_variant_carries_value() {
        let err = decode_union::<Shape>(br#"{"kind":"Hexagon","Sides":6}"#).unwrap_err();
        assert!(matches!(
            &err,
            Error::UnknownVariant { union: "Shape", value } if value == "Hexagon"
        ));
        assert_eq!(
            err.to_string(),
            r#"could not unmarshal Shape JSON: unknown variant "Hexagon""#
        );
    }

    #[test]
    fn missing_or_null_discriminant_is_unknown_empty_variant() {
        for input in [&br#"{"Radius":5}"#[..], br#"{"kind":null,"Radius":5}"#] {
            let err = decode_union::<Shape>(input).unwrap_err();
            assert!(matches!(&err, Error::UnknownVariant { value, .. } if value.is_empty()));
        }
    }

    #[test]
    fn malformed_input_is_a_probe_error() {
        for input in [&b"{not json"[..], b"[1,2]", br#"{"kind":5}"#, br#"{"kind":"Circle"} x"#] {
            let err = decode_union::<Shape>(input).unwrap_err();
            assert!(
                matches!(err, Error::Probe { union: "Shape", discriminant: "kind", .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn variant_shape_mismatch_names_variant() {
        let err = decode_union::<Shape>(br#"{"kind":"Circle","Center":[0,0],"Radius":"big"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Variant { variant: "Circle", .. }));
        assert!(err.to_string().starts_with("unmarshal Circle: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn probe_skips_other_members() {
        let tag = probe_discriminant(
            br#"{"nested":{"kind":"Wrong","deep":[1,{"x":null}]},"kind":"Right"}"#,
            "kind",
        )
        .unwrap();
        assert_eq!(tag, "Right");
    }

    #[test]
    fn probe_keeps_last_repeated_member() {
        let tag = probe_discriminant(br#"{"kind":"A","kind":"B"}"#, "kind").unwrap();
        assert_eq!(tag, "B");
    }

    #[test]
    fn colliding_member_is_rejected_on_encode() {
        let err = encode_union(&Odd::Labeled(Labeled {
            kind: "mine".into(),
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DiscriminantCollision {
                variant: "Labeled",
                discriminant: "kind"
            }
        ));
    }

    #[test]
    fn non_object_variant_is_rejected_on_encode() {
        let err = encode_union(&Odd::Count(Count(3))).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { variant: "Count" }));
    }

    #[test]
    fn integers_beyond_u64_are_rejected_on_encode() {
        let fits = encode_union(&Odd::Wide(Wide {
            value: u64::MAX as u128,
        }))
        .unwrap();
        assert_eq!(
            std::str::from_utf8(&fits).unwrap(),
            r#"{"value":18446744073709551615,"kind":"Wide"}"#
        );

        let err = encode_union(&Odd::Wide(Wide {
            value: u64::MAX as u128 + 1,
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Encode { variant: "Wide", .. }));
    }

    #[test]
    fn registry_keeps_declaration_order_and_ignores_duplicates() {
        let mut set = VariantSet::<Shape>::new().with::<Square>().with::<Circle>();
        set.register::<Square>();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), ["Square", "Circle"]);
        assert!(set.contains("Circle"));
        assert!(!set.contains("circle"));
    }

    #[test]
    fn serde_integration() {
        let shapes = vec![Shape::Circle(circle()), Shape::Square(Square::default())];
        let text = serde_json::to_string(&shapes).unwrap();
        let back: Vec<Shape> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, shapes);

        let missing: Option<Shape> = serde_json::from_str("null").unwrap();
        assert_eq!(missing, None);

        let err = serde_json::from_str::<Shape>(r#"{"kind":"Hexagon"}"#).unwrap_err();
        assert!(err.to_string().contains(r#"unknown variant "Hexagon""#), "{err}");
    }
}
