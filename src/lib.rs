//! JSON codecs for closed sets of record types.
//!
//! A *union* is a set of variant records serialized as plain JSON objects plus
//! one discriminant member naming the variant. A *container* is a record whose
//! fields hold union values (one, a list, or a string-keyed map of them) and is
//! decoded in two phases: raw capture first, variant dispatch second.
//!
//! The crate has two halves:
//!
//! - the runtime codec ([`VariantSet`], [`decode_union`], [`decode_container`], ..),
//!   which generated code calls into;
//! - the generator ([`generate`], [`write_codec_file`]), which turns an
//!   [`inventory::Inventory`] into the glue code for a concrete set of types.

pub mod codec;
pub mod codegen;
pub mod error;
pub mod inventory;
pub mod ir;
pub mod lower;
pub mod path_de;

use std::io::Write;
use std::path::Path;

pub use codec::{
    Container, DecodeFn, Record, Union, Variant, VariantSet, decode_container, decode_union,
    deserialize_container, deserialize_union, encode_union, encode_variant, is_absent,
    probe_discriminant, resolve_keyed, resolve_scalar, resolve_sequence, serialize_union,
    tagged_value,
};
pub use error::{Error, FieldPath, GenerateError, Segment};
pub use inventory::{ContainerDecl, FieldDecl, Inventory, PolyFieldDecl, PolyKind, UnionDecl};

/// Re-exports used by generated code, so that users only need to depend on this crate.
#[doc(hidden)]
pub mod __private {
    pub use indexmap::IndexMap;
    pub use once_cell::sync::Lazy;
    pub use serde;
    pub use serde_json::Value;
    pub use serde_json::value::RawValue;
}

/// Validate the declarations and render their codecs as Rust source.
pub fn render(
    package: &str,
    unions: &[UnionDecl],
    containers: &[ContainerDecl],
) -> Result<String, GenerateError> {
    let plan = lower::lower_to_ir(package, unions, containers)?;
    let mut codegen = codegen::Codegen::new();
    codegen.emit(&plan);
    codegen.into_string()
}

/// Render codecs and write them to `out`.
///
/// Nothing is written unless rendering succeeds.
pub fn generate<W: Write>(
    out: &mut W,
    package: &str,
    unions: &[UnionDecl],
    containers: &[ContainerDecl],
) -> Result<(), GenerateError> {
    let code = render(package, unions, containers)?;
    out.write_all(code.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Render codecs into the file at `path`, creating parent directories as needed.
///
/// The file is written next to its destination under a temporary name and
/// renamed into place, so a failure leaves any previous file untouched.
pub fn write_codec_file(
    path: impl AsRef<Path>,
    package: &str,
    unions: &[UnionDecl],
    containers: &[ContainerDecl],
) -> Result<(), GenerateError> {
    let path = path.as_ref();
    let code = render(package, unions, containers)?;

    let file_error = |source| GenerateError::File {
        path: path.to_owned(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(file_error)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(file_error)?;
    temp.write_all(code.as_bytes()).map_err(file_error)?;
    temp.as_file().sync_all().map_err(file_error)?;
    temp.persist(path).map_err(|err| file_error(err.error))?;

    tracing::debug!(path = %path.display(), bytes = code.len(), "codec file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> UnionDecl {
        UnionDecl::new("Shape", "kind", ["Circle", "Square"])
    }

    #[test]
    fn generate_writes_rendered_code() {
        let mut out = Vec::new();
        generate(&mut out, "crate::shapes", &[shape()], &[]).unwrap();
        let code = String::from_utf8(out).unwrap();
        assert!(code.starts_with(codegen::HEADER));
        assert!(code.contains("pub enum Shape"));
    }

    #[test]
    fn generate_writes_nothing_on_error() {
        let mut out = Vec::new();
        let err = generate(&mut out, "", &[shape()], &[]).unwrap_err();
        assert!(matches!(err, GenerateError::MissingPackage));
        assert!(out.is_empty());
    }
}
