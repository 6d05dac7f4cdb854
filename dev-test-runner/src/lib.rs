//! Compiles the codecs generated from `shapes.json` so tests can run against them.

pub mod shapes;

mod codec {
    include!(concat!(env!("OUT_DIR"), "/shapes_codec.rs"));
}

pub use codec::{Node, Shape};
