use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Node, Shape};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    #[serde(rename = "P0")]
    pub p0: [i32; 2],
    #[serde(rename = "P1")]
    pub p1: [i32; 2],
    #[serde(rename = "P2")]
    pub p2: [i32; 2],
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "Vertices")]
    pub vertices: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(rename = "Center")]
    pub center: [i32; 2],
    #[serde(rename = "Radius")]
    pub radius: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub value: i64,
}

// Containers get their serde impls from the generated codec.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub tags: Vec<String>,
    pub focus: Option<Shape>,
    pub shapes: Vec<Shape>,
    pub layers: BTreeMap<String, Shape>,
}

/// Both a container and a variant of [`Node`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    pub label: String,
    pub children: Vec<Node>,
}
