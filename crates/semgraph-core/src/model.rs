//! Node and edge tables.
//!
//! Both tables are plain row vectors. Every row exposes its fields, its aesthetics and the
//! statistics of the parameter it came from as named [`Cell`]s, which is what label expressions,
//! predicates and selectors read.

use crate::error::{Error, Result};
use crate::params::ParameterRow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a node's bounding box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Fixed enumeration order, also used for tie-breaking.
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(Error::UnknownName {
                kind: "side",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrow {
    None,
    #[default]
    Last,
    Both,
}

impl Arrow {
    pub fn as_str(self) -> &'static str {
        match self {
            Arrow::None => "none",
            Arrow::Last => "last",
            Arrow::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rect,
    Oval,
}

impl NodeShape {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Rect => "rect",
            NodeShape::Oval => "oval",
        }
    }
}

impl FromStr for NodeShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rect" | "rectangle" | "square" => Ok(NodeShape::Rect),
            "oval" | "ellipse" | "circle" => Ok(NodeShape::Oval),
            _ => Err(Error::UnknownName {
                kind: "shape",
                value: s.to_string(),
            }),
        }
    }
}

/// Visual attribute keys. `label_*` keys style the label, the rest style the shape or line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aesthetic {
    Colour,
    Fill,
    Linetype,
    Size,
    Alpha,
    LabelColour,
    LabelFill,
    LabelSize,
    LabelAlpha,
}

impl Aesthetic {
    pub const ALL: [Aesthetic; 9] = [
        Aesthetic::Colour,
        Aesthetic::Fill,
        Aesthetic::Linetype,
        Aesthetic::Size,
        Aesthetic::Alpha,
        Aesthetic::LabelColour,
        Aesthetic::LabelFill,
        Aesthetic::LabelSize,
        Aesthetic::LabelAlpha,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Aesthetic::Colour => "colour",
            Aesthetic::Fill => "fill",
            Aesthetic::Linetype => "linetype",
            Aesthetic::Size => "size",
            Aesthetic::Alpha => "alpha",
            Aesthetic::LabelColour => "label_colour",
            Aesthetic::LabelFill => "label_fill",
            Aesthetic::LabelSize => "label_size",
            Aesthetic::LabelAlpha => "label_alpha",
        }
    }

    /// Value a row takes when the aesthetic is first introduced into a table.
    pub fn default_value(self) -> AesValue {
        match self {
            Aesthetic::Colour | Aesthetic::LabelColour => AesValue::from("black"),
            Aesthetic::Fill | Aesthetic::LabelFill => AesValue::from("white"),
            Aesthetic::Linetype | Aesthetic::Size | Aesthetic::Alpha | Aesthetic::LabelAlpha => {
                AesValue::Number(1.0)
            }
            Aesthetic::LabelSize => AesValue::Number(4.0),
        }
    }
}

impl fmt::Display for Aesthetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aesthetic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace("color", "colour");
        Aesthetic::ALL
            .into_iter()
            .find(|a| a.as_str() == key)
            .ok_or_else(|| Error::UnknownName {
                kind: "aesthetic",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AesValue {
    Number(f64),
    Text(String),
}

impl AesValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AesValue::Number(v) => Some(*v),
            AesValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AesValue::Text(s) => Some(s.as_str()),
            AesValue::Number(_) => None,
        }
    }

    /// Parses CLI-style values: numbers stay numeric, everything else is text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => AesValue::Number(v),
            _ => AesValue::Text(raw.to_string()),
        }
    }
}

impl From<&str> for AesValue {
    fn from(value: &str) -> Self {
        AesValue::Text(value.to_string())
    }
}

impl From<String> for AesValue {
    fn from(value: String) -> Self {
        AesValue::Text(value)
    }
}

impl From<f64> for AesValue {
    fn from(value: f64) -> Self {
        AesValue::Number(value)
    }
}

impl From<AesValue> for Cell {
    fn from(value: AesValue) -> Self {
        match value {
            AesValue::Number(v) => Cell::Number(v),
            AesValue::Text(s) => Cell::Text(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aesthetics(IndexMap<Aesthetic, AesValue>);

impl Aesthetics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: Aesthetic) -> Option<&AesValue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: Aesthetic) -> bool {
        self.0.contains_key(&key)
    }

    pub fn set(&mut self, key: Aesthetic, value: impl Into<AesValue>) {
        self.0.insert(key, value.into());
    }

    pub fn with(mut self, key: Aesthetic, value: impl Into<AesValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Text value of `key`, falling back to the aesthetic default.
    pub fn text_or_default(&self, key: Aesthetic) -> String {
        match self.get(key).cloned().unwrap_or_else(|| key.default_value()) {
            AesValue::Text(s) => s,
            AesValue::Number(v) => v.to_string(),
        }
    }

    /// Numeric value of `key`, falling back to the aesthetic default.
    pub fn number_or_default(&self, key: Aesthetic) -> f64 {
        self.get(key)
            .and_then(AesValue::as_f64)
            .or_else(|| key.default_value().as_f64())
            .unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Aesthetic, &AesValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// A single column value read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    fn opt_number(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Number)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Common surface of node and edge rows.
pub trait Row {
    /// Reads a named column; unknown names read as [`Cell::Missing`].
    fn column(&self, name: &str) -> Cell;
    fn aesthetics(&self) -> &Aesthetics;
    fn aesthetics_mut(&mut self) -> &mut Aesthetics;
    fn set_label(&mut self, label: String);
}

fn aesthetic_column(aes: &Aesthetics, name: &str) -> Option<Cell> {
    let key = name.parse::<Aesthetic>().ok()?;
    Some(aes.get(key).cloned().map_or(Cell::Missing, Cell::from))
}

fn source_column(source: Option<&ParameterRow>, name: &str) -> Cell {
    source.map_or(Cell::Missing, |row| row.column(name))
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub shape: NodeShape,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default)]
    pub aes: Aesthetics,
    /// Parameter row the node's statistics come from (its mean, when requested).
    #[serde(default)]
    pub source: Option<ParameterRow>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            shape: NodeShape::Rect,
            x: None,
            y: None,
            show: true,
            aes: Aesthetics::new(),
            source: None,
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

impl Row for Node {
    fn column(&self, name: &str) -> Cell {
        match name {
            "name" => Cell::text(&self.name),
            "shape" => Cell::text(self.shape.as_str()),
            "label" => Cell::text(&self.label),
            "x" => Cell::opt_number(self.x),
            "y" => Cell::opt_number(self.y),
            "show" => Cell::Bool(self.show),
            other => aesthetic_column(&self.aes, other)
                .unwrap_or_else(|| source_column(self.source.as_ref(), other)),
        }
    }

    fn aesthetics(&self) -> &Aesthetics {
        &self.aes
    }

    fn aesthetics_mut(&mut self) -> &mut Aesthetics {
        &mut self.aes
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub arrow: Arrow,
    #[serde(default)]
    pub label: String,
    /// Curve bend in degrees; only non-directional (covariance) edges carry one.
    #[serde(default)]
    pub curvature: Option<f64>,
    #[serde(default)]
    pub connect_from: Option<Side>,
    #[serde(default)]
    pub connect_to: Option<Side>,
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default)]
    pub aes: Aesthetics,
    #[serde(default)]
    pub source: Option<ParameterRow>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            arrow: Arrow::Last,
            label: String::new(),
            curvature: None,
            connect_from: None,
            connect_to: None,
            show: true,
            aes: Aesthetics::new(),
            source: None,
        }
    }

    pub fn with_arrow(mut self, arrow: Arrow) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_curvature(mut self, curvature: f64) -> Self {
        self.curvature = Some(curvature);
        self
    }

    pub fn connect(mut self, from: Option<Side>, to: Option<Side>) -> Self {
        self.connect_from = from;
        self.connect_to = to;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl Row for Edge {
    fn column(&self, name: &str) -> Cell {
        match name {
            "from" => Cell::text(&self.from),
            "to" => Cell::text(&self.to),
            "arrow" => Cell::text(self.arrow.as_str()),
            "label" => Cell::text(&self.label),
            "curvature" => Cell::opt_number(self.curvature),
            "connect_from" => self.connect_from.map_or(Cell::Missing, |s| Cell::text(s.as_str())),
            "connect_to" => self.connect_to.map_or(Cell::Missing, |s| Cell::text(s.as_str())),
            "show" => Cell::Bool(self.show),
            other => aesthetic_column(&self.aes, other)
                .unwrap_or_else(|| source_column(self.source.as_ref(), other)),
        }
    }

    fn aesthetics(&self) -> &Aesthetics {
        &self.aes
    }

    fn aesthetics_mut(&mut self) -> &mut Aesthetics {
        &mut self.aes
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

/// An ordered table of rows. Transformations return new tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<R> {
    rows: Vec<R>,
}

pub type NodeTable = Table<Node>;
pub type EdgeTable = Table<Edge>;

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Keeps the rows for which `keep` returns true.
    pub fn filter(self, mut keep: impl FnMut(&R) -> bool) -> Self {
        Self {
            rows: self.rows.into_iter().filter(|r| keep(r)).collect(),
        }
    }

    pub fn map(self, f: impl FnMut(R) -> R) -> Self {
        Self {
            rows: self.rows.into_iter().map(f).collect(),
        }
    }

    pub fn push(mut self, row: R) -> Self {
        self.rows.push(row);
        self
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl NodeTable {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.rows.iter().find(|n| n.name == name)
    }
}

impl EdgeTable {
    pub fn between(&self, from: &str, to: &str) -> Option<&Edge> {
        self.rows.iter().find(|e| e.from == from && e.to == to)
    }
}
