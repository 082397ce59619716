//! Data flowing through one setup cycle.
//!
//! [`ConfigState`] is built by the parts' `init` calls, [`Selection`] by the
//! presenter on each button press and [`ViewModel`] by the viewer's render
//! pass.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SetupError, SetupResult};
use crate::page::FieldHandle;

/// Named item lists kept in declaration order.
///
/// Goal sorting depends on the order in which expansions declared their
/// pools, so this is a list of pairs rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools(Vec<(String, Vec<String>)>);

impl Pools {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Replace the list under `kind`, keeping its original position.
    pub fn set(&mut self, kind: &str, items: Vec<String>) {
        if let Some(slot) = self.0.iter_mut().find(|(key, _)| key == kind) {
            slot.1 = items;
        } else {
            self.0.push((kind.to_string(), items));
        }
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(key, _)| key == kind)
            .map(|(_, items)| items.as_slice())
    }

    #[must_use]
    pub fn contains_key(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Whether the list under `kind` holds `item`.
    #[must_use]
    pub fn holds(&self, kind: &str, item: &str) -> bool {
        self.get(kind).is_some_and(|items| items.iter().any(|i| i == item))
    }

    /// Declaration index of `kind`.
    #[must_use]
    pub fn position(&self, kind: &str) -> Option<usize> {
        self.0.iter().position(|(key, _)| key == kind)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, items)| (key.as_str(), items.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for Pools {
    fn from_iter<I: IntoIterator<Item = (S, Vec<String>)>>(iter: I) -> Self {
        let mut pools = Self::new();
        for (kind, items) in iter {
            pools.set(&kind.into(), items);
        }
        pools
    }
}

/// Card and tile pools contributed by the parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents {
    pub boards: Pools,
    pub goals: Pools,
    pub tasks: Pools,
}

/// Logical field name to page element.
#[derive(Debug, Clone, Default)]
pub struct Fields(BTreeMap<String, FieldHandle>);

impl Fields {
    pub fn insert(&mut self, name: &str, handle: FieldHandle) {
        self.0.insert(name.to_string(), handle);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldHandle> {
        self.0.get(name)
    }

    /// Field that must have been registered during init.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingField`] when `name` is not registered.
    pub fn require(&self, name: &str) -> SetupResult<&FieldHandle> {
        self.get(name)
            .ok_or_else(|| SetupError::MissingField(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the parts registered while initialising.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    /// Identifiers of the parts whose checkbox gates their pools.
    pub names: Vec<String>,
    pub contents: Contents,
    /// Mini expansion id to the boards it affects.
    pub mini: Pools,
    pub fields: Fields,
}

impl ConfigState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an active part identifier once.
    pub fn add_name(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Which way the capitol faces on a two-castle board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => f.write_str("N"),
            Self::South => f.write_str("S"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitolPick {
    pub use_capitol: bool,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPick {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub flipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capitol: Option<CapitolPick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cave: Option<bool>,
}

impl BoardPick {
    #[must_use]
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            flipped: false,
            capitol: None,
            cave: None,
        }
    }

    /// Whether the board shows a cave; a board the caves never touched has none.
    #[must_use]
    pub fn has_cave(&self) -> bool {
        self.cave.unwrap_or(false)
    }
}

/// A goal or task card; an empty task slot has empty name and type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPick {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CardPick {
    #[must_use]
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandPick {
    pub use_island: bool,
    pub flipped: bool,
}

/// The random selection for one button press.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boards: Vec<BoardPick>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<CardPick>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<CardPick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub island: Option<IslandPick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_player: Option<u32>,
}

/// A value and class pair ready to be written into a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub value: String,
    pub class_name: String,
}

impl FieldView {
    #[must_use]
    pub fn new(value: &str, class_name: &str) -> Self {
        Self {
            value: value.to_string(),
            class_name: class_name.to_string(),
        }
    }
}

/// Board display with the suffixes decorating expansions add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub value: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cave: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capitol: Option<String>,
}

impl BoardView {
    /// Board text with every decoration, caves before capitol.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}{}{}",
            self.value,
            self.cave.as_deref().unwrap_or_default(),
            self.capitol.as_deref().unwrap_or_default()
        )
    }
}

/// Display form of a [`Selection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boards: Vec<BoardView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<FieldView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<FieldView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub island: Option<FieldView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_player: Option<String>,
}
