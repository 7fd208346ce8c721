//! Elements and entities.
//!
//! An [`Element`] is a named [`Value`], the atomic field of a stored record.
//! An [`Entity`] is a logical name (collection, table or bucket) plus an
//! ordered list of elements. Element names need not be unique; lookups by
//! name return the first match in storage order.
//!
//! # Examples
//!
//! ```
//! use tessera_model::entity::{Element, Entity};
//!
//! let entity = Entity::new("person")
//!     .unwrap()
//!     .with_element(Element::new("name", "Ada").unwrap())
//!     .with_element(Element::new("age", 10).unwrap());
//!
//! assert_eq!(entity.len(), 2);
//! assert_eq!(entity.find_value::<String>("name").unwrap().unwrap(), "Ada");
//! assert_eq!(entity.find_value::<String>("age").unwrap().unwrap(), "10");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoercionError, ModelError, ModelResult};
use crate::value::{FromValue, IntoValue, Value, convert};

/// A named value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawElement")]
pub struct Element {
    name: String,
    value: Value,
}

#[derive(Deserialize)]
struct RawElement {
    name: String,
    value: Value,
}

impl TryFrom<RawElement> for Element {
    type Error = ModelError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        Element::new(raw.name, raw.value)
    }
}

impl Element {
    /// Creates an element.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NullArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> ModelResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::null_argument("name"));
        }
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// Creates an element from any raw representation accepted by
    /// [`Value::of`].
    pub fn of(name: impl Into<String>, raw: impl IntoValue) -> ModelResult<Self> {
        Self::new(name, raw.into_value()?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Reads the value as `T`.
    pub fn get<T: FromValue>(&self) -> Result<T, CoercionError> {
        self.value.get()
    }

    /// Returns a new element with the same name and a different value.
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
        }
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A named, ordered collection of elements representing one stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity")]
pub struct Entity {
    name: String,
    elements: Vec<Element>,
}

#[derive(Deserialize)]
struct RawEntity {
    name: String,
    #[serde(default)]
    elements: Vec<Element>,
}

impl TryFrom<RawEntity> for Entity {
    type Error = ModelError;

    fn try_from(raw: RawEntity) -> Result<Self, Self::Error> {
        let mut entity = Entity::new(raw.name)?;
        entity.add_all(raw.elements);
        Ok(entity)
    }
}

impl Entity {
    /// Creates an empty entity.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NullArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::null_argument("entity name"));
        }
        Ok(Self {
            name,
            elements: Vec::new(),
        })
    }

    /// Builds an entity from a flat name to raw value structure.
    ///
    /// Fields are added in iteration order. A `None` field fails with
    /// [`CoercionError::NullElement`].
    pub fn from_map<K, V, I>(name: impl Into<String>, fields: I) -> ModelResult<Self>
    where
        K: Into<String>,
        V: IntoValue,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entity = Entity::new(name)?;
        for (key, raw) in fields {
            let key = key.into();
            let value = raw.into_value().map_err(|err| match err {
                ModelError::NullArgument { .. } => CoercionError::NullElement {
                    position: key.clone(),
                }
                .into(),
                other => other,
            })?;
            entity.add(Element::new(key, value)?);
        }
        Ok(entity)
    }

    /// Builds an entity from a JSON object, as returned by document stores.
    ///
    /// Top-level `null` fields are treated as absent and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if `json` is not an object.
    pub fn from_json(name: impl Into<String>, json: serde_json::Value) -> ModelResult<Self> {
        match json {
            serde_json::Value::Object(fields) => Entity::from_map(
                name,
                fields.into_iter().filter(|(_, field)| !field.is_null()),
            ),
            other => Err(ModelError::configuration(format!(
                "expected a JSON object to build an entity, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an element and returns the entity.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Appends an element.
    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Appends a named value.
    pub fn add_value(&mut self, name: impl Into<String>, raw: impl IntoValue) -> ModelResult<()> {
        self.add(Element::of(name, raw)?);
        Ok(())
    }

    pub fn add_all(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    /// Removes every element with the given name. Returns true if any was
    /// removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|element| element.name() != name);
        self.elements.len() != before
    }

    /// Replaces the first element with the same name, or appends it.
    pub fn set(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.name() == element.name()) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    /// Returns the first element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.name() == name)
    }

    /// Reads the first element with the given name as `T`.
    pub fn find_value<T: FromValue>(&self, name: &str) -> Option<Result<T, CoercionError>> {
        self.find(name).map(Element::get)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Returns element names in storage order, duplicates included.
    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().map(Element::name).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Returns the elements as a map. The first element wins on duplicate
    /// names.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        for element in &self.elements {
            map.entry(element.name.clone())
                .or_insert_with(|| element.value.clone());
        }
        map
    }

    /// Returns the elements as a plain JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.to_map()
                .iter()
                .map(|(name, value)| (name.clone(), convert::convert(value)))
                .collect(),
        )
    }

    /// Keeps only the named elements, in their storage order.
    pub fn project(&self, fields: &[String]) -> Entity {
        Entity {
            name: self.name.clone(),
            elements: self
                .elements
                .iter()
                .filter(|element| fields.iter().any(|f| f == element.name()))
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "}}")
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
