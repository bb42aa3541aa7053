//! Entity descriptors for the property graph.
//!
//! A [`Node`] or [`Relationship`] is a disposable description of something
//! to write; the store is the system of record. Both are immutable once
//! built and validated.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{IdentifierKind, ValidationError};
use crate::ident;

// ── Property Values ───────────────────────────────────────────────

/// A scalar or array value stored on a node or relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    List(Vec<PropertyValue>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

// ── Property Maps ─────────────────────────────────────────────────

/// Property map that keeps keys in insertion order.
///
/// Re-inserting an existing key replaces its value without moving it.
/// Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, returning the previous value for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The first property in insertion order.
    pub fn first(&self) -> Option<(&str, &PropertyValue)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_keys(&self) -> Result<(), ValidationError> {
        if self.keys().any(str::is_empty) {
            return Err(ValidationError::EmptyPropertyKey);
        }
        Ok(())
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl IntoIterator for Properties {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ── Nodes ─────────────────────────────────────────────────────────

/// A labeled, property-bearing vertex descriptor.
///
/// Nodes carry no client-side identity. The key field names the property
/// used to find the persisted row again when a relationship is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    labels: Vec<String>,
    properties: Properties,
    key_field: Option<String>,
}

impl Node {
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    /// Build a node from labels and a property map, keyed on the first property.
    ///
    /// `None` for properties is rejected; an empty map is allowed.
    pub fn new<I, S>(labels: I, properties: Option<Properties>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodeBuilder {
            labels: labels.into_iter().map(Into::into).collect(),
            properties,
            key_field: None,
        }
        .build()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Name of the match-key property, if the node has any properties.
    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// The match-key property and its value.
    pub fn key(&self) -> Option<(&str, &PropertyValue)> {
        let field = self.key_field.as_deref()?;
        self.properties.get(field).map(|v| (field, v))
    }

    /// Labels joined into a composite type tag, e.g. `Person:Actor:Director`.
    pub fn type_tag(&self) -> String {
        self.labels.join(":")
    }
}

/// Incremental construction of a [`Node`].
#[derive(Debug, Default, Clone)]
pub struct NodeBuilder {
    labels: Vec<String>,
    properties: Option<Properties>,
    key_field: Option<String>,
}

impl NodeBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key, value);
        self
    }

    /// Replace the property map wholesale.
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Designate the property used to re-locate this node in the store.
    pub fn key(mut self, field: impl Into<String>) -> Self {
        self.key_field = Some(field.into());
        self
    }

    pub fn build(self) -> Result<Node, ValidationError> {
        if self.labels.is_empty() {
            return Err(ValidationError::LabelsRequired);
        }
        let properties = self.properties.ok_or(ValidationError::PropertiesRequired)?;
        for label in &self.labels {
            ident::validate(IdentifierKind::Label, label)?;
        }
        properties.check_keys()?;

        let key_field = match self.key_field {
            Some(field) => {
                ident::validate(IdentifierKind::PropertyKey, &field)?;
                if !properties.contains_key(&field) {
                    return Err(ValidationError::UnknownKeyField(field));
                }
                Some(field)
            }
            None => properties.first().map(|(k, _)| k.to_string()),
        };

        Ok(Node {
            labels: self.labels,
            properties,
            key_field,
        })
    }
}

// ── Relationships ─────────────────────────────────────────────────

/// A typed, directed edge between two node descriptors it borrows.
#[derive(Debug, Clone)]
pub struct Relationship<'a> {
    from: &'a Node,
    to: &'a Node,
    rel_type: String,
    properties: Properties,
}

impl<'a> Relationship<'a> {
    pub fn builder(rel_type: impl Into<String>) -> RelationshipBuilder<'a> {
        RelationshipBuilder {
            from: None,
            to: None,
            rel_type: rel_type.into(),
            properties: Properties::new(),
        }
    }

    pub fn new(
        from: Option<&'a Node>,
        to: Option<&'a Node>,
        rel_type: impl Into<String>,
        properties: Properties,
    ) -> Result<Self, ValidationError> {
        RelationshipBuilder {
            from,
            to,
            rel_type: rel_type.into(),
            properties,
        }
        .build()
    }

    pub fn from_node(&self) -> &'a Node {
        self.from
    }

    pub fn to_node(&self) -> &'a Node {
        self.to
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Incremental construction of a [`Relationship`].
#[derive(Debug, Clone)]
pub struct RelationshipBuilder<'a> {
    from: Option<&'a Node>,
    to: Option<&'a Node>,
    rel_type: String,
    properties: Properties,
}

impl<'a> RelationshipBuilder<'a> {
    pub fn from(mut self, node: &'a Node) -> Self {
        self.from = Some(node);
        self
    }

    pub fn to(mut self, node: &'a Node) -> Self {
        self.to = Some(node);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn build(self) -> Result<Relationship<'a>, ValidationError> {
        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Err(ValidationError::EndpointsRequired);
        };
        if self.rel_type.is_empty() {
            return Err(ValidationError::TypeRequired);
        }
        ident::validate(IdentifierKind::RelationshipType, &self.rel_type)?;
        self.properties.check_keys()?;

        Ok(Relationship {
            from,
            to,
            rel_type: self.rel_type,
            properties: self.properties,
        })
    }
}

// ── Lookup Selectors ──────────────────────────────────────────────

/// Which user to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSelector {
    Id(i64),
    Name(String),
}

impl UserSelector {
    /// Build from the two optional caller inputs; exactly one must be present.
    ///
    /// An empty name counts as absent.
    pub fn from_parts(user_id: Option<i64>, user_name: Option<&str>) -> Result<Self, ValidationError> {
        let user_name = user_name.filter(|s| !s.is_empty());
        match (user_id, user_name) {
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name.to_string())),
            (None, None) => Err(ValidationError::SelectorRequired),
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousSelector {
                first: "userId",
                second: "userName",
            }),
        }
    }

    /// The caller-facing selector name, e.g. `userId`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id(_) => "userId",
            Self::Name(_) => "userName",
        }
    }

    pub fn value(&self) -> PropertyValue {
        match self {
            Self::Id(id) => PropertyValue::Integer(*id),
            Self::Name(name) => PropertyValue::String(name.clone()),
        }
    }
}

/// Which movie to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieSelector {
    Id(i64),
    Title(String),
}

impl MovieSelector {
    /// Build from the two optional caller inputs; exactly one must be present.
    ///
    /// An empty title counts as absent.
    pub fn from_parts(movie_id: Option<i64>, title: Option<&str>) -> Result<Self, ValidationError> {
        let title = title.filter(|s| !s.is_empty());
        match (movie_id, title) {
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(title)) => Ok(Self::Title(title.to_string())),
            (None, None) => Err(ValidationError::SelectorRequired),
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousSelector {
                first: "movieId",
                second: "title",
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Id(_) => "movieId",
            Self::Title(_) => "title",
        }
    }

    pub fn value(&self) -> PropertyValue {
        match self {
            Self::Id(id) => PropertyValue::Integer(*id),
            Self::Title(title) => PropertyValue::String(title.clone()),
        }
    }
}
