//! Cypher statement builder.
//!
//! Renders the four statement shapes this crate ever sends. Property values
//! are always bound as parameters; labels, relationship types and property
//! keys are interpolated and must already have passed
//! [`ident::validate`](cinegraph_core::ident::validate).

use std::fmt;

use cinegraph_core::{ident, IdentifierKind, Node, Properties, PropertyValue, Relationship};

use crate::error::Result;
use crate::locator::MatchKey;

/// Labels, keys and relationship type of the movie-rating schema.
pub mod schema {
    pub const USER: &str = "User";
    pub const MOVIE: &str = "Movie";
    pub const RATED: &str = "RATED";

    pub const USER_ID: &str = "userID";
    pub const USER_NAME: &str = "name";
    pub const MOVIE_ID: &str = "movieID";
    pub const MOVIE_TITLE: &str = "title";
}

// ── Parameters ───────────────────────────────────────────────────

/// A bound parameter: a single value or a whole property map.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Value(PropertyValue),
    Map(Properties),
}

/// Named parameters in binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Parameter)>,
}

impl Parameters {
    fn bind(mut self, name: &str, param: Parameter) -> Self {
        self.entries.push((name.to_string(), param));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries
            .iter()
            .find_map(|(n, p)| (n == name).then_some(p))
    }

    /// The parameter as a single value, if it is one.
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        match self.get(name) {
            Some(Parameter::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// The parameter as a property map, if it is one.
    pub fn map(&self, name: &str) -> Option<&Properties> {
        match self.get(name) {
            Some(Parameter::Map(m)) => Some(m),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Statements ───────────────────────────────────────────────────

/// Which shape a statement has, with the structural parts it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    CreateNode {
        labels: Vec<String>,
    },
    CreateRelationship {
        from: MatchKey,
        to: MatchKey,
        rel_type: String,
    },
    FindByField {
        label: String,
        field: String,
    },
    FindRating,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateNode { .. } => "create_node",
            Self::CreateRelationship { .. } => "create_relationship",
            Self::FindByField { .. } => "find_by_field",
            Self::FindRating => "find_rating",
        };
        f.write_str(s)
    }
}

/// What a RETURN column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Node,
    Relationship,
    Value,
}

/// A parameterized statement ready for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    parameters: Parameters,
    kind: StatementKind,
}

impl Statement {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    /// RETURN columns in order, with what each holds.
    pub fn columns(&self) -> &'static [(&'static str, ColumnKind)] {
        match self.kind {
            StatementKind::CreateNode { .. } => &[("n", ColumnKind::Node)],
            StatementKind::CreateRelationship { .. } => &[("type(r)", ColumnKind::Value)],
            StatementKind::FindByField { .. } => &[("x", ColumnKind::Node)],
            StatementKind::FindRating => &[
                ("u", ColumnKind::Node),
                ("r", ColumnKind::Relationship),
                ("m", ColumnKind::Node),
            ],
        }
    }

    pub(crate) fn into_parts(self) -> (String, Parameters) {
        (self.text, self.parameters)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ── Builders ─────────────────────────────────────────────────────

/// `CREATE (n:<labels>) SET n += $properties RETURN n`
pub fn create_node(node: &Node) -> Statement {
    Statement {
        text: format!(
            "CREATE (n:{}) SET n += $properties RETURN n",
            node.type_tag()
        ),
        parameters: Parameters::default()
            .bind("properties", Parameter::Map(node.properties().clone())),
        kind: StatementKind::CreateNode {
            labels: node.labels().to_vec(),
        },
    }
}

/// Match both endpoints by their keys and create one typed edge between them.
pub fn create_relationship(from: &MatchKey, to: &MatchKey, rel: &Relationship<'_>) -> Statement {
    let text = format!(
        "MATCH (a:{}), (b:{}) WHERE a.{} = $valA AND b.{} = $valB \
         CREATE (a)-[r:{}]->(b) SET r += $relProperties RETURN type(r)",
        from.type_tag(),
        to.type_tag(),
        from.field,
        to.field,
        rel.rel_type(),
    );

    Statement {
        text,
        parameters: Parameters::default()
            .bind("valA", Parameter::Value(from.value.clone()))
            .bind("valB", Parameter::Value(to.value.clone()))
            .bind("relProperties", Parameter::Map(rel.properties().clone())),
        kind: StatementKind::CreateRelationship {
            from: from.clone(),
            to: to.clone(),
            rel_type: rel.rel_type().to_string(),
        },
    }
}

/// `MATCH (x:<label>) WHERE x.<field> = $value RETURN x`
pub fn find_by_field(label: &str, field: &str, value: PropertyValue) -> Result<Statement> {
    ident::validate(IdentifierKind::Label, label)?;
    ident::validate(IdentifierKind::PropertyKey, field)?;

    Ok(Statement {
        text: format!("MATCH (x:{label}) WHERE x.{field} = $value RETURN x"),
        parameters: Parameters::default().bind("value", Parameter::Value(value)),
        kind: StatementKind::FindByField {
            label: label.to_string(),
            field: field.to_string(),
        },
    })
}

/// Join a user and a movie through their RATED edges.
pub fn find_rating(user_id: i64, movie_id: i64) -> Statement {
    use schema::*;

    Statement {
        text: format!(
            "MATCH (u:{USER})-[r:{RATED}]->(m:{MOVIE}) \
             WHERE u.{USER_ID} = $userId AND m.{MOVIE_ID} = $movieId RETURN u, r, m"
        ),
        parameters: Parameters::default()
            .bind("userId", Parameter::Value(user_id.into()))
            .bind("movieId", Parameter::Value(movie_id.into())),
        kind: StatementKind::FindRating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator;

    fn user1() -> Node {
        Node::builder()
            .label("User")
            .property("userID", 1)
            .property("name", "user1")
            .build()
            .unwrap()
    }

    fn movie1() -> Node {
        Node::builder()
            .label("Movie")
            .property("movieID", 1)
            .property("title", "Toy Story")
            .property("genres", vec!["Animation", "Comedy"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_node_shape() {
        let node = Node::builder()
            .labels(["Person", "Actor", "Director"])
            .property("name", "Clint")
            .property("born", 1930)
            .build()
            .unwrap();

        let stmt = create_node(&node);
        assert_eq!(
            stmt.text(),
            "CREATE (n:Person:Actor:Director) SET n += $properties RETURN n"
        );
        assert_eq!(stmt.parameters().len(), 1);
        // Passed through unchanged: same keys, same order, same values.
        assert_eq!(stmt.parameters().map("properties"), Some(node.properties()));
    }

    #[test]
    fn test_create_node_text_independent_of_property_count() {
        let small = Node::new(["User"], Some(Properties::new().with("a", 1))).unwrap();
        let large = Node::new(
            ["User"],
            Some(Properties::new().with("a", 1).with("b", 2).with("c", 3)),
        )
        .unwrap();
        assert_eq!(create_node(&small).text(), create_node(&large).text());
    }

    #[test]
    fn test_create_relationship_shape() {
        let (user, movie) = (user1(), movie1());
        let rel = Relationship::builder("RATED")
            .from(&user)
            .to(&movie)
            .property("rating", 5)
            .property("timestamp", 105)
            .build()
            .unwrap();
        let from = locator::locate(&user).unwrap();
        let to = locator::locate(&movie).unwrap();

        let stmt = create_relationship(&from, &to, &rel);
        assert_eq!(
            stmt.text(),
            "MATCH (a:User), (b:Movie) WHERE a.userID = $valA AND b.movieID = $valB \
             CREATE (a)-[r:RATED]->(b) SET r += $relProperties RETURN type(r)"
        );
        assert_eq!(stmt.parameters().value("valA"), Some(&PropertyValue::Integer(1)));
        assert_eq!(stmt.parameters().value("valB"), Some(&PropertyValue::Integer(1)));
        assert_eq!(
            stmt.parameters().map("relProperties"),
            Some(&Properties::new().with("rating", 5).with("timestamp", 105))
        );
        assert_eq!(stmt.columns(), &[("type(r)", ColumnKind::Value)]);
    }

    #[test]
    fn test_find_by_field_shape() {
        let stmt = find_by_field("Movie", "title", "Heat".into()).unwrap();
        assert_eq!(
            stmt.text(),
            "MATCH (x:Movie) WHERE x.title = $value RETURN x"
        );
        assert_eq!(
            stmt.parameters().value("value"),
            Some(&PropertyValue::String("Heat".to_string()))
        );
    }

    #[test]
    fn test_find_by_field_rejects_unsafe_identifiers() {
        assert!(find_by_field("User) DETACH DELETE (x", "name", "a".into()).is_err());
        assert!(find_by_field("User", "name = 1 OR 1", "a".into()).is_err());
    }

    #[test]
    fn test_find_rating_shape() {
        let stmt = find_rating(1, 42);
        assert_eq!(
            stmt.text(),
            "MATCH (u:User)-[r:RATED]->(m:Movie) \
             WHERE u.userID = $userId AND m.movieID = $movieId RETURN u, r, m"
        );
        assert_eq!(stmt.parameters().value("userId"), Some(&PropertyValue::Integer(1)));
        assert_eq!(stmt.parameters().value("movieId"), Some(&PropertyValue::Integer(42)));
        assert_eq!(stmt.columns().len(), 3);
        assert_eq!(stmt.kind().to_string(), "find_rating");
    }

    #[test]
    fn test_property_values_never_interpolated() {
        let node = Node::builder()
            .label("User")
            .property("name", "x\"}) DETACH DELETE (n")
            .build()
            .unwrap();
        let stmt = create_node(&node);
        assert!(!stmt.text().contains("DETACH"));
    }
}
