//! Read operations for the graph.

use std::fmt;

use cinegraph_core::{MovieSelector, PropertyValue, UserSelector};
use serde::Serialize;

use crate::error::Result;
use crate::session::{run, GraphSession, NodeRecord, RelationshipRecord};
use crate::statement::{self, schema};

/// Result of an operation whose query can legitimately match nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    NotFound(NotFound),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound(_) => None,
        }
    }

    pub fn not_found(&self) -> Option<&NotFound> {
        match self {
            Self::Found(_) => None,
            Self::NotFound(nf) => Some(nf),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(v) => Outcome::Found(f(v)),
            Self::NotFound(nf) => Outcome::NotFound(nf),
        }
    }
}

/// What was searched for when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFound {
    pub entity: String,
    /// `name=value` pairs, e.g. `userId=999`.
    pub criteria: Vec<String>,
}

impl NotFound {
    pub fn new<I, S>(entity: impl Into<String>, criteria: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity: entity.into(),
            criteria: criteria.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} found for {}", self.entity, self.criteria.join(", "))
    }
}

/// A user, one of their RATED edges, and the rated movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingMatch {
    pub user: NodeRecord,
    pub rating: RelationshipRecord,
    pub movie: NodeRecord,
    /// RATED edges found between the pair. Above 1 means `rating` is the
    /// first in store order and the others were not returned.
    pub total_matches: usize,
}

// ── Lookups ──────────────────────────────────────────────────────

/// Find every `label` node whose `field` equals `value`.
pub async fn find_by_field<S>(
    session: &S,
    label: &str,
    field: &str,
    value: PropertyValue,
) -> Result<Outcome<Vec<NodeRecord>>>
where
    S: GraphSession + ?Sized,
{
    let criterion = format!("{field}={value}");
    let nodes = lookup(session, label, field, value).await?;
    Ok(found_or(nodes, || NotFound::new(label, [criterion])))
}

/// Find users by id or by name.
pub async fn find_user<S>(session: &S, selector: UserSelector) -> Result<Outcome<Vec<NodeRecord>>>
where
    S: GraphSession + ?Sized,
{
    let field = match selector {
        UserSelector::Id(_) => schema::USER_ID,
        UserSelector::Name(_) => schema::USER_NAME,
    };
    let criterion = format!("{}={}", selector.name(), selector.value());
    let nodes = lookup(session, schema::USER, field, selector.value()).await?;
    Ok(found_or(nodes, || NotFound::new("user", [criterion])))
}

/// Find movies by id or by title.
pub async fn find_movie<S>(session: &S, selector: MovieSelector) -> Result<Outcome<Vec<NodeRecord>>>
where
    S: GraphSession + ?Sized,
{
    let field = match selector {
        MovieSelector::Id(_) => schema::MOVIE_ID,
        MovieSelector::Title(_) => schema::MOVIE_TITLE,
    };
    let criterion = format!("{}={}", selector.name(), selector.value());
    let nodes = lookup(session, schema::MOVIE, field, selector.value()).await?;
    Ok(found_or(nodes, || NotFound::new("movie", [criterion])))
}

/// Find the rating a user gave a movie.
///
/// Only the first row in store order is returned; `total_matches` reports
/// how many RATED edges exist between the pair.
pub async fn find_user_rating<S>(
    session: &S,
    user_id: i64,
    movie_id: i64,
) -> Result<Outcome<RatingMatch>>
where
    S: GraphSession + ?Sized,
{
    let rows = run(session, statement::find_rating(user_id, movie_id)).await?;
    let total_matches = rows.len();

    let Some(mut row) = rows.into_iter().next() else {
        return Ok(Outcome::NotFound(NotFound::new(
            "rating",
            [format!("userId={user_id}"), format!("movieId={movie_id}")],
        )));
    };
    if total_matches > 1 {
        tracing::warn!(
            user_id,
            movie_id,
            total_matches,
            "Several RATED edges between the same user and movie"
        );
    }

    Ok(Outcome::Found(RatingMatch {
        user: row.take_node("u")?,
        rating: row.take_relationship("r")?,
        movie: row.take_node("m")?,
        total_matches,
    }))
}

async fn lookup<S>(
    session: &S,
    label: &str,
    field: &str,
    value: PropertyValue,
) -> Result<Vec<NodeRecord>>
where
    S: GraphSession + ?Sized,
{
    let rows = run(session, statement::find_by_field(label, field, value)?).await?;
    rows.into_iter().map(|mut row| row.take_node("x")).collect()
}

fn found_or<T>(items: Vec<T>, not_found: impl FnOnce() -> NotFound) -> Outcome<Vec<T>> {
    if items.is_empty() {
        Outcome::NotFound(not_found())
    } else {
        Outcome::Found(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let nf = NotFound::new("user", ["userId=999"]);
        assert_eq!(nf.to_string(), "no user found for userId=999");

        let nf = NotFound::new("rating", ["userId=1", "movieId=2"]);
        assert_eq!(nf.to_string(), "no rating found for userId=1, movieId=2");
    }

    #[test]
    fn test_outcome_accessors() {
        let found: Outcome<u8> = Outcome::Found(3);
        assert!(found.is_found());
        assert_eq!(found.clone().map(|v| v * 2), Outcome::Found(6));
        assert_eq!(found.found(), Some(3));

        let missing: Outcome<u8> = Outcome::NotFound(NotFound::new("movie", ["movieId=4"]));
        assert!(!missing.is_found());
        assert_eq!(missing.not_found().map(|nf| nf.entity.as_str()), Some("movie"));
        assert_eq!(missing.found(), None);
    }

    #[test]
    fn test_found_or_never_returns_empty_found() {
        let out: Outcome<Vec<u8>> = found_or(Vec::new(), || NotFound::new("user", ["userId=1"]));
        assert!(matches!(out, Outcome::NotFound(_)));
        let out = found_or(vec![1u8], || NotFound::new("user", ["userId=1"]));
        assert_eq!(out, Outcome::Found(vec![1]));
    }
}
