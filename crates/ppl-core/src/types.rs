//! Core types for ppl-core.
//!
//! This module defines the [`Person`] record returned by search backends and
//! the [`Selection`] set of chosen people. Email is the matching key for
//! everything selection-related; `id` is carried along but never compared.

use serde::{Deserialize, Serialize};

/// A person record as returned by a search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Opaque backend identifier. Not used for matching.
    pub id: String,
    /// Display name, used as the chip and option label.
    pub name: String,
    /// Unique matching key for selection and result filtering.
    pub email: String,
    /// Optional short handle shown next to the email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Secondary option line: `alias • email`, or just the email.
    pub fn detail(&self) -> String {
        match self.alias {
            Some(ref alias) => format!("{alias} • {}", self.email),
            None => self.email.clone(),
        }
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Ordered set of selected people, unique by email.
///
/// Insertion order is preserved because chips render in selection order.
/// Every constructor and mutation keeps the first occurrence of an email and
/// drops later ones, so no two entries ever share an email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    people: Vec<Person>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from an arbitrary list, dropping duplicate emails.
    pub fn from_people(people: impl IntoIterator<Item = Person>) -> Self {
        let mut selection = Self::new();
        selection.replace(people);
        selection
    }

    /// Replace the whole set, dropping duplicate emails (first one wins).
    pub fn replace(&mut self, people: impl IntoIterator<Item = Person>) {
        let mut next: Vec<Person> = Vec::new();
        for person in people {
            if !next.iter().any(|p| p.email == person.email) {
                next.push(person);
            }
        }
        self.people = next;
    }

    /// Remove the entry whose email matches. Returns `true` if one was removed.
    pub fn remove(&mut self, email: &str) -> bool {
        let before = self.people.len();
        self.people.retain(|p| p.email != email);
        self.people.len() != before
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.people.iter().any(|p| p.email == email)
    }

    pub fn as_slice(&self) -> &[Person] {
        &self.people
    }

    pub fn to_vec(&self) -> Vec<Person> {
        self.people.clone()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.people.iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Person;
    type IntoIter = std::slice::Iter<'a, Person>;

    fn into_iter(self) -> Self::IntoIter {
        self.people.iter()
    }
}

/// Drop every result whose email is already in `selection`, keeping order.
pub fn filter_unselected(results: Vec<Person>, selection: &Selection) -> Vec<Person> {
    results
        .into_iter()
        .filter(|p| !selection.contains_email(&p.email))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn person(email: &str) -> Person {
        Person::new(email, email.split('@').next().unwrap_or(email), email)
    }

    #[test]
    fn from_people_drops_duplicate_emails() {
        let sel = Selection::from_people([person("a@x.com"), person("b@x.com"), person("a@x.com")]);
        let emails: Vec<_> = sel.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn first_duplicate_wins() {
        let first = Person::new("1", "First", "a@x.com");
        let second = Person::new("2", "Second", "a@x.com");
        let sel = Selection::from_people([first.clone(), second]);
        assert_eq!(sel.as_slice(), &[first]);
    }

    #[test]
    fn remove_absent_email_is_noop() {
        let mut sel = Selection::from_people([person("a@x.com")]);
        let before = sel.clone();
        assert!(!sel.remove("nobody@x.com"));
        assert_eq!(sel, before);
    }

    #[test]
    fn remove_present_email() {
        let mut sel = Selection::from_people([person("a@x.com"), person("b@x.com")]);
        assert!(sel.remove("a@x.com"));
        assert_eq!(sel.len(), 1);
        assert!(!sel.contains_email("a@x.com"));
    }

    #[test]
    fn filter_keeps_order_and_drops_selected() {
        let sel = Selection::from_people([person("b@x.com")]);
        let out = filter_unselected(
            vec![person("a@x.com"), person("b@x.com"), person("c@x.com")],
            &sel,
        );
        let emails: Vec<_> = out.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com"]);
    }

    #[test]
    fn detail_includes_alias_when_present() {
        let p = Person::new("1", "Ann", "ann@x.com").with_alias("annie");
        assert_eq!(p.detail(), "annie • ann@x.com");
        assert_eq!(person("bo@x.com").detail(), "bo@x.com");
    }

    #[test]
    fn alias_is_optional_in_json() {
        let p: Person =
            serde_json::from_str(r#"{"id":"7","name":"Ann","email":"ann@x.com"}"#).unwrap();
        assert_eq!(p.alias, None);
    }
}
