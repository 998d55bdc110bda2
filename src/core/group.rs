//! Participants and groups as stored on disk and carried in share links.
//!
//! Field names serialise in camelCase so files and links stay readable by
//! the browser version of the picker.

use serde::{Deserialize, Serialize};

/// One participant of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub is_selected: bool,
}

impl Person {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            is_selected: false,
        }
    }

    /// Parse a `NAME[:WEIGHT]` command-line spec.  Weight defaults to 1 and
    /// must be finite (JSON has no encoding for `inf` or `NaN`).
    pub fn parse_spec(spec: &str) -> Option<Self> {
        let (name, weight) = match spec.rsplit_once(':') {
            Some((name, w)) => (
                name,
                w.trim().parse::<f64>().ok().filter(|w| w.is_finite())?,
            ),
            None => (spec, 1.0),
        };
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, weight))
    }
}

/// Payload for creating a group (from the CLI or a share link).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub respect_early_selection: bool,
    pub people: Vec<Person>,
}

/// A stored group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub respect_early_selection: bool,
    pub people: Vec<Person>,
}

impl Group {
    /// People who belong on the wheel.  With `respect_early_selection` set,
    /// anyone already picked sits this one out.
    pub fn available_people(&self) -> impl Iterator<Item = &Person> {
        let skip_selected = self.respect_early_selection;
        self.people
            .iter()
            .filter(move |p| !(skip_selected && p.is_selected))
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.available_people().map(Candidate::from).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.people.iter().filter(|p| p.is_selected).count()
    }

    /// Shareable form: same contents, id kept so re-imports are recognisable.
    pub fn to_request(&self) -> GroupCreateRequest {
        GroupCreateRequest {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            respect_early_selection: self.respect_early_selection,
            people: self.people.clone(),
        }
    }
}

/// A wheel entry: name plus declared weight (clamped when sampled).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub weight: f64,
}

impl From<&Person> for Candidate {
    fn from(p: &Person) -> Self {
        Self {
            name: p.name.clone(),
            weight: p.weight,
        }
    }
}
