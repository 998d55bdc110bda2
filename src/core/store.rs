//! Group persistence — a JSON file plus an explicit read cache.
//!
//! Reads go through the cache; every write re-reads the file, writes the
//! modified list back and invalidates the cache.  Calls that name an unknown
//! group or person are no-ops and report `Ok(false)`.

use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;

use super::group::{Group, GroupCreateRequest};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group store I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("group store {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct GroupStore {
    path: PathBuf,
    cache: Option<Vec<Group>>,
}

impl GroupStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    /// Drop the cached list; the next read hits the file.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn fetch_groups(&mut self) -> StoreResult<&[Group]> {
        if self.cache.is_none() {
            self.cache = Some(self.read_file()?);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Find a group by exact id, falling back to a case-insensitive name.
    pub fn find(&mut self, key: &str) -> StoreResult<Option<Group>> {
        let groups = self.fetch_groups()?;
        let found = groups
            .iter()
            .find(|g| g.id == key)
            .or_else(|| groups.iter().find(|g| g.name.eq_ignore_ascii_case(key)));
        Ok(found.cloned())
    }

    // ── writes ──────────────────────────────────────────────────

    /// Append a new group and return its id.
    pub fn create_group(&mut self, req: GroupCreateRequest) -> StoreResult<String> {
        let mut groups = self.read_file()?;
        let id = req.id.unwrap_or_else(generate_id);
        groups.push(Group {
            id: id.clone(),
            name: req.name,
            respect_early_selection: req.respect_early_selection,
            people: req.people,
        });
        self.commit(&groups)?;
        Ok(id)
    }

    pub fn update_group(&mut self, group_id: &str, data: Group) -> StoreResult<bool> {
        self.modify(|groups| match groups.iter_mut().find(|g| g.id == group_id) {
            Some(g) => {
                *g = data;
                true
            }
            None => false,
        })
    }

    pub fn delete_group(&mut self, group_id: &str) -> StoreResult<bool> {
        self.modify(|groups| {
            let before = groups.len();
            groups.retain(|g| g.id != group_id);
            groups.len() != before
        })
    }

    /// Mark `person_name` in `group_id` as picked.
    pub fn select_person(&mut self, group_id: &str, person_name: &str) -> StoreResult<bool> {
        self.modify(|groups| {
            let person = groups
                .iter_mut()
                .find(|g| g.id == group_id)
                .and_then(|g| g.people.iter_mut().find(|p| p.name == person_name));
            match person {
                Some(p) => {
                    p.is_selected = true;
                    true
                }
                None => false,
            }
        })
    }

    pub fn reset_selections(&mut self, group_id: &str) -> StoreResult<bool> {
        self.modify(|groups| match groups.iter_mut().find(|g| g.id == group_id) {
            Some(g) => {
                for p in &mut g.people {
                    p.is_selected = false;
                }
                true
            }
            None => false,
        })
    }

    // ── file I/O ────────────────────────────────────────────────

    fn modify(&mut self, f: impl FnOnce(&mut Vec<Group>) -> bool) -> StoreResult<bool> {
        let mut groups = self.read_file()?;
        if !f(&mut groups) {
            return Ok(false);
        }
        self.commit(&groups)?;
        Ok(true)
    }

    fn read_file(&self) -> StoreResult<Vec<Group>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn commit(&mut self, groups: &[Group]) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(groups).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), groups = groups.len(), "group store written");
        self.invalidate();
        Ok(())
    }
}

/// `<unix millis>-<9 base36 chars>`.
fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}

/// Default store location (`$XDG_DATA_HOME/dew-luck/groups.json`).
pub fn default_store_path() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".local").join("share")
        });
    data_dir.join("dew-luck").join("groups.json")
}
