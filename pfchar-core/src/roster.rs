//! A set of independent characters for hosts that serve concurrent requests.
//!
//! Each character sits behind its own lock, so commands against one
//! character are serialized while different characters never contend.

use crate::character::{Character, CharacterId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared handle to one character.
pub type SharedCharacter = Arc<RwLock<Character>>;

#[derive(Debug, Default)]
pub struct Roster {
    characters: HashMap<CharacterId, SharedCharacter>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character, keyed by its id. Replaces any character with the same id.
    pub fn insert(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        debug!(%id, name = %character.name, "added character to roster");
        self.characters.insert(id, Arc::new(RwLock::new(character)));
        id
    }

    pub fn get(&self, id: CharacterId) -> Option<SharedCharacter> {
        self.characters.get(&id).cloned()
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<SharedCharacter> {
        self.characters.remove(&id)
    }

    pub fn ids(&self) -> Vec<CharacterId> {
        self.characters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Names of every character, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.characters.len());
        for character in self.characters.values() {
            names.push(character.read().await.name.clone());
        }
        names.sort();
        names
    }

    /// First character with the given name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Option<SharedCharacter> {
        for character in self.characters.values() {
            if character.read().await.name.eq_ignore_ascii_case(name) {
                return Some(Arc::clone(character));
            }
        }
        None
    }
}
