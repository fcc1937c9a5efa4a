use std::{collections::HashMap, fmt, path::{Path, PathBuf}};

use super::strip_suffix_token;

/// A discovered source directory together with the name it gets in the target tree.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GameDir {
    pub source: PathBuf,
    pub name: String,
    pub target_name: String,
}

impl GameDir {
    pub fn new(source: PathBuf, name: String, suffix: &str) -> Self {
        let target_name = strip_suffix_token(&name, suffix);
        Self { source, name, target_name }
    }

    pub fn target_in(&self, target_root: &impl AsRef<Path>) -> PathBuf {
        target_root.as_ref().join(&self.target_name)
    }
}

/// Pairs of directories that end up with the same target name, the later one
/// overwriting the earlier one when copied.
pub fn target_collisions(game_dirs: &[GameDir]) -> Vec<(&GameDir, &GameDir)> {
    let mut seen: HashMap<&str, &GameDir> = HashMap::new();
    let mut collisions = vec![];
    for game_dir in game_dirs {
        if let Some(previous) = seen.insert(&game_dir.target_name, game_dir) {
            collisions.push((previous, game_dir));
        }
    }

    collisions
}

impl fmt::Display for GameDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.name == self.target_name {
            write!(f, "[{}]", self.name)
        } else {
            write!(f, "[{}] => [{}]", self.name, self.target_name)
        }
    }
}
