use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MANIFEST_NAME: &str = "dummy_data.json";

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    game_names: Vec<String>,
    number_of_games: usize,
}

impl Manifest {
    pub fn from_names(game_names: Vec<String>) -> Self {
        let number_of_games = game_names.len();
        Self { game_names, number_of_games }
    }

    pub fn game_names(&self) -> &[String] {
        &self.game_names
    }

    pub fn number_of_games(&self) -> usize {
        self.number_of_games
    }

    /// Writes the manifest as JSON, truncating whatever was at `path`.
    pub fn write_to(&self, path: &impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Couldn't create the manifest at `{}`", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}
