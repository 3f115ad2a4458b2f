//! Loading loot tables from `.json` / `.ron` files on disk.

use std::fs;
use std::path::Path;

use super::{LootTableDefinition, LootTableRegistry};
use crate::error::{LootError, LootResult};

/// Is this a file extension the loader understands?
pub fn is_table_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("ron")
    )
}

/// Parse one table file, picking the format from the extension
pub fn load_table_file(path: &Path) -> LootResult<LootTableDefinition> {
    let content = fs::read_to_string(path)?;
    let table: LootTableDefinition = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("ron") => ron::from_str(&content)?,
        _ => return Err(LootError::UnsupportedFormat(path.to_path_buf())),
    };
    table.validate()?;
    Ok(table)
}

impl LootTableRegistry {
    /// Load one file into the registry, returning the table id
    pub fn load_file(&mut self, path: &Path) -> LootResult<String> {
        let table = load_table_file(path)?;
        let table_id = table.table_id.clone();
        self.insert(table)?;
        tracing::debug!(table_id = %table_id, path = %path.display(), "Loaded loot table");
        Ok(table_id)
    }

    /// Load every table file under `dir` (one level of subdirectories).
    ///
    /// Broken files are logged and skipped; returns how many tables loaded.
    pub fn load_dir(&mut self, dir: &Path) -> LootResult<usize> {
        let mut loaded = self.load_entries(dir)?;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                loaded += self.load_entries(&path)?;
            }
        }
        tracing::info!(dir = %dir.display(), loaded, total = self.len(), "Loot tables loaded");
        Ok(loaded)
    }

    fn load_entries(&mut self, dir: &Path) -> LootResult<usize> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_table_file(p))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping loot table"),
            }
        }
        Ok(loaded)
    }

    /// Write every table as pretty JSON into `dir`, one file per table
    pub fn save_dir(&self, dir: &Path) -> LootResult<usize> {
        fs::create_dir_all(dir)?;
        for table_id in self.table_ids() {
            if let Some(table) = self.get(table_id) {
                let json = serde_json::to_string_pretty(table)?;
                fs::write(dir.join(format!("{table_id}.json")), json)?;
            }
        }
        Ok(self.len())
    }
}
