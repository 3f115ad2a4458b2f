//! Loot table hot reload
//!
//! Watches the table directories with `notify` and re-applies changed files
//! to a `LootTableRegistry` when polled. A file that fails to parse leaves the
//! previous version of its table in place.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Mutex;

use crate::error::LootResult;
use crate::loot::{is_table_file, load_table_file, LootTableRegistry};

/// Outcome of one poll
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReloadSummary {
    pub reloaded: Vec<String>,
    pub removed: Vec<String>,
    pub failed: Vec<(PathBuf, String)>,
}

impl ReloadSummary {
    pub fn is_empty(&self) -> bool {
        self.reloaded.is_empty() && self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Does this event touch a loot table file in a way worth reloading?
pub fn is_table_change_event(event: &Event) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind && event.paths.iter().any(|p| is_table_file(p))
}

pub struct TableWatcher {
    _watcher: RecommendedWatcher,
    receiver: Mutex<Receiver<notify::Result<Event>>>,
    dirs: Vec<PathBuf>,
    // which table each watched file defines, for removals
    known: HashMap<PathBuf, String>,
    reload_count: u64,
}

impl TableWatcher {
    /// Start watching `dirs` recursively
    pub fn new(dirs: &[PathBuf]) -> LootResult<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        for dir in dirs {
            watcher.watch(dir, RecursiveMode::Recursive)?;
            tracing::info!(dir = %dir.display(), "Watching loot tables");
        }
        Ok(Self {
            _watcher: watcher,
            receiver: Mutex::new(rx),
            dirs: dirs.to_vec(),
            known: HashMap::new(),
            reload_count: 0,
        })
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn reload_count(&self) -> u64 {
        self.reload_count
    }

    /// Initial load of every watched directory, remembering file → table
    pub fn load_all(&mut self, registry: &mut LootTableRegistry) -> LootResult<usize> {
        let mut loaded = 0;
        for dir in self.dirs.clone() {
            for path in table_files(&dir)? {
                if self.reload_path(&path, registry).is_ok() {
                    loaded += 1;
                }
            }
        }
        Ok(loaded)
    }

    /// Apply every pending filesystem event to `registry`
    pub fn poll(&mut self, registry: &mut LootTableRegistry) -> ReloadSummary {
        let events: Vec<notify::Result<Event>> = {
            let receiver = match self.receiver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            receiver.try_iter().collect()
        };

        let mut summary = ReloadSummary::default();
        for result in events {
            match result {
                Ok(event) => self.handle_event(&event, registry, &mut summary),
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            }
        }
        summary
    }

    /// Apply one event; exposed so tests can drive it without a filesystem watcher
    pub fn handle_event(
        &mut self,
        event: &Event,
        registry: &mut LootTableRegistry,
        summary: &mut ReloadSummary,
    ) {
        if !is_table_change_event(event) {
            return;
        }

        for path in event.paths.iter().filter(|p| is_table_file(p)) {
            if matches!(event.kind, EventKind::Remove(_)) || !path.exists() {
                if let Some(table_id) = self.known.remove(path) {
                    registry.remove(&table_id);
                    tracing::info!(table_id = %table_id, "Loot table removed");
                    summary.removed.push(table_id);
                }
                continue;
            }

            match self.reload_path(path, registry) {
                Ok(table_id) => {
                    if !summary.reloaded.contains(&table_id) {
                        summary.reloaded.push(table_id);
                    }
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Loot table reload failed");
                    summary.failed.push((path.clone(), e.to_string()));
                }
            }
        }
    }

    fn reload_path(&mut self, path: &Path, registry: &mut LootTableRegistry) -> LootResult<String> {
        let table = load_table_file(path)?;
        let table_id = table.table_id.clone();

        // a file renamed its table: drop the old id
        if let Some(previous) = self.known.get(path) {
            if *previous != table_id {
                registry.remove(previous);
            }
        }

        registry.insert(table)?;
        self.known.insert(path.to_path_buf(), table_id.clone());
        self.reload_count += 1;
        tracing::info!(table_id = %table_id, count = self.reload_count, "Loot table reloaded");
        Ok(table_id)
    }
}

/// Table files in `dir` and its subdirectories, sorted
fn table_files(dir: &Path) -> LootResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(table_files(&path)?);
        } else if is_table_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};
    use tempfile::TempDir;

    fn write_table(path: &Path, table_id: &str, item: &str) {
        std::fs::write(
            path,
            format!(
                r#"{{ "table_id": "{table_id}", "pools": [ {{ "name": "p", "items": ["{item}"] }} ], "drop_count_range": [1, 1] }}"#
            ),
        )
        .unwrap();
    }

    fn modify(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.to_path_buf())
    }

    #[test]
    fn test_event_filtering() {
        let json = PathBuf::from("tables/grunt.json");
        let txt = PathBuf::from("tables/readme.txt");

        assert!(is_table_change_event(&modify(&json)));
        assert!(is_table_change_event(
            &Event::new(EventKind::Create(CreateKind::File)).add_path("a/b.ron".into())
        ));
        assert!(!is_table_change_event(&modify(&txt)));
        assert!(!is_table_change_event(
            &Event::new(EventKind::Access(AccessKind::Any)).add_path(json)
        ));
    }

    #[test]
    fn test_load_all_and_modify() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grunt.json");
        write_table(&path, "grunt", "scrap");

        let mut watcher = TableWatcher::new(&[dir.path().to_path_buf()]).unwrap();
        let mut registry = LootTableRegistry::new();
        assert_eq!(watcher.load_all(&mut registry).unwrap(), 1);

        write_table(&path, "grunt", "servo");
        let mut summary = ReloadSummary::default();
        watcher.handle_event(&modify(&path), &mut registry, &mut summary);

        assert_eq!(summary.reloaded, vec!["grunt"]);
        assert_eq!(registry.get("grunt").unwrap().pools[0].items, vec!["servo"]);
        assert_eq!(watcher.reload_count(), 2);
    }

    #[test]
    fn test_broken_file_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grunt.json");
        write_table(&path, "grunt", "scrap");

        let mut watcher = TableWatcher::new(&[dir.path().to_path_buf()]).unwrap();
        let mut registry = LootTableRegistry::new();
        watcher.load_all(&mut registry).unwrap();

        std::fs::write(&path, "{ oops").unwrap();
        let mut summary = ReloadSummary::default();
        watcher.handle_event(&modify(&path), &mut registry, &mut summary);

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(registry.get("grunt").unwrap().pools[0].items, vec!["scrap"]);
    }

    #[test]
    fn test_remove_and_rename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grunt.json");
        write_table(&path, "grunt", "scrap");

        let mut watcher = TableWatcher::new(&[dir.path().to_path_buf()]).unwrap();
        let mut registry = LootTableRegistry::new();
        watcher.load_all(&mut registry).unwrap();

        write_table(&path, "grunt_v2", "scrap");
        let mut summary = ReloadSummary::default();
        watcher.handle_event(&modify(&path), &mut registry, &mut summary);
        assert!(!registry.contains("grunt"));
        assert!(registry.contains("grunt_v2"));

        std::fs::remove_file(&path).unwrap();
        let mut summary = ReloadSummary::default();
        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
        watcher.handle_event(&removed, &mut registry, &mut summary);
        assert_eq!(summary.removed, vec!["grunt_v2"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_poll_without_events_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut watcher = TableWatcher::new(&[dir.path().to_path_buf()]).unwrap();
        let mut registry = LootTableRegistry::new();
        assert!(watcher.poll(&mut registry).is_empty());
    }

    #[test]
    fn test_missing_dir_is_error() {
        assert!(TableWatcher::new(&[PathBuf::from("/no/such/loot/dir")]).is_err());
    }
}
