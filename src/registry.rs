use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence backend for remembered output paths.
///
/// Keys are source-file paths, compared verbatim as strings; values are the
/// output paths the user chose for them. Implementations never delete
/// entries, a later `put` for the same key simply overwrites.
pub trait RegistryStore {
    /// Look up the remembered output path for a source file.
    fn get(&self, source: &str) -> Option<String>;

    /// Remember (or overwrite) the output path for a source file.
    fn put(&mut self, source: &str, output: &str) -> Result<()>;
}

/// In-memory backend; state lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryStore {
    fn get(&self, source: &str) -> Option<String> {
        self.entries.get(source).cloned()
    }

    fn put(&mut self, source: &str, output: &str) -> Result<()> {
        self.entries.insert(source.to_string(), output.to_string());
        Ok(())
    }
}

#[derive(Default, Serialize, Deserialize)]
struct StateFile {
    outputs: HashMap<String, String>,
}

/// File-backed store holding the whole map as one JSON document.
///
/// A missing file on open means an empty registry; every `put` rewrites the
/// file so state survives across runner invocations in the same workspace.
pub struct JsonFileStore {
    path: PathBuf,
    state: StateFile,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("malformed state file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StateFile::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("can't read {}", path.display()));
            }
        };
        Ok(Self { path, state })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("can't create {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, text)
            .with_context(|| format!("can't write state file {}", self.path.display()))
    }
}

impl RegistryStore for JsonFileStore {
    fn get(&self, source: &str) -> Option<String> {
        self.state.outputs.get(source).cloned()
    }

    fn put(&mut self, source: &str, output: &str) -> Result<()> {
        self.state
            .outputs
            .insert(source.to_string(), output.to_string());
        self.save()
    }
}

/// Remembers, per source file, the last chosen compiled-output destination.
///
/// At most one output path is kept per source file at any time; entries are
/// created the first time a compile action completes the destination prompt
/// and are never evicted.
pub struct OutputPathRegistry {
    store: Box<dyn RegistryStore>,
}

impl OutputPathRegistry {
    pub fn new(store: Box<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Registry backed by a [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn lookup(&self, source: &Path) -> Option<PathBuf> {
        self.store.get(&source.to_string_lossy()).map(PathBuf::from)
    }

    pub fn remember(&mut self, source: &Path, output: &Path) -> Result<()> {
        self.store
            .put(&source.to_string_lossy(), &output.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_choice_overwrites_earlier() {
        let mut registry = OutputPathRegistry::in_memory();
        let source = Path::new("/src/a.sb");

        assert_eq!(registry.lookup(source), None);

        registry.remember(source, Path::new("/out/a.bin")).unwrap();
        registry.remember(source, Path::new("/out/b.bin")).unwrap();

        assert_eq!(registry.lookup(source), Some(PathBuf::from("/out/b.bin")));
    }

    #[test]
    fn entries_are_per_source_file() {
        let mut registry = OutputPathRegistry::in_memory();
        registry
            .remember(Path::new("/src/a.sb"), Path::new("/out/a.bin"))
            .unwrap();

        assert_eq!(registry.lookup(Path::new("/src/b.sb")), None);
    }

    #[test]
    fn json_store_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!(
            "registry_tests_{}_roundtrip.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.put("/src/a.sb", "/out/a.bin").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("/src/a.sb"), Some("/out/a.bin".to_string()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn json_store_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "registry_tests_{}_missing.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("/src/a.sb"), None);
    }
}
