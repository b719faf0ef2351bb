// storefront/src/cart/storage.rs

//! String key/value storage for persisted carts.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::Result;

pub trait CartStorage: Send + Sync {
  fn get_item(&self, key: &str) -> Result<Option<String>>;
  fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryCartStorage {
  items: RwLock<HashMap<String, String>>,
}

impl MemoryCartStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CartStorage for MemoryCartStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>> {
    Ok(self.items.read().get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> Result<()> {
    self.items.write().insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// One `<key>.json` file per key inside `dir`.
pub struct FileCartStorage {
  dir: PathBuf,
}

impl FileCartStorage {
  pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(Self { dir })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    let file: String = key
      .chars()
      .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
      .collect();
    self.dir.join(format!("{file}.json"))
  }
}

impl CartStorage for FileCartStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>> {
    match fs::read_to_string(self.path_for(key)) {
      Ok(raw) => Ok(Some(raw)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn set_item(&self, key: &str, value: &str) -> Result<()> {
    let path = self.path_for(key);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value)?;
    fs::rename(&tmp, &path)?;
    Ok(())
  }
}
