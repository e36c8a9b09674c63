use crate::error::{LoanError, LoanResult};
use crate::validate::{check_rate, parse_number};
use log::{info, warn};
use std::collections::HashMap;

pub const PREFERENCE_KEY: &str = "customInterestRate";

/// Monthly rate used when nothing valid has been saved.
pub const DEFAULT_RATE: f64 = 10.;

/// String key-value storage that outlives a session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> LoanResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> LoanResult<()>;
    fn remove(&mut self, key: &str) -> LoanResult<()>;
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> LoanResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> LoanResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> LoanResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Read the saved rate.
///
/// A value that does not parse or lies outside 0.1..=100 is discarded and its key
/// cleared. Store failures are returned to the caller.
pub fn load_rate<S: PreferenceStore + ?Sized>(store: &mut S) -> LoanResult<Option<f64>> {
    let stored = match store.get(PREFERENCE_KEY)? {
        Some(stored) => stored,
        None => return Ok(None),
    };

    match parse_number(&stored).map(check_rate) {
        Some(Ok(rate)) => {
            info!("loaded saved rate {}", rate);
            Ok(Some(rate))
        }
        _ => {
            warn!("discarding saved rate {:?}", stored);
            store.remove(PREFERENCE_KEY)?;
            Ok(None)
        }
    }
}

/// Persist a new rate. Out-of-range values are refused before the store is touched.
pub fn save_rate<S: PreferenceStore + ?Sized>(store: &mut S, rate: f64) -> LoanResult<()> {
    if check_rate(rate).is_err() {
        return Err(LoanError::RateOutOfRange(rate));
    }
    store.set(PREFERENCE_KEY, &rate.to_string())?;
    info!("saved rate {}", rate);
    Ok(())
}

#[cfg(feature = "serde")]
pub use json_file::JsonFileStore;

#[cfg(feature = "serde")]
mod json_file {
    use super::PreferenceStore;
    use crate::error::LoanResult;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// Preferences kept as a flat JSON object on disk. A missing file is an empty store.
    #[derive(Clone, PartialEq, Debug)]
    pub struct JsonFileStore {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl JsonFileStore {
        pub fn open(path: impl AsRef<Path>) -> LoanResult<Self> {
            let path = path.as_ref().to_path_buf();
            let values = match fs::read_to_string(&path) {
                Ok(text) => serde_json::from_str(&text)?,
                Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            Ok(Self { path, values })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self) -> LoanResult<()> {
            let text = serde_json::to_string_pretty(&self.values)?;
            fs::write(&self.path, text)?;
            Ok(())
        }
    }

    impl PreferenceStore for JsonFileStore {
        fn get(&self, key: &str) -> LoanResult<Option<String>> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> LoanResult<()> {
            self.values.insert(key.to_string(), value.to_string());
            self.flush()
        }

        fn remove(&mut self, key: &str) -> LoanResult<()> {
            if self.values.remove(key).is_some() {
                self.flush()?;
            }
            Ok(())
        }
    }
}
