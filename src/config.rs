use anyhow::Result;
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_CONFIG: &str = "splitter.json";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Database file holding every trip.
    pub database: PathBuf,
    /// Trip (bucket) transactions are recorded under.
    pub bucket: String,
    /// Email of whoever runs the tool, used as the default payer and for briefs.
    pub member: String,
    pub trip_id: i64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database: PathBuf::from("expense.db"),
            bucket: "default".to_owned(),
            member: String::new(),
            trip_id: 1,
        }
    }
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Configuration> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// An explicit path must exist, otherwise `splitter.json` is used when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Configuration> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG);
                if path.exists() {
                    debug!("loading {:?}", path);
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
