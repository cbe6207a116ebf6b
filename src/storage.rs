use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Abstract configuration persistence interface
pub trait ConfigStorage {
    /// Return the stored configuration. A missing file is an empty configuration.
    fn load(&self) -> Result<Config>;
    /// Persist the configuration
    fn save(&self, config: &Config) -> Result<()>;
}

/// `<project>/.atat/config.json`
pub struct LocalConfigStorage {
    path: PathBuf,
}

impl LocalConfigStorage {
    pub fn new(project_dir: &Path) -> Self {
        LocalConfigStorage {
            path: project_dir
                .join(config::PROJECT_CONFIG_DIR)
                .join(config::PROJECT_CONFIG_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStorage for LocalConfigStorage {
    fn load(&self) -> Result<Config> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!(
                        "Failed to read project config file at {}",
                        self.path.display()
                    )
                });
            }
        };
        config::parse_config(&content)
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create project config directory at {}",
                    parent.display()
                )
            })?;
        }
        let content = config::serialize_config(config)?;
        fs::write(&self.path, content).with_context(|| {
            format!(
                "Failed to write project config file at {}",
                self.path.display()
            )
        })?;
        Ok(())
    }
}
