use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUP_PREFIX: &str = "config_";
const BACKUP_EXTENSION: &str = "json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A configuration snapshot kept under the backups directory.
///
/// File names follow `config_<YYYYMMDD>_<HHMMSS>[-<n>][_<note>].json`, where
/// `n` only appears when several snapshots share a stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBackup {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Position among snapshots taken in the same second, starting at 1.
    pub sequence: u32,
    pub note: Option<String>,
}

impl ConfigBackup {
    fn from_file_name(name: &str) -> Option<Self> {
        let stem = name
            .strip_suffix(BACKUP_EXTENSION)?
            .strip_suffix('.')?
            .strip_prefix(BACKUP_PREFIX)?;
        let mut parts = stem.splitn(3, '_');
        let date = parts.next()?;
        let clock = parts.next()?;
        let (time, sequence) = match clock.split_once('-') {
            Some((time, counter)) => (time, counter.parse().ok()?),
            None => (clock, 1),
        };
        let created_at = NaiveDateTime::parse_from_str(&format!("{date}_{time}"), STAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc());
        let note = parts
            .next()
            .filter(|note| !note.is_empty())
            .map(str::to_string);
        Some(Self {
            name: name.to_string(),
            created_at,
            sequence,
            note,
        })
    }
}

/// Reads, writes and snapshots the shell [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config/config.json` and `<base>/config/backups`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        let backups_dir = config_dir.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE), backups_dir))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Reads the stored config; a missing file yields the defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        read_config(&self.config_path)
    }

    /// Writes `config` to a sibling `.tmp` file, then renames it into place.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let staged = staging_path(&self.config_path);
        write_config(&staged, config)?;
        fs::rename(&staged, &self.config_path)?;
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<ConfigBackup, ConfigError> {
        self.backup_at(config, note, Utc::now())
    }

    /// Snapshots `config` with the given creation time.
    pub fn backup_at(
        &self,
        config: &Config,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ConfigBackup, ConfigError> {
        let stamp = format!("{BACKUP_PREFIX}{}", now.format(STAMP_FORMAT));
        let suffix = match note.and_then(slugify) {
            Some(slug) => format!("_{slug}.{BACKUP_EXTENSION}"),
            None => format!(".{BACKUP_EXTENSION}"),
        };
        let next = self
            .list_backups()?
            .iter()
            .filter(|backup| backup.name.starts_with(&stamp))
            .map(|backup| backup.sequence + 1)
            .max()
            .unwrap_or(1);
        let name = match next {
            1 => format!("{stamp}{suffix}"),
            n => format!("{stamp}-{n}{suffix}"),
        };
        write_config(&self.backups_dir.join(&name), config)?;
        ConfigBackup::from_file_name(&name).ok_or(ConfigError::BackupNotFound(name))
    }

    /// Backups newest first; the sequence breaks ties between equal stamps.
    pub fn list_backups(&self) -> Result<Vec<ConfigBackup>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(backup) = entry.file_name().to_str().and_then(ConfigBackup::from_file_name)
            {
                backups.push(backup);
            }
        }
        backups.sort_by_key(|backup| {
            Reverse((backup.created_at, backup.sequence, backup.name.clone()))
        });
        Ok(backups)
    }

    /// Loads backup `name` and makes it the active config.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self.backup_path(name)?;
        let config = read_config(&path)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn delete_backup(&self, name: &str) -> Result<(), ConfigError> {
        let path = self.backup_path(name)?;
        fs::remove_file(path)?;
        Ok(())
    }

    /// Resolves `name` inside the backups directory; anything that is not a
    /// bare file name of an existing backup is reported as not found.
    fn backup_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        let bare = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
        let path = self.backups_dir.join(name);
        if bare && path.is_file() {
            Ok(path)
        } else {
            Err(ConfigError::BackupNotFound(name.to_string()))
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Lowercase ASCII words joined by `-`; `None` when nothing usable remains.
fn slugify(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join("-"))
    }
}
