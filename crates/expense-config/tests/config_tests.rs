use expense_config::{Config, ConfigError, ConfigKey, ConfigManager};
use expense_domain::SortKey;
use chrono::{Duration, TimeZone, Utc};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.ui_color_enabled);
    assert!(!cfg.plain_output);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.locale = "de-DE".to_string();
    cfg.default_sort_key = SortKey::Amount;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.config_path().ends_with("config/config.json"));
    assert!(manager.backups_dir().exists());
}

#[test]
fn backups_list_newest_first_and_restore() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut first = Config::default();
    first.set(ConfigKey::Currency, "GBP").expect("set currency");
    let earlier = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
    let first = manager
        .backup_at(&first, Some("Pounds"), earlier)
        .expect("first backup");
    assert_eq!(first.name, "config_20240220_090000_pounds.json");
    assert_eq!(first.note.as_deref(), Some("pounds"));

    let second = manager
        .backup_at(&Config::default(), None, earlier + Duration::hours(1))
        .expect("second backup");
    assert_ne!(first.name, second.name);

    let backups = manager.list_backups().expect("list backups");
    let names: Vec<_> = backups.iter().map(|backup| backup.name.as_str()).collect();
    assert_eq!(names, vec![second.name.as_str(), first.name.as_str()]);

    let restored = manager.restore(&first.name).expect("restore");
    assert_eq!(restored.currency, "GBP");
    assert_eq!(manager.load().expect("reload").currency, "GBP");
}

#[test]
fn restoring_unknown_backup_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let err = manager.restore("config_19990101_000000.json").expect_err("must fail");
    assert!(matches!(err, ConfigError::BackupNotFound(_)));

    let escape = manager.restore("../config.json").expect_err("must fail");
    assert!(matches!(escape, ConfigError::BackupNotFound(_)));
}

#[test]
fn same_second_backups_get_ordered_sequences_and_can_be_deleted() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let at = Utc.with_ymd_and_hms(2024, 2, 20, 18, 0, 0).unwrap();

    let first = manager.backup_at(&Config::default(), None, at).expect("first");
    let second = manager.backup_at(&Config::default(), None, at).expect("second");
    assert_eq!(first.name, "config_20240220_180000.json");
    assert_eq!(second.name, "config_20240220_180000-2.json");
    assert_eq!(second.note, None);

    let third = manager
        .backup_at(&Config::default(), Some("2024"), at)
        .expect("third");
    assert_eq!(third.name, "config_20240220_180000-3_2024.json");
    assert_eq!(third.note.as_deref(), Some("2024"));
    let order: Vec<_> = manager
        .list_backups()
        .expect("list")
        .into_iter()
        .map(|backup| backup.sequence)
        .collect();
    assert_eq!(order, vec![3, 2, 1]);
    manager.delete_backup(&third.name).expect("delete noted");

    manager.delete_backup(&first.name).expect("delete");
    let left = manager.list_backups().expect("list");
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, second.name);
}

#[test]
fn explicit_data_root_wins() {
    let mut cfg = Config::default();
    cfg.data_root = Some(PathBuf::from("/tmp/expenses-here"));
    assert_eq!(cfg.resolve_data_root(), PathBuf::from("/tmp/expenses-here"));

    cfg.data_root = None;
    assert!(cfg.resolve_data_root().ends_with(".expense_tracker"));
}
