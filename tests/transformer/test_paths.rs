use docweave::core::transformer::{resolve_source, resolve_target};
use docweave::core::ErrorCategory;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn existing_directory_is_a_valid_target() {
    let dir = TempDir::new().unwrap();
    let resolved = resolve_target(dir.path()).unwrap();
    assert_eq!(resolved, dir.path().canonicalize().unwrap());
    // the writability probe leaves nothing behind
    assert_eq!(fs::read_dir(&resolved).unwrap().count(), 0);
}

#[test]
fn missing_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = resolve_target(&dir.path().join("nope")).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert_eq!(err.code, "DW-TARGET-001");
}

#[test]
fn file_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    assert_eq!(resolve_target(&file).unwrap_err().code, "DW-TARGET-002");
}

#[cfg(unix)]
#[test]
fn read_only_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    set_mode(&locked, 0o555);

    // privileged users can write anyway
    let writable = tempfile::tempfile_in(&locked).is_ok();
    let result = resolve_target(&locked);
    set_mode(&locked, 0o755);
    if writable {
        return;
    }
    assert_eq!(result.unwrap_err().code, "DW-TARGET-003");
}

#[test]
fn relative_target_resolves_to_absolute_path() {
    let resolved = resolve_target(Path::new(".")).unwrap();
    assert!(resolved.is_absolute());
}

#[test]
fn readable_file_is_a_valid_source() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("structure.json");
    fs::write(&file, "{\"name\":\"project\"}").unwrap();
    assert_eq!(resolve_source(&file).unwrap(), file.canonicalize().unwrap());
}

#[test]
fn missing_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = resolve_source(&dir.path().join("structure.json")).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert_eq!(err.code, "DW-SOURCE-001");
}

#[test]
fn directory_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    assert_eq!(resolve_source(dir.path()).unwrap_err().code, "DW-SOURCE-002");
}

#[cfg(unix)]
#[test]
fn unreadable_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("structure.json");
    fs::write(&file, "{}").unwrap();
    set_mode(&file, 0o000);

    let readable = fs::File::open(&file).is_ok();
    let result = resolve_source(&file);
    set_mode(&file, 0o644);
    if readable {
        return;
    }
    assert_eq!(result.unwrap_err().code, "DW-SOURCE-003");
}
