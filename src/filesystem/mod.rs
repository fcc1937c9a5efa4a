mod copy;

use std::{fs, io, path::{Path, PathBuf}};

use anyhow::Result;
use bitflags::bitflags;
use log::{debug, warn};

use crate::{err, error::{GamepackError, GamepackIOError}};

use self::copy::copy_dir_recursive;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> GamepackIOError {
    let path = path.to_path_buf();
    move |source| GamepackIOError::Io { path, source }
}

bitflags! {
    pub struct CopyFlags: u32 {
        const SYMLINKS = 0b00000001;
        const PERMISSIONS = 0b00000010;
        const ALL = Self::SYMLINKS.bits | Self::PERMISSIONS.bits;
    }
}

/// Lists the immediate child directories of `source` whose lower-cased name
/// contains `marker`, in the order the filesystem returns them.
pub fn discover_game_dirs(source: &impl AsRef<Path>, marker: &str) -> Result<Vec<PathBuf>> {
    let source = source.as_ref();
    if !source.exists() {
        return err!(GamepackError::NotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return err!(GamepackError::NotADirectory(source.to_path_buf()));
    }

    let marker = marker.to_lowercase();
    let game_dirs = source.read_dir()?.into_iter().filter_map(|dir_entry| {
        match dir_entry {
            Ok(entry) => {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if path.is_dir() && name.contains(&marker) {
                    Some(path)
                } else {
                    None
                }
            }
            Err(e) => {
                warn!("Skipping unreadable entry in `{}`: {}", source.display(), e);
                None
            }
        }
    }).collect::<Vec<PathBuf>>();

    debug!("Found {} directories matching `{}` in `{}`", game_dirs.len(), marker, source.display());
    Ok(game_dirs)
}

pub fn ensure_directory(path: &impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return err!(GamepackError::NotADirectory(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(io_error(path))?;
    Ok(())
}

/// Deletes `destination`, whatever it is, and replaces it with a recursive copy
/// of `source`. There's no backup of the previous `destination`.
pub fn replace_with_copy(source: &impl AsRef<Path>, destination: &impl AsRef<Path>, flags: CopyFlags) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if !source.exists() {
        return err!(GamepackError::NotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return err!(GamepackError::NotADirectory(source.to_path_buf()));
    }

    remove_existing(destination)?;
    copy_dir_recursive(source, destination, flags)?;

    Ok(())
}

fn remove_existing(path: &Path) -> Result<(), GamepackIOError> {
    // symlink_metadata so a link to a directory is removed, not its target
    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            debug!("Removing previous `{}`", path.display());
            if metadata.is_dir() {
                fs::remove_dir_all(path).map_err(io_error(path))?;
            } else {
                fs::remove_file(path).map_err(io_error(path))?;
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path)(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_tree() -> Result<TempDir> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("alpha_game").join("assets"))?;
        fs::write(root.join("alpha_game").join("main.go"), "package main")?;
        fs::write(root.join("alpha_game").join("assets").join("logo.txt"), "logo")?;
        fs::create_dir(root.join("beta"))?;
        fs::create_dir(root.join("Gamma_GAME"))?;
        fs::create_dir_all(root.join("beta").join("nested_game"))?;
        fs::write(root.join("readme_game.txt"), "not a directory")?;

        Ok(dir)
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names = paths.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn discovers_only_top_level_directories() -> Result<()> {
        let dir = source_tree()?;
        let found = discover_game_dirs(&dir.path(), "game")?;

        assert_eq!(names(&found), vec!["Gamma_GAME".to_string(), "alpha_game".to_string()]);
        assert!(found.iter().all(|p| p.parent() == Some(dir.path())));

        Ok(())
    }

    #[test]
    fn discovery_is_stable_between_scans() -> Result<()> {
        let dir = source_tree()?;

        assert_eq!(discover_game_dirs(&dir.path(), "game")?, discover_game_dirs(&dir.path(), "game")?);

        Ok(())
    }

    #[test]
    fn discovery_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let error = discover_game_dirs(&missing, "game").unwrap_err();
        assert!(matches!(error.downcast_ref::<GamepackError>(), Some(GamepackError::NotFound(_))));
    }

    #[test]
    fn discovery_fails_on_file_source() {
        let dir = source_tree().unwrap();
        let file = dir.path().join("readme_game.txt");

        let error = discover_game_dirs(&file, "game").unwrap_err();
        assert!(matches!(error.downcast_ref::<GamepackError>(), Some(GamepackError::NotADirectory(_))));
    }

    #[test]
    fn ensure_directory_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("out").join("games");

        ensure_directory(&target)?;
        ensure_directory(&target)?;
        assert!(target.is_dir());

        let file = dir.path().join("file");
        fs::write(&file, "")?;
        assert!(ensure_directory(&file).is_err());

        Ok(())
    }

    #[test]
    fn ensure_directory_reports_the_failing_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("file");
        fs::write(&file, "")?;
        let below_file = file.join("games");

        let error = ensure_directory(&below_file).unwrap_err();

        match error.downcast_ref::<GamepackIOError>() {
            Some(GamepackIOError::Io { path, .. }) => assert_eq!(path, &below_file),
            other => panic!("Unexpected error {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn replace_with_copy_copies_everything() -> Result<()> {
        let source = source_tree()?;
        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");

        replace_with_copy(&source.path().join("alpha_game"), &destination, CopyFlags::ALL)?;

        assert_eq!(fs::read_to_string(destination.join("main.go"))?, "package main");
        assert_eq!(fs::read_to_string(destination.join("assets").join("logo.txt"))?, "logo");

        Ok(())
    }

    #[test]
    fn replace_with_copy_removes_stale_files() -> Result<()> {
        let source = source_tree()?;
        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        fs::create_dir_all(destination.join("old"))?;
        fs::write(destination.join("old").join("stale.txt"), "stale")?;
        fs::write(destination.join("main.go"), "old content")?;

        replace_with_copy(&source.path().join("alpha_game"), &destination, CopyFlags::ALL)?;
        replace_with_copy(&source.path().join("alpha_game"), &destination, CopyFlags::ALL)?;

        assert!(!destination.join("old").exists());
        assert_eq!(fs::read_to_string(destination.join("main.go"))?, "package main");
        let mut entries = fs::read_dir(&destination)?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        assert_eq!(entries, vec!["assets".to_string(), "main.go".to_string()]);

        Ok(())
    }

    #[test]
    fn replace_with_copy_replaces_a_file_destination() -> Result<()> {
        let source = source_tree()?;
        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        fs::write(&destination, "I was a file")?;

        replace_with_copy(&source.path().join("alpha_game"), &destination, CopyFlags::ALL)?;

        assert!(destination.is_dir());
        Ok(())
    }

    #[test]
    fn replace_with_copy_keeps_destination_when_source_is_missing() -> Result<()> {
        let source = tempfile::tempdir()?;
        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        fs::create_dir(&destination)?;
        fs::write(destination.join("keep.txt"), "keep")?;

        let error = replace_with_copy(&source.path().join("missing_game"), &destination, CopyFlags::ALL).unwrap_err();

        assert!(matches!(error.downcast_ref::<GamepackError>(), Some(GamepackError::NotFound(_))));
        assert!(destination.join("keep.txt").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn replace_with_copy_keeps_links_and_permissions() -> Result<()> {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let source = source_tree()?;
        let game = source.path().join("alpha_game");
        symlink("main.go", game.join("link.go"))?;
        let script = game.join("run.sh");
        fs::write(&script, "#!/bin/sh")?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        replace_with_copy(&game, &destination, CopyFlags::ALL)?;

        let link = destination.join("link.go");
        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_link(&link)?, PathBuf::from("main.go"));
        assert_eq!(fs::metadata(destination.join("run.sh"))?.permissions().mode() & 0o777, 0o755);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn replace_with_copy_keeps_read_only_directories() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let source = source_tree()?;
        let game = source.path().join("alpha_game");
        fs::set_permissions(game.join("assets"), fs::Permissions::from_mode(0o555))?;

        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        replace_with_copy(&game, &destination, CopyFlags::ALL)?;

        assert_eq!(fs::metadata(destination.join("assets"))?.permissions().mode() & 0o777, 0o555);
        assert_eq!(fs::read_to_string(destination.join("assets").join("logo.txt"))?, "logo");

        // let the temp dirs clean up after themselves
        fs::set_permissions(destination.join("assets"), fs::Permissions::from_mode(0o755))?;
        fs::set_permissions(game.join("assets"), fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copy_without_symlink_flag_follows_links() -> Result<()> {
        use std::os::unix::fs::symlink;

        let source = source_tree()?;
        let game = source.path().join("alpha_game");
        symlink("main.go", game.join("link.go"))?;

        let target = tempfile::tempdir()?;
        let destination = target.path().join("alpha");
        replace_with_copy(&game, &destination, CopyFlags::PERMISSIONS)?;

        let link = destination.join("link.go");
        assert!(!fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(&link)?, "package main");

        Ok(())
    }
}
