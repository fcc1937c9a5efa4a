use std::{fs, io, path::Path};

use log::debug;

use crate::error::GamepackIOError;

use super::CopyFlags;

fn copy_error(from: &Path, to: &Path) -> impl FnOnce(io::Error) -> GamepackIOError {
    let from = from.to_path_buf();
    let to = to.to_path_buf();
    move |source| GamepackIOError::Copy { from, to, source }
}

pub fn copy_dir_recursive(src: &Path, dst: &Path, flags: CopyFlags) -> Result<(), GamepackIOError> {
    fs::create_dir_all(dst).map_err(copy_error(src, dst))?;

    for entry in fs::read_dir(src).map_err(copy_error(src, dst))? {
        let entry = entry.map_err(copy_error(src, dst))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(copy_error(&src_path, &dst_path))?;

        if file_type.is_symlink() && flags.contains(CopyFlags::SYMLINKS) {
            copy_symlink(&src_path, &dst_path)?;
        } else if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path, flags)?;
        } else {
            debug!("Copying `{}`", src_path.display());
            // fs::copy carries the permission bits over on its own
            fs::copy(&src_path, &dst_path).map_err(copy_error(&src_path, &dst_path))?;
        }
    }

    // Last, so a read-only source directory doesn't block copying its children
    if flags.contains(CopyFlags::PERMISSIONS) {
        let permissions = fs::metadata(src).map_err(copy_error(src, dst))?.permissions();
        fs::set_permissions(dst, permissions).map_err(copy_error(src, dst))?;
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), GamepackIOError> {
    let link_target = fs::read_link(src).map_err(copy_error(src, dst))?;
    debug!("Linking `{}` -> `{}`", dst.display(), link_target.display());
    std::os::unix::fs::symlink(&link_target, dst).map_err(copy_error(src, dst))?;

    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), GamepackIOError> {
    if src.is_dir() {
        copy_dir_recursive(src, dst, CopyFlags::ALL)
    } else {
        fs::copy(src, dst).map_err(copy_error(src, dst))?;
        Ok(())
    }
}
