use crate::error::StatError;
use crate::models::usage::FsStats;
use std::path::Path;

/// Live filesystem statistics for a mount path.
pub trait StatSource {
    fn stat(&self, mount_path: &Path) -> Result<FsStats, StatError>;
}

/// statvfs(3) through nix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Statvfs;

impl StatSource for Statvfs {
    fn stat(&self, mount_path: &Path) -> Result<FsStats, StatError> {
        use nix::sys::statvfs::statvfs;
        let stat = statvfs(mount_path)
            .map_err(|errno| StatError::from_errno(mount_path.to_path_buf(), errno))?;

        Ok(FsStats {
            fragment_size:    stat.fragment_size() as u64,
            total_blocks:     stat.blocks() as u64,
            free_blocks:      stat.blocks_free() as u64,
            available_blocks: stat.blocks_available() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_statable() {
        let st = Statvfs.stat(Path::new("/")).unwrap();
        assert!(st.fragment_size > 0);
        assert!(st.available_blocks <= st.free_blocks);
    }

    #[test]
    fn missing_path_is_unavailable() {
        let err = Statvfs.stat(Path::new("/nonexistent/dfpoll-test-mount")).unwrap_err();
        assert!(err.is_unavailable(), "{err}");
    }
}
