pub mod filesystem;
pub mod mounts;
