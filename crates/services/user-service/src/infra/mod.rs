//! Infrastructure layer - store files on disk.

pub mod fs;

pub use fs::{atomic_write, atomic_write_with, ensure_file, read_file};
