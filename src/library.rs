//! Library catalog: enumerates audio entries from a media store, keeps the
//! supported ones and publishes them as an ordered, immutable snapshot.

mod catalog;
mod fs_store;
mod model;
mod store;

pub use catalog::*;
pub use fs_store::FsMediaStore;
pub use model::*;
pub use store::*;

#[cfg(test)]
mod tests;
