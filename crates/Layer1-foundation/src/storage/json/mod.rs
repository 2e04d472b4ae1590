//! JSON file storage

mod store;

pub use store::JsonStore;
pub(crate) use store::load_file;
