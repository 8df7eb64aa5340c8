pub mod entry;
pub mod profile;
