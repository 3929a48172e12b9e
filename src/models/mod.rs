pub mod file_entry;
pub mod link;
