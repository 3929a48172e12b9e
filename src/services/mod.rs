pub mod fs;
pub mod link;
