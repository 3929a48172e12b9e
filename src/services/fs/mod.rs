pub mod dir_size;
pub mod listing;
pub mod meta;
pub mod mkdir;
pub mod resolve;
