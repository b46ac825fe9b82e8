pub mod image;
pub mod object_store;
pub mod record_store;
pub mod thumbnail;
pub mod worker;
