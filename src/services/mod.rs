pub mod backends;
pub mod registry;
pub mod storage;
