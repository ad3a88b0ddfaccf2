pub mod capability;
pub mod session;
pub mod storage;
