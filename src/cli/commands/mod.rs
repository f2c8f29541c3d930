pub mod backup;
pub mod config;
pub mod contractor;
pub mod export;
pub mod init;
pub mod log;
pub mod manager;
pub mod serve;
