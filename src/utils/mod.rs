pub mod changelog;
pub mod config;
pub mod manifest;
pub mod source;
