//! Run configuration

mod config;

pub use config::{read_limited, GlobalConfig, MAX_FILE_SIZE};
