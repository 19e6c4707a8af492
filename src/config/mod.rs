pub mod settings;

pub use settings::{AppSettings, DatabaseSettings, Environment, JobSettings, RetrySettings, Settings};
