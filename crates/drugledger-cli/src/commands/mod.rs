//! Command implementations.

pub mod aggregate;
pub mod build;
pub mod config;
pub mod fetch;
pub mod run;
pub mod submit;

pub use self::aggregate::execute_aggregate;
pub use self::build::execute_build;
pub use self::config::execute_config;
pub use self::fetch::execute_fetch;
pub use self::run::execute_run;
pub use self::submit::execute_submit;
