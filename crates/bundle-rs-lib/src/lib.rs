pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod plugin;
pub use plugin::Plugin;

pub mod dependency;
pub use dependency::Dependency;
pub use dependency::Manifest;

pub mod resolver;
pub mod eligibility;
pub mod selection;
pub mod install_plan;
pub mod sources;

mod driver;
pub use driver::resolve_bundle;
