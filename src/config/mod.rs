//! Configuration module

mod site;

pub use site::ConfigError;
pub use site::PrismicConfig;
pub use site::ReadingConfig;
pub use site::ReadingMode;
pub use site::SiteConfig;
