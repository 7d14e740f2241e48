pub mod bundle;
pub mod profile;
pub mod quality;
pub mod report;
pub mod request;
pub mod strategy;
