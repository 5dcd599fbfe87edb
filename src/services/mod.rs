pub mod archive;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod staging;
