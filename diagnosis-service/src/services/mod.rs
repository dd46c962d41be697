pub mod assembler;
pub mod classifier;
pub mod diagnosis;
pub mod images;
pub mod invoker;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod selector;

pub use diagnosis::diagnose;
pub use selector::{ModelHandle, ModelRegistry};
