pub mod config;
pub mod logging;

pub mod artifacts;
pub mod batch;
pub mod fetch;
pub mod item;
pub mod outcome;
pub mod retry;
pub mod worklist;
