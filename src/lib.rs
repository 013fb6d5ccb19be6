// Library exports for the binary and tests
pub mod aggregator;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod paging;
pub mod progress;
pub mod renderer;
pub mod series;
pub mod stats;
pub mod timefmt;
pub mod timeline;
pub mod window;
