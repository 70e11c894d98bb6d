pub mod config;
pub mod form;
pub mod io_struct;
pub mod logging;
pub mod page;
pub mod relay;
pub mod server;
pub mod submission;
pub mod transcript;
