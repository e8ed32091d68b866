pub mod server;
pub mod handlers;
