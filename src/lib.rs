pub mod area;
pub mod server;
