//! HTTP/WebSocket control surface over the simulation controller.

mod server;

pub use server::{serve, ServerError};
