pub mod common;
mod handler_flow;
