#![allow(dead_code)]

pub mod fake_server;
pub mod ssts_env;
