pub mod builder;
pub mod clients;
pub mod configure;
pub mod display;
pub mod error;
pub mod logger;
pub mod logging;
pub mod mocks;
pub mod models;
pub mod net;
pub mod relative_time;
pub mod render;
pub mod roster_store;
pub mod service;
pub mod simple_kv_storage;
