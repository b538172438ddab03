pub mod audit;
pub mod client;
pub mod clock;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
