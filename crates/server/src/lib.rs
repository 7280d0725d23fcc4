pub mod config;
pub mod dates;
pub mod db;
pub mod error_convert;
pub mod health;
pub mod openapi;
pub mod query;
pub mod rest;
pub mod search;
pub mod store;
pub mod telemetry;
