pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repository;
pub mod service;
pub mod storage;
