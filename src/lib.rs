pub mod app;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod diagram;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod palette;
