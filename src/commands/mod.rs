pub mod config;
pub mod db;
pub mod report;
pub mod routine;
pub mod workout;
