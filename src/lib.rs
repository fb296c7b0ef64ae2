// Library modules for the playback seeder
// This allows tests to access internal modules

pub mod config;
pub mod db;
pub mod generator;
pub mod models;
pub mod pipeline;

#[cfg(test)]
pub mod test_utils;
