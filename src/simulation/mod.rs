pub mod runner;
pub mod world;
