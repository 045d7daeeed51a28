pub mod bucket;
pub mod cards;
pub mod cli;
pub mod config;
pub mod display;
pub mod drill;
pub mod engine;
pub mod equity;
pub mod error;
pub mod hand_evaluator;
pub mod multiway;
pub mod play;
pub mod preflop;
pub mod range_analysis;
pub mod range_estimator;
pub mod ranges;
pub mod review;
pub mod simulate;
pub mod strategy;
pub mod table;
pub mod texture;
