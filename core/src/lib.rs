//! Core of the dealer-network strategy simulation.
//!
//! A run is an explicit [`state::GameState`] value. The
//! [`controller::GameController`] draws the quarter's scenario, hands the
//! player's [`decision::DecisionSet`] to the pure
//! [`engine::SimulationEngine`], and folds the result back into the state.

pub mod config;
pub mod controller;
pub mod decision;
pub mod engine;
pub mod error;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod state;
pub mod store;
pub mod types;
