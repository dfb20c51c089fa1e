//! Retro Flight - steer a ship through a falling asteroid field.
//!
//! The game is built only on the public `retro_core` API: three kinds of
//! agent and a `score` entry in the world state.

pub mod flight;

pub use flight::{
    flight_config, new_game, score, Asteroid, AsteroidSpawner, Spaceship, SCORE, SHIP, SPAWNER,
};
