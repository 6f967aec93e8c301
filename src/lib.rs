//! Mobmind - Tick-Driven Behavior Scheduling Engine for Game Monsters

pub mod arena;
pub mod conditions;
pub mod core;
pub mod enemy;
pub mod memory;
pub mod monster;
pub mod monsters;
pub mod schedule;
pub mod scheduler;
pub mod senses;
pub mod spatial;
pub mod squad;
pub mod world;
