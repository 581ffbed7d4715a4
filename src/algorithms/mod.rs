//! Core positioning algorithms

pub mod trilateration;

pub use trilateration::Trilaterator;
