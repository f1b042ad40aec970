//! Core data structures shared across the pipeline

pub mod matrix;
pub mod point;
pub mod symbol;

pub use matrix::BitMatrix;
pub use point::Point;
pub use symbol::{Chunk, DecodedData, DecodedSymbol, ECLevel, SymbolLocation};
