pub mod matching_engine;

pub use self::matching_engine::MatchingEngine;
