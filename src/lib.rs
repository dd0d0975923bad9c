pub mod alphabet;
pub mod dfa;
pub mod parse;

pub use alphabet::Alphabet;
pub use dfa::{
    minimize, minimize_with, reachable, Dfa, DfaBuilder, DfaError, MinimizeConfig, StateId,
};
