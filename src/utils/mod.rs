pub mod error;
pub mod poll_validator;
pub mod vote_processor;
