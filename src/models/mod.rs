pub mod poll_models;
