pub mod health;
pub mod poll_controllers;
