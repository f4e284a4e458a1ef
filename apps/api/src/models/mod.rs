pub mod application;
pub mod job;
pub mod pet;
pub mod problem;
pub mod search;
pub mod user;
