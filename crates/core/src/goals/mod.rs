//! Goals module - domain models.

mod goals_model;


pub use goals_model::Goal;
