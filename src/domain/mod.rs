pub mod filter;
pub mod form;
pub mod models;
pub mod roster;
pub mod schema;
pub mod shift_time;
