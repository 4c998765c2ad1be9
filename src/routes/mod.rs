pub mod dashboard;
pub mod events_ws;
pub mod health;
pub mod stats;
pub mod view;
