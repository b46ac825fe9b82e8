pub mod events;
pub mod health;
pub mod products;
pub mod upload;
