// Core trading domain entities and value objects
pub mod account;
pub mod money;
pub mod types;
