pub mod application;
pub mod catalog;
pub mod confirmation_code;
pub mod token;
pub mod user;
