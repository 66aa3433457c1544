pub mod admin;
pub mod catalog;
pub mod dispatch;
pub mod identity;
pub mod pin;
pub mod shared;
pub mod survey;
