pub mod catalog;
pub mod dashboard;
pub mod draft;
pub mod quote;
