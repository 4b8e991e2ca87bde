pub mod calendar;
pub mod oauth;
pub mod sheets;
