pub mod notify;
pub mod style;
pub mod view;
