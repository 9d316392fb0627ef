pub mod manager;
pub mod mountain;
pub mod organiser;
pub mod path;
pub mod walker;
