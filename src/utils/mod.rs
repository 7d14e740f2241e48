pub mod links;
pub mod threads;
