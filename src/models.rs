pub mod area;
pub mod draft;
pub mod persona;
pub mod store;
