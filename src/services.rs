pub mod areas;
pub mod gate;
pub mod registration;
pub mod results;
pub mod session;
pub mod validation;
