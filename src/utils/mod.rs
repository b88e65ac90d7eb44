pub mod io;
pub mod validation;
