pub mod attendance;
pub mod conflict;
pub mod department;
pub mod employee;
pub mod error;
pub mod pagination;
pub mod validation;
