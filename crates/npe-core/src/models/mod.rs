pub mod case;
pub mod request;
pub mod scenario;
