pub mod bundle;
pub mod errors;
pub mod order;
pub mod ports;
pub mod reconcile;
pub mod session;
