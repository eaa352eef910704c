pub mod auth_service;
pub mod bundle_editor;
pub mod busy;
pub mod notice;
pub mod order_export;
pub mod review_service;
pub mod session;
