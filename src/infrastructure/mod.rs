pub mod http_api;
pub mod object_storage;
pub mod session_file;
