pub mod agreement;
pub mod request;
pub mod store;
