pub mod mfapi_provider;

pub use mfapi_provider::MfApiProvider;
