pub mod http_client;

pub mod in_flight;

pub mod request;

pub use http_client::{HttpClient, ReqwestHttpClient};
pub use in_flight::{GatePolicy, RequestGate, Ticket};
pub use request::ApiRequest;
