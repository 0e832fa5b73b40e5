pub mod transport;

pub use transport::{FetchTransport, RequestPlan, RunTransport, TransportReply};
