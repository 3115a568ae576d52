//! Application services for the message subsystem.
//!
//! Services sit at the boundary between the domain and the transport layer,
//! turning wire text into messages and back.

mod factory;

pub use factory::MessageFactory;
