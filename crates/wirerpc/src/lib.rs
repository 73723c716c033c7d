//! # WireRPC
//!
//! Typed remote procedure calls over the `wirepack` codec.
//!
//! ## Architecture
//!
//! A service lists its methods once ([`Service::export`]). From that list each side
//! builds the same [`Exports`] table, so a method item such as `Calculator::double`
//! maps to the same function id on client and server without any schema crossing
//! the wire.
//!
//! - **Client**: [`Client::call`] resolves the `(instance, function)` pair from a
//!   [`ServiceHandle`], encodes the argument tuple into a [`ParameterSet`], hands it
//!   to a [`Transport`], and returns a filled [`ResultSlot`] or nothing.
//! - **Server**: [`Server::dispatch`] finds the instance, then the [`Procedure`] for
//!   the function id, which decodes the arguments, invokes the method, and encodes
//!   the result into the caller's buffer.
//!
//! Dispatch is synchronous. Only transports are `async`.

pub mod ids;
pub mod method;
pub mod params;
pub mod procedure;
pub mod export;
pub mod frame;
pub mod config;
pub mod server;
pub mod transport;
pub mod client;

pub use wirepack;

pub use ids::CallIdentifier;
pub use ids::FunctionId;
pub use ids::InstanceId;

pub use method::Method;
pub use method::MethodKey;
pub use method::MethodPtr;
pub use method::Signature;

pub use params::ParameterSet;
pub use params::ResponseHandler;
pub use params::ResultSlot;

pub use procedure::CallState;
pub use procedure::DispatchError;
pub use procedure::Dispatched;
pub use procedure::Procedure;
pub use procedure::TypedProcedure;

pub use export::ExportError;
pub use export::Exports;
pub use export::Service;
pub use export::ServiceHandle;

pub use frame::RequestFrame;
pub use frame::ResponseFrame;
pub use frame::Status;

pub use config::ClientConfig;
pub use config::ServerConfig;

pub use server::Server;

pub use transport::FramedTransport;
pub use transport::Link;
pub use transport::LocalLink;
pub use transport::Transport;
pub use transport::TransportError;

pub use client::CallError;
pub use client::Client;
