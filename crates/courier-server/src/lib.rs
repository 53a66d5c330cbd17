//! Courier dispatch coordinator.
//!
//! Binds the in-memory dispatch core to a JSON REST API. The transport
//! layer is a thin wrapper: routing, JSON decoding, and status-code
//! mapping live here; all state and lifecycle rules live in
//! [`courier_core::DispatchStore`].

pub mod http;
