//! Media environment probing and stream diagnostics.
//!
//! - [`capability`]: which rendering/decoding mechanisms a host offers.
//! - [`codec`]: codec negotiation strings from configuration records.
//! - [`rate`]: windowed throughput of an incoming byte stream.

pub mod capability;
pub mod codec;
pub mod common;
pub mod configs;
pub mod host;
pub mod rate;

pub use capability::{Capability, CapabilityProbe, CapabilityReport, ProbeOutcome};
pub use codec::{CodecDescriptor, parse_codec_descriptor};
pub use rate::{Clock, MonotonicClock, RateSampler};
