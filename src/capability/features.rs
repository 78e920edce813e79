//! Side-effect free feature checks against a [`Host`].

use serde::{Deserialize, Serialize};

use super::bytecode::ByteCodeEngine;
use super::context::DrawingSurface;

/// MIME type the media-source interface must accept for adaptive playback.
pub const ADAPTIVE_PROBE_TYPE: &str = r#"video/mp4; codecs="avc1.64002A""#;

/// Named global interfaces a host may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interface {
    OffscreenCanvas,
    MediaSource,
    VideoDecoder,
    VideoEncoder,
}

/// The hosting runtime's feature-advertisement surface.
pub trait Host {
    fn has_interface(&self, interface: Interface) -> bool;

    /// Only consulted when [`Interface::MediaSource`] is present.
    fn is_type_supported(&self, _mime: &str) -> bool {
        false
    }

    fn byte_code_engine(&self) -> Option<&dyn ByteCodeEngine> {
        None
    }
}

pub fn supports_offscreen_transfer<S: DrawingSurface + ?Sized>(surface: &S) -> bool {
    surface.supports_offscreen_transfer()
}

pub fn supports_offscreen_surface<H: Host + ?Sized>(host: &H) -> bool {
    host.has_interface(Interface::OffscreenCanvas)
}

pub fn supports_adaptive_container<H: Host + ?Sized>(host: &H) -> bool {
    host.has_interface(Interface::MediaSource) && host.is_type_supported(ADAPTIVE_PROBE_TYPE)
}

pub fn supports_hardware_decode<H: Host + ?Sized>(host: &H) -> bool {
    host.has_interface(Interface::VideoDecoder)
}

pub fn supports_frame_encode<H: Host + ?Sized>(host: &H) -> bool {
    host.has_interface(Interface::VideoEncoder)
}
