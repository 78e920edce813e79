use serde::{Deserialize, Serialize};

use crate::capability::Interface;

/// Declarative description of what a hosting runtime advertises.
///
/// Drives `host::ProfileHost`, which is what the CLI probes.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HostProfile {
    /// Global interfaces present on the host.
    pub interfaces: Vec<Interface>,
    /// MIME types the media-source interface accepts.
    pub supported_types: Vec<String>,
    /// Whether a byte-code engine is exposed at all.
    pub byte_code: bool,
    pub surface: SurfaceProfile,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceProfile {
    /// Context names the surface can hand out.
    pub contexts: Vec<String>,
    /// Context names whose acquisition fails outright.
    pub failing_contexts: Vec<String>,
    /// Context names handed out without a parameter query.
    pub limited_contexts: Vec<String>,
    pub offscreen_transfer: bool,
}
