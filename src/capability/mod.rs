//! Capability probing.
//!
//! Each [`Capability`] maps to exactly one probe. Negative answers are plain
//! values, never errors.

pub mod bytecode;
pub mod context;
pub mod features;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use bytecode::*;
pub use context::*;
pub use features::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    RenderingContext,
    OffscreenTransfer,
    OffscreenSurface,
    ByteCode,
    AdaptiveContainer,
    HardwareDecode,
    FrameEncode,
}

impl Capability {
    /// Report order. `OffscreenTransfer` precedes `RenderingContext` because
    /// attaching a context can take away the surface's ability to transfer.
    pub const ALL: [Capability; 7] = [
        Capability::OffscreenTransfer,
        Capability::RenderingContext,
        Capability::OffscreenSurface,
        Capability::ByteCode,
        Capability::AdaptiveContainer,
        Capability::HardwareDecode,
        Capability::FrameEncode,
    ];
}

#[derive(Debug)]
pub enum ProbeOutcome<C> {
    Context(C),
    Supported(bool),
    /// Every rendering context candidate was rejected.
    Unavailable,
}

impl<C> ProbeOutcome<C> {
    pub fn is_available(&self) -> bool {
        match self {
            ProbeOutcome::Context(_) => true,
            ProbeOutcome::Supported(supported) => *supported,
            ProbeOutcome::Unavailable => false,
        }
    }

    pub fn into_context(self) -> Option<C> {
        match self {
            ProbeOutcome::Context(ctx) => Some(ctx),
            _ => None,
        }
    }
}

/// Availability of every capability, keyed by capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilityReport(BTreeMap<Capability, bool>);

impl CapabilityReport {
    pub fn get(&self, capability: Capability) -> Option<bool> {
        self.0.get(&capability).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.0.iter().map(|(c, s)| (*c, *s))
    }
}

/// Dispatches [`Capability`] queries against one host.
pub struct CapabilityProbe<'h, H: Host + ?Sized> {
    host: &'h H,
    byte_code: &'h ByteCodeSupport,
}

impl<'h, H: Host + ?Sized> CapabilityProbe<'h, H> {
    /// Uses the process-wide byte-code cell.
    pub fn new(host: &'h H) -> Self {
        Self::with_byte_code_cache(host, process_byte_code())
    }

    pub fn with_byte_code_cache(host: &'h H, byte_code: &'h ByteCodeSupport) -> Self {
        Self { host, byte_code }
    }

    /// Answers a host-level capability.
    ///
    /// `None` for `RenderingContext` and `OffscreenTransfer`: those depend on
    /// a drawing surface and are answered by [`Self::probe`].
    pub fn supports(&self, capability: Capability) -> Option<bool> {
        let supported = match capability {
            Capability::RenderingContext | Capability::OffscreenTransfer => {
                debug!("{:?} needs a drawing surface", capability);
                return None;
            }
            Capability::OffscreenSurface => supports_offscreen_surface(self.host),
            Capability::ByteCode => self.byte_code.get_or_probe(self.host.byte_code_engine()),
            Capability::AdaptiveContainer => supports_adaptive_container(self.host),
            Capability::HardwareDecode => supports_hardware_decode(self.host),
            Capability::FrameEncode => supports_frame_encode(self.host),
        };
        Some(supported)
    }

    /// Answers any capability. [`Capability::RenderingContext`] attaches a
    /// context to `surface` on success; the handle goes to the caller.
    pub fn probe<S: DrawingSurface>(
        &self,
        capability: Capability,
        surface: &mut S,
    ) -> ProbeOutcome<S::Context> {
        match capability {
            Capability::RenderingContext => match acquire_rendering_context(surface) {
                Some(ctx) => ProbeOutcome::Context(ctx),
                None => ProbeOutcome::Unavailable,
            },
            Capability::OffscreenTransfer => {
                ProbeOutcome::Supported(supports_offscreen_transfer(surface))
            }
            other => ProbeOutcome::Supported(self.supports(other).unwrap_or_default()),
        }
    }

    /// Runs every probe once. The acquired context, if any, is dropped.
    pub fn probe_all<S: DrawingSurface>(&self, surface: &mut S) -> CapabilityReport {
        let report = Capability::ALL
            .iter()
            .map(|&capability| {
                let available = self.probe(capability, surface).is_available();
                debug!("{:?}: {}", capability, available);
                (capability, available)
            })
            .collect();
        CapabilityReport(report)
    }
}

#[cfg(test)]
mod tests {
    use super::bytecode::tests::CountingEngine;
    use super::context::tests::{Behavior, ScriptedSurface};
    use super::features::tests::StubHost;
    use super::*;

    struct EngineHost {
        inner: StubHost,
        engine: Option<CountingEngine>,
    }

    impl Host for EngineHost {
        fn has_interface(&self, interface: Interface) -> bool {
            self.inner.has_interface(interface)
        }

        fn is_type_supported(&self, mime: &str) -> bool {
            self.inner.is_type_supported(mime)
        }

        fn byte_code_engine(&self) -> Option<&dyn ByteCodeEngine> {
            self.engine.as_ref().map(|e| e as &dyn ByteCodeEngine)
        }
    }

    fn full_host() -> EngineHost {
        let mut inner = StubHost::with(&[
            Interface::OffscreenCanvas,
            Interface::MediaSource,
            Interface::VideoDecoder,
        ]);
        inner.types.push(ADAPTIVE_PROBE_TYPE.to_string());
        EngineHost {
            inner,
            engine: Some(CountingEngine::default()),
        }
    }

    #[test]
    fn rendering_context_is_handed_to_caller() {
        let host = full_host();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);
        let mut surface = ScriptedSurface::new(vec![("experimental-webgl", Behavior::Ok)]);

        let ctx = probe
            .probe(Capability::RenderingContext, &mut surface)
            .into_context()
            .unwrap();
        assert_eq!(ctx.name, "experimental-webgl");
    }

    #[test]
    fn rendering_context_unavailable_is_not_an_error() {
        let host = StubHost::default();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);
        let mut surface = ScriptedSurface::new(vec![("webgl", Behavior::Fail)]);

        let outcome = probe.probe(Capability::RenderingContext, &mut surface);
        assert!(matches!(outcome, ProbeOutcome::Unavailable));
        assert!(!outcome.is_available());
    }

    #[test]
    fn supports_dispatches_host_probes() {
        let host = full_host();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);

        assert_eq!(probe.supports(Capability::OffscreenSurface), Some(true));
        assert_eq!(probe.supports(Capability::AdaptiveContainer), Some(true));
        assert_eq!(probe.supports(Capability::HardwareDecode), Some(true));
        assert_eq!(probe.supports(Capability::ByteCode), Some(true));
        assert_eq!(probe.supports(Capability::FrameEncode), Some(false));
    }

    #[test]
    fn surface_bound_capabilities_have_no_host_answer() {
        let host = full_host();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);

        assert_eq!(probe.supports(Capability::RenderingContext), None);
        assert_eq!(probe.supports(Capability::OffscreenTransfer), None);
    }

    #[test]
    fn byte_code_answer_is_memoized_across_calls() {
        let host = full_host();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);

        assert_eq!(probe.supports(Capability::ByteCode), Some(true));
        assert_eq!(probe.supports(Capability::ByteCode), Some(true));
        assert_eq!(host.engine.as_ref().unwrap().compiles(), 1);
    }

    #[test]
    fn repeated_probe_all_is_idempotent() {
        let host = full_host();
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);
        let mut surface = ScriptedSurface::new(vec![("webgl", Behavior::Ok)]);
        surface.offscreen = true;

        let first = probe.probe_all(&mut surface);
        let second = probe.probe_all(&mut surface);
        assert_eq!(first, second);
        assert_eq!(first.iter().count(), Capability::ALL.len());
        assert_eq!(first.get(Capability::RenderingContext), Some(true));
        assert_eq!(first.get(Capability::OffscreenTransfer), Some(true));
        assert_eq!(first.get(Capability::FrameEncode), Some(false));
    }

    #[test]
    fn report_serializes_as_camel_case_map() {
        let host = StubHost::with(&[Interface::VideoEncoder]);
        let cache = ByteCodeSupport::new();
        let probe = CapabilityProbe::with_byte_code_cache(&host, &cache);
        let mut surface = ScriptedSurface::new(vec![]);

        let json = serde_json::to_value(probe.probe_all(&mut surface)).unwrap();
        assert_eq!(json["frameEncode"], true);
        assert_eq!(json["byteCode"], false);
        assert_eq!(json["renderingContext"], false);
    }
}
