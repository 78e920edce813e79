//! Rendering context acquisition with ordered fallback.
//!
//! A surface is asked for each candidate context name in turn. The canonical
//! name comes first and the legacy/vendor-prefixed names follow; the order is
//! never changed at runtime. Failures of any single candidate stay local.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::common::AcquireError;

/// Context names tried by [`acquire_rendering_context`], in priority order.
pub const CONTEXT_CANDIDATES: [&str; 4] = ["webgl", "experimental-webgl", "moz-webgl", "webkit-3d"];

/// Options passed with every acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Keep the drawing buffer after a frame is presented instead of clearing it.
    pub preserve_drawing_buffer: bool,
}

impl ContextOptions {
    pub const PRESERVING: Self = Self {
        preserve_drawing_buffer: true,
    };
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self::PRESERVING
    }
}

/// A context handed out by a [`DrawingSurface`].
pub trait RenderingContext {
    /// Whether the context exposes the parameter query entry point.
    ///
    /// Contexts without it are unusable and get rejected.
    fn has_parameter_query(&self) -> bool;
}

/// Caller-owned drawing surface.
///
/// Attaching a context is a one-time, irreversible action on the surface.
pub trait DrawingSurface {
    type Context: RenderingContext;

    /// `Ok(None)` means the surface does not know the name.
    fn get_context(
        &mut self,
        name: &str,
        options: &ContextOptions,
    ) -> Result<Option<Self::Context>, AcquireError>;

    /// Whether control of the surface can be moved to an offscreen worker.
    fn supports_offscreen_transfer(&self) -> bool {
        false
    }
}

/// Outcome of asking the surface for one candidate.
#[derive(Debug)]
pub enum Attempt<C> {
    Accepted(C),
    Rejected,
}

fn attempt<S: DrawingSurface>(surface: &mut S, name: &str) -> Attempt<S::Context> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        surface
            .get_context(name, &ContextOptions::PRESERVING)
            .map(|ctx| ctx.filter(|c| c.has_parameter_query()))
    }));

    match result {
        Ok(Ok(Some(ctx))) => Attempt::Accepted(ctx),
        Ok(Ok(None)) => {
            debug!("context `{}` unavailable or missing parameter query", name);
            Attempt::Rejected
        }
        Ok(Err(e)) => {
            debug!("context `{}` failed: {}", name, e);
            Attempt::Rejected
        }
        Err(_) => {
            warn!("surface panicked while acquiring `{}`", name);
            Attempt::Rejected
        }
    }
}

/// Acquires the first usable rendering context from [`CONTEXT_CANDIDATES`].
///
/// Returns `None` once every candidate has been rejected. Never panics and
/// never reports an error.
pub fn acquire_rendering_context<S: DrawingSurface>(surface: &mut S) -> Option<S::Context> {
    acquire_with_candidates(surface, &CONTEXT_CANDIDATES)
}

/// Same as [`acquire_rendering_context`] with an explicit candidate list.
pub fn acquire_with_candidates<S: DrawingSurface>(
    surface: &mut S,
    candidates: &[&str],
) -> Option<S::Context> {
    for name in candidates {
        if let Attempt::Accepted(ctx) = attempt(surface, name) {
            debug!("acquired rendering context `{}`", name);
            return Some(ctx);
        }
    }

    debug!("no rendering context among {} candidates", candidates.len());
    None
}
