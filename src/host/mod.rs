//! A host whose advertised features come from configuration.

use tracing::debug;

use crate::capability::{
    Artifact, ByteCodeEngine, ContextOptions, DrawingSurface, Host, Interface, RenderingContext,
};
use crate::common::{AcquireError, EngineError};
use crate::configs::{HostProfile, SurfaceProfile};

const MODULE_MAGIC: &[u8] = b"\0asm";
const MODULE_VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// Engine that accepts any well-formed version 1 module header.
#[derive(Debug, Default)]
pub struct HeaderEngine;

impl ByteCodeEngine for HeaderEngine {
    fn compile(&self, bytes: &[u8]) -> Result<Artifact, EngineError> {
        if bytes.len() < 8 || !bytes.starts_with(MODULE_MAGIC) {
            return Err(EngineError::Compile("missing module magic".into()));
        }
        if bytes[4..8] != MODULE_VERSION {
            return Err(EngineError::Compile(format!(
                "unsupported module version {:02x?}",
                &bytes[4..8]
            )));
        }
        Ok(Artifact::Module)
    }

    fn instantiate(&self, module: &Artifact) -> Result<Artifact, EngineError> {
        match module {
            Artifact::Module => Ok(Artifact::Instance),
            other => Err(EngineError::Instantiate(format!("not a module: {:?}", other))),
        }
    }
}

pub struct ProfileHost {
    profile: HostProfile,
    engine: Option<HeaderEngine>,
}

impl ProfileHost {
    pub fn new(profile: HostProfile) -> Self {
        let engine = profile.byte_code.then_some(HeaderEngine);
        Self { profile, engine }
    }

    /// A fresh, unbound drawing surface shaped by the profile.
    pub fn surface(&self) -> ProfileSurface {
        ProfileSurface::new(self.profile.surface.clone())
    }
}

impl Host for ProfileHost {
    fn has_interface(&self, interface: Interface) -> bool {
        self.profile.interfaces.contains(&interface)
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        self.profile
            .supported_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime))
    }

    fn byte_code_engine(&self) -> Option<&dyn ByteCodeEngine> {
        self.engine.as_ref().map(|e| e as &dyn ByteCodeEngine)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContext {
    pub name: String,
    pub preserve_drawing_buffer: bool,
    queryable: bool,
}

impl RenderingContext for ProfileContext {
    fn has_parameter_query(&self) -> bool {
        self.queryable
    }
}

/// Surface that binds to the first usable context it hands out.
///
/// Asking again for the bound name returns another handle to it; any other
/// name fails.
pub struct ProfileSurface {
    profile: SurfaceProfile,
    bound: Option<String>,
}

impl ProfileSurface {
    pub fn new(profile: SurfaceProfile) -> Self {
        Self {
            profile,
            bound: None,
        }
    }

    pub fn bound(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    fn lists(list: &[String], name: &str) -> bool {
        list.iter().any(|n| n == name)
    }
}

impl DrawingSurface for ProfileSurface {
    type Context = ProfileContext;

    fn get_context(
        &mut self,
        name: &str,
        options: &ContextOptions,
    ) -> Result<Option<ProfileContext>, AcquireError> {
        if let Some(bound) = &self.bound {
            if bound != name {
                return Err(AcquireError::AlreadyBound(bound.clone()));
            }
        }
        if Self::lists(&self.profile.failing_contexts, name) {
            return Err(AcquireError::Rejected {
                name: name.to_string(),
                reason: "listed as failing".into(),
            });
        }

        let queryable = Self::lists(&self.profile.contexts, name);
        if !queryable && !Self::lists(&self.profile.limited_contexts, name) {
            return Ok(None);
        }

        if queryable && self.bound.is_none() {
            debug!("surface bound to `{}`", name);
            self.bound = Some(name.to_string());
        }
        Ok(Some(ProfileContext {
            name: name.to_string(),
            preserve_drawing_buffer: options.preserve_drawing_buffer,
            queryable,
        }))
    }

    fn supports_offscreen_transfer(&self) -> bool {
        self.profile.offscreen_transfer && self.bound.is_none()
    }
}
