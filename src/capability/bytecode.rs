//! Executable byte-code support.
//!
//! Presence of an engine is not enough: the probe compiles and instantiates
//! the smallest valid module and checks what comes back. The answer cannot
//! change while the process runs, so it is computed once.

use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::common::EngineError;

/// Magic `\0asm` followed by version 1 and no sections.
pub const MINIMAL_MODULE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

/// What an engine hands back from compile or instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Module,
    Instance,
    /// Anything else; an engine that returns this is not trusted.
    Foreign,
}

pub trait ByteCodeEngine: Send + Sync {
    fn compile(&self, bytes: &[u8]) -> Result<Artifact, EngineError>;

    fn instantiate(&self, module: &Artifact) -> Result<Artifact, EngineError>;
}

fn run_minimal_module(engine: &dyn ByteCodeEngine) -> Result<bool, EngineError> {
    let module = engine.compile(&MINIMAL_MODULE)?;
    if module != Artifact::Module {
        return Ok(false);
    }
    Ok(engine.instantiate(&module)? == Artifact::Instance)
}

/// Runs the probe without memoization.
///
/// `None` (no engine on the host) reports `false`, as does any compile or
/// instantiation failure, including a panicking engine.
pub fn probe_byte_code(engine: Option<&dyn ByteCodeEngine>) -> bool {
    let Some(engine) = engine else {
        debug!("no byte-code engine on host");
        return false;
    };

    match panic::catch_unwind(AssertUnwindSafe(|| run_minimal_module(engine))) {
        Ok(Ok(supported)) => supported,
        Ok(Err(e)) => {
            debug!("byte-code probe failed: {}", e);
            false
        }
        Err(_) => {
            warn!("byte-code engine panicked during probe");
            false
        }
    }
}

/// Memoized probe result.
///
/// Concurrent first callers block on the same initialization; the probe runs
/// at most once per cell.
#[derive(Debug, Default)]
pub struct ByteCodeSupport {
    cell: OnceLock<bool>,
}

impl ByteCodeSupport {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_probe(&self, engine: Option<&dyn ByteCodeEngine>) -> bool {
        *self.cell.get_or_init(|| probe_byte_code(engine))
    }

    /// Cached answer, if the probe already ran.
    pub fn get(&self) -> Option<bool> {
        self.cell.get().copied()
    }
}

static PROCESS_BYTE_CODE: ByteCodeSupport = ByteCodeSupport::new();

/// The process-wide cell. The engine passed on the first probe decides the
/// answer for the rest of the process.
pub fn process_byte_code() -> &'static ByteCodeSupport {
    &PROCESS_BYTE_CODE
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    pub(crate) struct CountingEngine {
        pub compiles: AtomicUsize,
        pub mode: Mode,
    }

    #[derive(Default, Clone, Copy)]
    pub(crate) enum Mode {
        #[default]
        Working,
        CompileError,
        WrongKind,
        Panics,
        Slow,
    }

    impl CountingEngine {
        pub(crate) fn with_mode(mode: Mode) -> Self {
            Self {
                compiles: AtomicUsize::new(0),
                mode,
            }
        }

        pub(crate) fn compiles(&self) -> usize {
            self.compiles.load(Ordering::SeqCst)
        }
    }

    impl ByteCodeEngine for CountingEngine {
        fn compile(&self, bytes: &[u8]) -> Result<Artifact, EngineError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            assert_eq!(bytes, MINIMAL_MODULE);
            match self.mode {
                Mode::Working => Ok(Artifact::Module),
                Mode::CompileError => Err(EngineError::Compile("validation disabled".into())),
                Mode::WrongKind => Ok(Artifact::Foreign),
                Mode::Panics => panic!("engine crashed"),
                Mode::Slow => {
                    std::thread::sleep(Duration::from_millis(50));
                    Ok(Artifact::Module)
                }
            }
        }

        fn instantiate(&self, module: &Artifact) -> Result<Artifact, EngineError> {
            assert_eq!(*module, Artifact::Module);
            Ok(Artifact::Instance)
        }
    }

    #[test]
    fn missing_engine_is_unsupported() {
        assert!(!probe_byte_code(None));
        assert!(!ByteCodeSupport::new().get_or_probe(None));
    }

    #[test]
    fn working_engine_is_supported() {
        let engine = CountingEngine::default();
        assert!(probe_byte_code(Some(&engine)));
    }

    #[test]
    fn failures_report_false() {
        for mode in [Mode::CompileError, Mode::WrongKind, Mode::Panics] {
            let engine = CountingEngine::with_mode(mode);
            assert!(!probe_byte_code(Some(&engine)));
            assert_eq!(engine.compiles(), 1);
        }
    }

    #[test]
    fn second_call_does_not_recompile() {
        let engine = CountingEngine::default();
        let support = ByteCodeSupport::new();
        assert_eq!(support.get(), None);

        assert!(support.get_or_probe(Some(&engine)));
        assert!(support.get_or_probe(Some(&engine)));
        assert_eq!(engine.compiles(), 1);
        assert_eq!(support.get(), Some(true));
    }

    #[test]
    fn cached_answer_ignores_later_engines() {
        let support = ByteCodeSupport::new();
        assert!(!support.get_or_probe(None));

        let engine = CountingEngine::default();
        assert!(!support.get_or_probe(Some(&engine)));
        assert_eq!(engine.compiles(), 0);
    }

    #[test]
    fn concurrent_first_use_probes_once() {
        let engine = CountingEngine::with_mode(Mode::Slow);
        let support = ByteCodeSupport::new();

        let results: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| support.get_or_probe(Some(&engine))))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.iter().all(|&r| r));
        assert_eq!(engine.compiles(), 1);
    }

    #[test]
    fn process_cell_is_stable() {
        let engine = CountingEngine::default();
        let first = process_byte_code().get_or_probe(Some(&engine));
        assert_eq!(process_byte_code().get_or_probe(None), first);
        assert_eq!(process_byte_code().get(), Some(first));
    }
}
