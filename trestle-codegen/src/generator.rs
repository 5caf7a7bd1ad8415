//! Generation orchestration: output lifecycle, writer ordering, rollback.
//!
//! The orchestrator deletes and recreates the output directory, runs the
//! artifact writers strictly in order, and — on any failure or process
//! interruption — removes the directory again. Both the in-band error path
//! and the interrupt watcher route through the same [`RollbackScope`], so
//! cleanup logic exists exactly once and the output directory is always
//! complete or absent.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use trestle_core::write_file;
use trestle_design::LinkedApi;

use crate::error::GenerationError;
use crate::naming::Names;
use crate::writers::{
    Artifact, ContextsFile, ControllersFile, HrefsFile, MediaTypesFile, SecurityFile, TestsFile,
    UserTypesFile,
};

/// Generation options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Name of the generated package; also the output subdirectory name.
    pub package: String,
    /// Skip the test helper artifact.
    pub notest: bool,
    /// Where the design came from; used only in messages to the caller.
    pub design_source: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            package: "app".to_string(),
            notest: false,
            design_source: None,
        }
    }
}

/// Shared guard over the output directory.
///
/// Whichever of the error path or the interrupt watcher fires first wins;
/// the other sees the disarmed flag and does nothing.
#[derive(Debug, Clone)]
struct RollbackScope {
    dir: PathBuf,
    armed: Arc<AtomicBool>,
}

impl RollbackScope {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            armed: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Remove the output directory unless generation already completed.
    fn rollback(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    /// Mark generation complete; later rollbacks become no-ops.
    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

#[cfg(unix)]
mod watcher {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    use super::RollbackScope;

    /// Removes partial output before the process dies on SIGINT/SIGTERM.
    ///
    /// The watcher runs detached from the generation sequence and never
    /// touches design data; it only deletes filesystem output.
    pub(super) struct InterruptWatcher {
        handle: signal_hook::iterator::Handle,
        thread: Option<std::thread::JoinHandle<()>>,
    }

    impl InterruptWatcher {
        pub(super) fn spawn(scope: RollbackScope) -> std::io::Result<Self> {
            let mut signals = Signals::new([SIGINT, SIGTERM])?;
            let handle = signals.handle();
            let thread = std::thread::spawn(move || {
                if signals.forever().next().is_some() {
                    scope.rollback();
                    std::process::exit(130);
                }
            });
            Ok(Self {
                handle,
                thread: Some(thread),
            })
        }

        pub(super) fn stop(mut self) {
            self.handle.close();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

#[cfg(not(unix))]
mod watcher {
    use super::RollbackScope;

    pub(super) struct InterruptWatcher;

    impl InterruptWatcher {
        pub(super) fn spawn(_scope: RollbackScope) -> std::io::Result<Self> {
            Ok(Self)
        }

        pub(super) fn stop(self) {}
    }
}

use watcher::InterruptWatcher;

/// The application code generator.
pub struct Generator {
    out_dir: PathBuf,
    options: Options,
}

impl Generator {
    /// Create a generator writing into `<out_dir>/<package>`.
    pub fn new(out_dir: impl AsRef<Path>, options: Options) -> Self {
        let out_dir = out_dir.as_ref().join(&options.package);
        Self { out_dir, options }
    }

    /// The directory artifacts are written into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Generate every artifact, returning the written paths with the
    /// output directory first.
    ///
    /// Previous generated content is replaced, never merged. Identifier
    /// collisions abort before the directory is touched; any later failure
    /// removes the directory again, so no partial artifact set survives.
    pub fn generate(&self, api: &LinkedApi) -> Result<Vec<PathBuf>, GenerationError> {
        let mut names = Names::new(&self.options.package);
        self.reserve_identifiers(api, &mut names)?;

        if self.out_dir.exists() {
            std::fs::remove_dir_all(&self.out_dir)?;
        }
        std::fs::create_dir_all(&self.out_dir)?;

        let scope = RollbackScope::new(self.out_dir.clone());
        let watcher = InterruptWatcher::spawn(scope.clone())?;

        let result = self.run_writers(api, &mut names);
        watcher.stop();
        match result {
            Ok(files) => {
                scope.disarm();
                Ok(files)
            }
            Err(err) => {
                scope.rollback();
                Err(err)
            }
        }
    }

    /// Claim every derived identifier up front so naming collisions fail
    /// with the output directory untouched. Writers re-derive the same
    /// identifiers later, which is idempotent.
    fn reserve_identifiers(
        &self,
        api: &LinkedApi,
        names: &mut Names,
    ) -> Result<(), GenerationError> {
        for resource in api.resources.values() {
            if !resource.actions.is_empty() || !resource.file_servers.is_empty() {
                names.controller(&resource.name)?;
            }
            names.href(&resource.name)?;
            for action in resource.actions.values() {
                names.context(&action.name, &resource.name)?;
                if action.payload.is_some() {
                    names.unmarshal(&action.name, &resource.name)?;
                }
                if !self.options.notest {
                    for response in action.success_responses() {
                        names.test_helper(&action.name, &resource.name, &response.name)?;
                    }
                }
            }
        }
        for media_type in api.media_types.values() {
            if media_type.is_builtin() {
                continue;
            }
            names.media_type(&media_type.name, &media_type.identifier)?;
            for view in &media_type.views {
                if view.name != "default" {
                    names.view(&media_type.name, &view.name, &media_type.identifier)?;
                }
            }
        }
        for user_type in api.user_types.values() {
            names.user_type(&user_type.name)?;
        }
        Ok(())
    }

    /// Run the artifact writers in their fixed order.
    fn run_writers(
        &self,
        api: &LinkedApi,
        names: &mut Names,
    ) -> Result<Vec<PathBuf>, GenerationError> {
        let mut artifacts: Vec<Box<dyn Artifact>> =
            vec![Box::new(ContextsFile), Box::new(ControllersFile)];
        if !api.security_schemes.is_empty() {
            artifacts.push(Box::new(SecurityFile));
        }
        artifacts.push(Box::new(HrefsFile));
        artifacts.push(Box::new(MediaTypesFile));
        artifacts.push(Box::new(UserTypesFile));
        if !self.options.notest {
            artifacts.push(Box::new(TestsFile));
        }

        let mut files = vec![self.out_dir.clone()];
        for artifact in artifacts {
            let content = artifact.render(api, names)?;
            let path = self.out_dir.join(artifact.file_name());
            write_file(&path, &content)?;
            files.push(path);
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_scope_removes_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("out");
        std::fs::create_dir_all(&dir).unwrap();

        let scope = RollbackScope::new(dir.clone());
        scope.rollback();
        assert!(!dir.exists());

        // A second rollback against a recreated directory is a no-op.
        std::fs::create_dir_all(&dir).unwrap();
        scope.rollback();
        assert!(dir.exists());
    }

    #[test]
    fn test_disarm_prevents_rollback() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("out");
        std::fs::create_dir_all(&dir).unwrap();

        let scope = RollbackScope::new(dir.clone());
        scope.disarm();
        scope.rollback();
        assert!(dir.exists());
    }
}
