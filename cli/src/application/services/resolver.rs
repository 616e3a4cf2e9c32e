//! Application service: locating orchestration assemblies on disk.
//!
//! Probes the folders BizTalk itself loads from, then user-supplied folders,
//! for `{simple name}.dll`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::ports::FileProbe;
use crate::domain::{AssemblyName, Installation, ProbingPolicy};

pub struct AssemblyResolver<'f, F: FileProbe> {
    files: &'f F,
    policy: ProbingPolicy,
    resolving: RefCell<HashSet<String>>,
}

impl<'f, F: FileProbe> AssemblyResolver<'f, F> {
    /// Probe the installation folders first, then `user_paths`.
    #[must_use]
    pub fn new(files: &'f F, installation: &Installation, user_paths: &[String]) -> Self {
        let system = installation.system_probing_paths();
        Self {
            files,
            policy: ProbingPolicy {
                paths: dedup_paths(system.iter().chain(user_paths)),
                skip_resources: true,
            },
            resolving: RefCell::new(HashSet::new()),
        }
    }

    /// Also try to resolve satellite `.resources` assemblies.
    #[must_use]
    pub fn resolving_resources(mut self) -> Self {
        self.policy.skip_resources = false;
        self
    }

    /// Folders probed, in order, with blanks and duplicates removed.
    #[must_use]
    pub fn probing_paths(&self) -> &[String] {
        &self.policy.paths
    }

    /// The rules applied here, for loaders that resolve dependencies themselves.
    #[must_use]
    pub fn policy(&self) -> &ProbingPolicy {
        &self.policy
    }

    /// Locate the file of `assembly`, if any probing folder has it.
    #[must_use]
    pub fn resolve(&self, assembly: &AssemblyName) -> Option<PathBuf> {
        self.resolve_and_load(assembly, Path::to_path_buf)
    }

    /// Locate `assembly` and hand its file to `load`.
    ///
    /// A nested request for the same assembly while `load` runs yields `None`,
    /// so a loader that triggers resolution of its own dependencies cannot recurse.
    pub fn resolve_and_load<T>(&self, assembly: &AssemblyName, load: impl FnOnce(&Path) -> T) -> Option<T> {
        if self.policy.skips(assembly) {
            return None;
        }
        if !self.resolving.borrow_mut().insert(assembly.name.clone()) {
            debug!(assembly = %assembly.name, "resolution already in progress");
            return None;
        }
        let _guard = ResolvingGuard {
            resolving: &self.resolving,
            name: &assembly.name,
        };

        let path = self.probe(assembly)?;
        Some(load(&path))
    }

    fn probe(&self, assembly: &AssemblyName) -> Option<PathBuf> {
        let file_name = format!("{}.dll", assembly.name);
        for folder in &self.policy.paths {
            let candidate = Path::new(folder).join(&file_name);
            debug!(path = %candidate.display(), "probing");
            if self.files.is_file(&candidate) {
                debug!(assembly = %assembly, path = %candidate.display(), "resolved");
                return Some(candidate);
            }
        }
        warn!(assembly = %assembly, "assembly not found in any probing folder");
        None
    }
}

struct ResolvingGuard<'a> {
    resolving: &'a RefCell<HashSet<String>>,
    name: &'a str,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.resolving.borrow_mut().remove(self.name);
    }
}

fn dedup_paths<'a>(paths: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.to_string()))
        .map(String::from)
        .collect()
}
