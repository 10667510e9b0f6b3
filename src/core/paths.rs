use std::path::{Path, PathBuf};

pub struct VaultPaths {
    pub root: PathBuf,
}

impl VaultPaths {
    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Vault-relative path with forward slashes, the identity used by the index.
    ///
    /// Returns `None` for paths outside the vault.
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if rel.is_empty() {
            None
        } else {
            Some(rel)
        }
    }

    /// Absolute path for a vault-relative one
    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn is_note(path: &Path) -> bool {
        path.extension().map(|e| e == "md").unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_uses_forward_slashes() {
        let paths = VaultPaths::from_root(PathBuf::from("/vault"));
        let note = Path::new("/vault").join("Projects").join("Plan.md");
        assert_eq!(paths.relative(&note).as_deref(), Some("Projects/Plan.md"));
    }

    #[test]
    fn test_relative_outside_vault() {
        let paths = VaultPaths::from_root(PathBuf::from("/vault"));
        assert_eq!(paths.relative(Path::new("/elsewhere/a.md")), None);
        assert_eq!(paths.relative(Path::new("/vault")), None);
    }

    #[test]
    fn test_is_note() {
        assert!(VaultPaths::is_note(Path::new("a/b.md")));
        assert!(!VaultPaths::is_note(Path::new("a/b.png")));
        assert!(!VaultPaths::is_note(Path::new("a/md")));
    }
}
