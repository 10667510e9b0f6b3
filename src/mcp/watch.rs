//! Keeps the note index in step with the vault while the server runs

use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::search::engine::NoteResolver;

/// Start watching the vault root. The watcher stops when the returned handle
/// is dropped.
pub fn spawn_watcher(resolver: Arc<NoteResolver>) -> Result<RecommendedWatcher> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_relevant(&event.kind) => {
            // Receiver gone means the server is shutting down
            let _ = tx.send(event.paths);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Watch error: {}", e),
    })?;
    watcher.watch(&resolver.vault_paths().root, RecursiveMode::Recursive)?;
    tracing::info!("Watching {}", resolver.vault_paths().root.display());

    tokio::spawn(async move {
        while let Some(paths) = rx.recv().await {
            // File reads and vault walks block, keep them off the async workers
            let resolver = Arc::clone(&resolver);
            let synced =
                tokio::task::spawn_blocking(move || reindex_paths(&resolver, &paths)).await;
            if let Err(e) = synced {
                tracing::warn!("Reindex task failed: {}", e);
            }
        }
    });

    Ok(watcher)
}

fn reindex_paths(resolver: &NoteResolver, paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = resolver.reindex_path(path) {
            tracing::warn!("Failed to reindex {}: {}", path.display(), e);
        }
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reindex_paths_off_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("Old")).unwrap();
        std::fs::write(root.join("Old/Plan.md"), "plan").unwrap();

        let resolver = Arc::new(
            NoteResolver::new(root.clone(), &crate::config::Config::default()).unwrap(),
        );
        resolver.index_vault().unwrap();
        std::fs::rename(root.join("Old"), root.join("New")).unwrap();

        let paths = vec![root.join("Old"), root.join("New")];
        let worker = Arc::clone(&resolver);
        tokio::task::spawn_blocking(move || reindex_paths(&worker, &paths))
            .await
            .unwrap();

        assert!(resolver.get("Old/Plan.md").is_none());
        assert!(resolver.get("New/Plan.md").is_some());
    }

    #[test]
    fn test_relevant_events() {
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_relevant(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
        assert!(!is_relevant(&EventKind::Other));
    }
}
