//! In-memory transport used by the integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use linkfs::{path, Error, ProgressFn, RemoteEntry, Result, Transport};

/// Log capture for test runs; opt in with `RUST_LOG=linkfs=debug`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct Remote {
    /// Directory paths in insertion order; listings preserve this order.
    dirs: Vec<String>,
    /// File path and content, insertion order.
    files: Vec<(String, Bytes)>,
    /// Path and declared size of the currently open write session.
    open_session: Option<(String, u64)>,
}

impl Remote {
    fn dir_exists(&self, p: &str) -> bool {
        self.dirs.iter().any(|d| d == p)
    }

    fn entry_exists(&self, p: &str) -> bool {
        self.dir_exists(p) || self.files.iter().any(|(f, _)| f == p)
    }

    fn children(&self, parent: &str) -> Vec<RemoteEntry> {
        let mut out = Vec::new();
        for d in &self.dirs {
            if path::parent(d).as_deref() == Some(parent) {
                out.push(RemoteEntry::directory(
                    parent,
                    path::file_name(d).unwrap_or_default(),
                ));
            }
        }
        for (f, content) in &self.files {
            if path::parent(f).as_deref() == Some(parent) {
                out.push(RemoteEntry::file(
                    parent,
                    path::file_name(f).unwrap_or_default(),
                    content.len() as u64,
                ));
            }
        }
        out
    }
}

#[derive(Default)]
struct Faults {
    /// Paths whose listing fails with the given error.
    listing: Vec<(String, Error)>,
    /// Error injected into the next `read_file`.
    read: Option<Error>,
    /// Error injected into the next `write_file`.
    write: Option<Error>,
    /// Whether `reset_sessions` reports failure.
    reset: bool,
}

/// Scriptable in-memory remote filesystem.
pub struct MockTransport {
    remote: Mutex<Remote>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        let t = Self {
            remote: Mutex::new(Remote::default()),
            faults: Mutex::new(Faults::default()),
            calls: Mutex::new(Vec::new()),
        };
        t.remote.lock().unwrap().dirs.push("/".to_string());
        t
    }

    pub fn add_dir(&self, p: &str) {
        self.remote.lock().unwrap().dirs.push(path::normalize(p));
    }

    pub fn add_file(&self, p: &str, content: &[u8]) {
        self.remote
            .lock()
            .unwrap()
            .files
            .push((path::normalize(p), Bytes::copy_from_slice(content)));
    }

    pub fn file_content(&self, p: &str) -> Option<Bytes> {
        self.remote
            .lock()
            .unwrap()
            .files
            .iter()
            .find(|(f, _)| f == p)
            .map(|(_, c)| c.clone())
    }

    pub fn fail_listing(&self, p: &str, err: Error) {
        self.faults
            .lock()
            .unwrap()
            .listing
            .push((path::normalize(p), err));
    }

    pub fn fail_next_read(&self, err: Error) {
        self.faults.lock().unwrap().read = Some(err);
    }

    pub fn fail_next_write(&self, err: Error) {
        self.faults.lock().unwrap().write = Some(err);
    }

    pub fn fail_reset(&self) {
        self.faults.lock().unwrap().reset = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn list_directory(&self, p: &str) -> Result<Vec<RemoteEntry>> {
        let p = path::normalize(p);
        self.record(&format!("list {p}"));

        if let Some(idx) = {
            let faults = self.faults.lock().unwrap();
            faults.listing.iter().position(|(fp, _)| *fp == p)
        } {
            let (_, err) = self.faults.lock().unwrap().listing.remove(idx);
            return Err(err);
        }

        let remote = self.remote.lock().unwrap();
        if !remote.dir_exists(&p) {
            return Err(Error::NotFound(p));
        }
        Ok(remote.children(&p))
    }

    async fn open_for_write(&self, p: &str, size: u64) -> Result<()> {
        let p = path::normalize(p);
        self.record(&format!("open_for_write {p}"));

        let mut remote = self.remote.lock().unwrap();
        let parent = path::parent(&p).ok_or_else(|| Error::InvalidArgument(p.clone()))?;
        if !remote.dir_exists(&parent) {
            return Err(Error::NotFound(parent));
        }
        remote.open_session = Some((p, size));
        Ok(())
    }

    async fn write_file(&self, data: Bytes, progress: &ProgressFn<'_>) -> Result<()> {
        self.record("write_file");

        let injected = self.faults.lock().unwrap().write.take();
        if let Some(err) = injected {
            progress(30);
            return Err(err);
        }

        // Chunked delivery: report percents across yield points so a
        // broken single-flight lock would show up as interleaving.
        for percent in [20u8, 60, 100] {
            progress(percent);
            tokio::task::yield_now().await;
        }

        let mut remote = self.remote.lock().unwrap();
        let (p, _declared) = remote
            .open_session
            .take()
            .ok_or_else(|| Error::Transport("no open write session".to_string()))?;
        remote.files.retain(|(f, _)| *f != p);
        remote.files.push((p, data));
        Ok(())
    }

    async fn read_file(&self, p: &str, progress: &ProgressFn<'_>) -> Result<Bytes> {
        let p = path::normalize(p);
        self.record(&format!("read {p}"));

        let injected = self.faults.lock().unwrap().read.take();
        if let Some(err) = injected {
            progress(40);
            return Err(err);
        }

        let content = {
            let remote = self.remote.lock().unwrap();
            remote
                .files
                .iter()
                .find(|(f, _)| *f == p)
                .map(|(_, c)| c.clone())
                .ok_or(Error::NotFound(p))?
        };

        for percent in [10u8, 55, 100] {
            progress(percent);
            tokio::task::yield_now().await;
        }
        Ok(content)
    }

    async fn remove_file(&self, p: &str) -> Result<()> {
        let p = path::normalize(p);
        self.record(&format!("remove_file {p}"));

        let mut remote = self.remote.lock().unwrap();
        let before = remote.files.len();
        remote.files.retain(|(f, _)| *f != p);
        if remote.files.len() == before {
            return Err(Error::NotFound(p));
        }
        Ok(())
    }

    async fn remove_directory(&self, p: &str) -> Result<()> {
        let p = path::normalize(p);
        self.record(&format!("remove_directory {p}"));

        let mut remote = self.remote.lock().unwrap();
        if !remote.dir_exists(&p) {
            return Err(Error::NotFound(p));
        }
        if !remote.children(&p).is_empty() {
            return Err(Error::NotEmpty(p));
        }
        remote.dirs.retain(|d| *d != p);
        Ok(())
    }

    async fn create_directory(&self, p: &str) -> Result<()> {
        let p = path::normalize(p);
        self.record(&format!("create_directory {p}"));

        let mut remote = self.remote.lock().unwrap();
        if remote.entry_exists(&p) {
            return Err(Error::AlreadyExists(p));
        }
        let parent = path::parent(&p).ok_or_else(|| Error::InvalidArgument(p.clone()))?;
        if !remote.dir_exists(&parent) {
            return Err(Error::NotFound(parent));
        }
        remote.dirs.push(p);
        Ok(())
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        let old_path = path::normalize(old_path);
        let new_path = path::normalize(new_path);
        self.record(&format!("rename {old_path} {new_path}"));

        let mut remote = self.remote.lock().unwrap();
        if remote.entry_exists(&new_path) {
            return Err(Error::AlreadyExists(new_path));
        }

        if remote.dir_exists(&old_path) {
            let old_prefix = format!("{old_path}/");
            let new_prefix = format!("{new_path}/");
            for d in &mut remote.dirs {
                if *d == old_path {
                    *d = new_path.clone();
                } else if let Some(rest) = d.strip_prefix(&old_prefix) {
                    *d = format!("{new_prefix}{rest}");
                }
            }
            for (f, _) in &mut remote.files {
                if let Some(rest) = f.strip_prefix(&old_prefix) {
                    *f = format!("{new_prefix}{rest}");
                }
            }
            Ok(())
        } else if remote.files.iter().any(|(f, _)| *f == old_path) {
            for (f, _) in &mut remote.files {
                if *f == old_path {
                    *f = new_path.clone();
                }
            }
            Ok(())
        } else {
            Err(Error::NotFound(old_path))
        }
    }

    async fn reset_sessions(&self) -> Result<()> {
        self.record("reset_sessions");

        let _ = self.remote.lock().unwrap().open_session.take();
        if self.faults.lock().unwrap().reset {
            return Err(Error::Transport("reset refused".to_string()));
        }
        Ok(())
    }
}
