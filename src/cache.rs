// src/cache.rs
//! Session-scoped cache: the last used filename and breadcrumb depth
//! survive across dialog opens for the lifetime of the owning session.

#[derive(Debug, Default, Clone)]
pub struct SessionCache {
    file_name: Option<String>,
    depth_dir: Option<usize>,
}

impl SessionCache {
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, name: &str) {
        self.file_name = Some(name.to_string());
    }

    pub fn depth_dir(&self) -> usize {
        self.depth_dir.unwrap_or(0)
    }

    pub fn set_depth_dir(&mut self, depth: usize) {
        self.depth_dir = Some(depth);
    }

    /// Cleared when a dialog resolves or is cancelled.
    pub fn clear_depth(&mut self) {
        self.depth_dir = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_survives_depth_clear() {
        let mut cache = SessionCache::default();
        cache.set_file_name("out.json");
        cache.set_depth_dir(2);
        cache.clear_depth();
        assert_eq!(cache.file_name(), Some("out.json"));
        assert_eq!(cache.depth_dir(), 0);
    }
}
