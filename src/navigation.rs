// src/navigation.rs
use std::path::{Path, PathBuf};

use crate::error::NavigationError;

/// Visited directories, root first, current last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStack {
    dirs: Vec<PathBuf>,
}

impl NavigationStack {
    pub fn new() -> Self {
        NavigationStack { dirs: Vec::new() }
    }

    pub fn rooted(root: PathBuf) -> Self {
        NavigationStack { dirs: vec![root] }
    }

    pub fn push(&mut self, dir: PathBuf) {
        self.dirs.push(dir);
    }

    /// Drops the current directory and returns the one beneath it. The root
    /// is never popped; at one element the stack is left as is.
    pub fn pop(&mut self) -> Result<&Path, NavigationError> {
        if self.dirs.len() <= 1 {
            return Err(NavigationError::EmptyStack);
        }
        self.dirs.pop();
        self.dirs.last().map(PathBuf::as_path).ok_or(NavigationError::EmptyStack)
    }

    pub fn reset_to(&mut self, root: PathBuf) {
        self.dirs.clear();
        self.dirs.push(root);
    }

    /// Keeps elements `0..=index`, making `index` the current directory.
    pub fn truncate_to(&mut self, index: usize) -> Option<&Path> {
        if index >= self.dirs.len() {
            return None;
        }
        self.dirs.truncate(index + 1);
        self.current()
    }

    pub fn current(&self) -> Option<&Path> {
        self.dirs.last().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(paths: &[&str]) -> NavigationStack {
        let mut s = NavigationStack::new();
        for p in paths {
            s.push(PathBuf::from(p));
        }
        s
    }

    #[test]
    fn test_push_and_pop() {
        let mut s = stack(&["/r", "/r/a", "/r/a/b"]);
        assert_eq!(s.pop(), Ok(Path::new("/r/a")));
        assert_eq!(s.current(), Some(Path::new("/r/a")));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_pop_at_root_is_refused() {
        let mut s = NavigationStack::rooted(PathBuf::from("/r"));
        assert_eq!(s.pop(), Err(NavigationError::EmptyStack));
        assert_eq!(s.len(), 1);
        assert_eq!(s.current(), Some(Path::new("/r")));

        let mut empty = NavigationStack::new();
        assert_eq!(empty.pop(), Err(NavigationError::EmptyStack));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut s = stack(&["/r", "/r/a"]);
        s.reset_to(PathBuf::from("/home"));
        assert_eq!(s.as_slice(), &[PathBuf::from("/home")]);
    }

    #[test]
    fn test_truncate_to_breadcrumb() {
        let mut s = stack(&["/r", "/r/a", "/r/a/b", "/r/a/b/c"]);
        assert_eq!(s.truncate_to(1), Some(Path::new("/r/a")));
        assert_eq!(s.len(), 2);
        assert_eq!(s.truncate_to(5), None);
        assert_eq!(s.len(), 2);
    }
}
