//! Key path of the node currently being walked.
//!
//! One segment per map member descended into, borrowed from the document.
//! List elements don't add a segment, so a callback bound to a list element
//! sees the list's own key as the current one.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path<'k> {
    keys: Vec<&'k str>,
}

impl<'k> Path<'k> {
    pub fn root() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.keys.len()
    }

    pub fn push(&mut self, key: &'k str) {
        self.keys.push(key);
    }

    pub fn pop(&mut self) -> Option<&'k str> {
        self.keys.pop()
    }

    /// Run `f` one level deeper, popping the frame again however `f` returns.
    pub fn descend<R>(&mut self, key: &'k str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.keys.push(key);
        let out = f(self);
        self.keys.pop();
        out
    }

    /// Key of the current frame (`None` at the root).
    pub fn key(&self) -> Option<&'k str> {
        self.ancestor(0)
    }

    /// Key of the enclosing frame; for an open-key map member's children this
    /// is the member's actual key.
    pub fn parent_key(&self) -> Option<&'k str> {
        self.ancestor(1)
    }

    /// `ancestor(0)` is the current key, `ancestor(1)` its parent, ...
    pub fn ancestor(&self, up: usize) -> Option<&'k str> {
        let idx = self.keys.len().checked_sub(up + 1)?;
        self.keys.get(idx).copied()
    }

    /// Root-first segments.
    pub fn keys(&self) -> &[&'k str] {
        &self.keys
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("/");
        }
        for key in &self.keys {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

impl<'k> FromIterator<&'k str> for Path<'k> {
    fn from_iter<I: IntoIterator<Item = &'k str>>(iter: I) -> Self {
        Self { keys: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_slash() {
        let path = Path::root();
        assert_eq!(path.render(), "/");
        assert!(path.is_root());
        assert_eq!(path.key(), None);
    }

    #[test]
    fn nested_keys_render_root_first() {
        let mut path = Path::root();
        path.push("sub");
        path.push("abc");
        assert_eq!(path.render(), "/sub/abc");
        assert_eq!(path.to_string(), "/sub/abc");
    }

    #[test]
    fn ancestors_walk_backwards() {
        let path: Path = ["sub", "abc", "foo"].into_iter().collect();
        assert_eq!(path.key(), Some("foo"));
        assert_eq!(path.parent_key(), Some("abc"));
        assert_eq!(path.ancestor(2), Some("sub"));
        assert_eq!(path.ancestor(3), None);
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn descend_pops_on_the_way_out() {
        let mut path = Path::root();
        let seen = path.descend("foo", |p| {
            p.descend("bar", |p| p.render())
        });
        assert_eq!(seen, "/foo/bar");
        assert!(path.is_root());

        let failed: Result<(), &str> = path.descend("foo", |_| Err("nope"));
        assert!(failed.is_err());
        assert!(path.is_root());
    }
}
