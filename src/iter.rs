use crate::arena::{NodeArena, ROOT};
use crate::node::{test_bit, NodeId};
use crate::{ByteTrie, WILDCARD};

/// Depth-first walk over every valued node reachable from a starting node,
/// yielding the full key and its value-table index.
///
/// Children are pushed in descending byte order so the stack pops them in
/// ascending order; together with parent-before-descendants emission this
/// makes the walk lexicographic.
pub(crate) struct DfsEntries<'a> {
    arena: &'a NodeArena,
    stack: Vec<(NodeId, Vec<u8>)>,
}

impl<'a> DfsEntries<'a> {
    pub(crate) fn from_root(arena: &'a NodeArena) -> Self {
        DfsEntries {
            arena,
            stack: vec![(ROOT, Vec::new())],
        }
    }

    /// Starts the walk at the node reached by `prefix`. A broken prefix path
    /// yields an empty iteration.
    pub(crate) fn from_prefix(arena: &'a NodeArena, prefix: Vec<u8>) -> Self {
        let stack = match arena.walk(ROOT, &prefix) {
            Some(start) => vec![(start, prefix)],
            None => Vec::new(),
        };
        DfsEntries { arena, stack }
    }
}

impl Iterator for DfsEntries<'_> {
    type Item = (Vec<u8>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node_id, path)) = self.stack.pop() {
            let node = self.arena.node(node_id);

            for byte in (0..=255u8).rev() {
                if test_bit(&node.present, byte) {
                    let child = self.arena.child_unchecked(node_id, byte);
                    let mut child_path = path.clone();
                    child_path.push(byte);
                    self.stack.push((child, child_path));
                }
            }

            if let Some(value_idx) = node.value_idx {
                return Some((path, value_idx));
            }
        }

        None
    }
}

/// An iterator over the key-value pairs of a `ByteTrie`, in lexicographic
/// key order.
///
/// This struct is created by the [`iter`] and [`prefix_iter`] methods on
/// [`ByteTrie`].
///
/// [`iter`]: ByteTrie::iter
/// [`prefix_iter`]: ByteTrie::prefix_iter
pub struct Iter<'a, T> {
    pub(crate) values: &'a [Option<T>],
    pub(crate) inner: DfsEntries<'a>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Vec<u8>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((key, value_idx)) = self.inner.next() {
            if let Some(value) = self.values.get(value_idx).and_then(Option::as_ref) {
                return Some((key, value));
            }
        }
        None
    }
}

/// An iterator over the keys of a `ByteTrie`, in lexicographic order.
///
/// This struct is created by the [`keys`] and [`prefix_keys`] methods on
/// [`ByteTrie`].
///
/// [`keys`]: ByteTrie::keys
/// [`prefix_keys`]: ByteTrie::prefix_keys
pub struct Keys<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<T> Iterator for Keys<'_, T> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `ByteTrie`, in lexicographic key order.
///
/// This struct is created by the [`values`] and [`prefix_values`] methods on
/// [`ByteTrie`].
///
/// [`values`]: ByteTrie::values
/// [`prefix_values`]: ByteTrie::prefix_values
pub struct Values<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over the keys matching a fixed-length wildcard pattern, in
/// lexicographic order.
///
/// This struct is created by the [`match_keys`] method on [`ByteTrie`].
///
/// [`match_keys`]: ByteTrie::match_keys
pub struct MatchKeys<'a> {
    arena: &'a NodeArena,
    pattern: Vec<u8>,
    stack: Vec<(NodeId, Vec<u8>)>,
}

impl<'a> MatchKeys<'a> {
    pub(crate) fn new(arena: &'a NodeArena, pattern: Vec<u8>) -> Self {
        MatchKeys {
            arena,
            pattern,
            stack: vec![(ROOT, Vec::new())],
        }
    }
}

impl Iterator for MatchKeys<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node_id, path)) = self.stack.pop() {
            let node = self.arena.node(node_id);

            // Candidates have exactly the pattern's length; never descend
            // past it.
            if path.len() == self.pattern.len() {
                if node.value_idx.is_some() {
                    return Some(path);
                }
                continue;
            }

            let want = self.pattern[path.len()];
            if want == WILDCARD {
                for byte in (0..=255u8).rev() {
                    if test_bit(&node.present, byte) {
                        let child = self.arena.child_unchecked(node_id, byte);
                        let mut child_path = path.clone();
                        child_path.push(byte);
                        self.stack.push((child, child_path));
                    }
                }
            } else if let Some(child) = self.arena.child(node_id, want) {
                let mut child_path = path;
                child_path.push(want);
                self.stack.push((child, child_path));
            }
        }

        None
    }
}

/// An owning iterator over the key-value pairs of a `ByteTrie`.
///
/// This struct is created when a `ByteTrie` is consumed using `into_iter()`.
pub struct IntoIter<T> {
    values: Vec<Option<T>>,
    arena: NodeArena,
    stack: Vec<(NodeId, Vec<u8>)>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (Vec<u8>, T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node_id, path)) = self.stack.pop() {
            let node = self.arena.node(node_id);

            for byte in (0..=255u8).rev() {
                if test_bit(&node.present, byte) {
                    let child = self.arena.child_unchecked(node_id, byte);
                    let mut child_path = path.clone();
                    child_path.push(byte);
                    self.stack.push((child, child_path));
                }
            }

            if let Some(value_idx) = node.value_idx {
                if let Some(value) = self.values.get_mut(value_idx).and_then(Option::take) {
                    return Some((path, value));
                }
            }
        }

        None
    }
}

impl<T> IntoIterator for ByteTrie<T> {
    type Item = (Vec<u8>, T);
    type IntoIter = IntoIter<T>;

    /// Consumes the trie into an iterator yielding owned key-value pairs in
    /// lexicographic key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 1);
    /// trie.insert("b", 2);
    ///
    /// for (key, value) in trie {
    ///     println!("{}: {}", String::from_utf8_lossy(&key), value);
    /// }
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            values: self.values,
            arena: self.arena,
            stack: vec![(ROOT, Vec::new())],
        }
    }
}

impl<'a, T> IntoIterator for &'a ByteTrie<T> {
    type Item = (Vec<u8>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
