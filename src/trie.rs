use std::fmt;
use std::ops::{Index, IndexMut};

use crate::arena::{NodeArena, ROOT};
use crate::as_bytes::AsBytes;
use crate::iter::{DfsEntries, Iter, Keys, MatchKeys, Values};

/// The pattern byte that matches any single key byte in [`ByteTrie::match_keys`].
pub const WILDCARD: u8 = b'.';

/// A `ByteTrie` is a map from byte-string keys to values, stored in an
/// uncompressed 256-way trie.
///
/// Beyond exact lookup it supports the queries a trie is built for: prefix
/// enumeration, longest-prefix-of, and fixed-length wildcard matching. All
/// enumeration is in lexicographic (ascending byte) key order.
///
/// # Features
///
/// - Lookups in O(k) where k is the key length, independent of map size
/// - Prefix enumeration and prefix iterators
/// - Longest stored prefix of a query string
/// - Single-byte wildcard pattern matching (`.` matches any byte)
///
/// # Examples
///
/// ```
/// use bytetrie::ByteTrie;
///
/// let mut trie = ByteTrie::new();
///
/// trie.insert("stos", 1);
/// trie.insert("stosy", 2);
/// trie.insert("stosowany", 3);
///
/// assert_eq!(trie.get("stosy"), Some(&2));
/// assert!(!trie.contains_key("sto"));
///
/// // The longest stored key that prefixes the query.
/// assert_eq!(trie.longest_prefix_of("stosowanie"), b"stos");
///
/// // Lexicographic prefix enumeration.
/// let keys: Vec<_> = trie.prefix_keys("stos").collect();
/// assert_eq!(keys, [b"stos".to_vec(), b"stosowany".to_vec(), b"stosy".to_vec()]);
///
/// // Removal prunes the path it empties.
/// assert_eq!(trie.remove("stosy"), Some(2));
/// assert_eq!(trie.len(), 2);
/// ```
pub struct ByteTrie<T> {
    pub(crate) arena: NodeArena,
    pub(crate) values: Vec<Option<T>>,
    pub(crate) free_values: Vec<usize>,
    pub(crate) len: usize,
}

impl<T> ByteTrie<T> {
    /// Creates a new empty `ByteTrie`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let trie: ByteTrie<i32> = ByteTrie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        ByteTrie {
            arena: NodeArena::new(),
            values: Vec::new(),
            free_values: Vec::new(),
            len: 0,
        }
    }

    /// Creates a new `ByteTrie` whose value table can hold at least
    /// `capacity` entries without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteTrie {
            arena: NodeArena::new(),
            values: Vec::with_capacity(capacity),
            free_values: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of keys stored in the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// assert_eq!(trie.len(), 0);
    ///
    /// trie.insert("a", 1);
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the trie stores no keys.
    ///
    /// This is a key-count check, not a structural one: a trie whose root has
    /// children but no valued node anywhere is still empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every key from the trie, releasing all nodes but keeping the
    /// trie usable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 1);
    /// trie.insert("b", 2);
    ///
    /// trie.clear();
    /// assert!(trie.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.arena.reset();
        self.values.clear();
        self.free_values.clear();
        self.len = 0;
    }

    /// Inserts a key-value pair into the trie, creating missing nodes along
    /// the key's path. If the key is already present its value is replaced.
    ///
    /// The empty key is legal and addresses the root.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 1);
    /// trie.insert("a", 2);
    /// assert_eq!(trie.get("a"), Some(&2));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn insert<K: AsBytes>(&mut self, key: K, value: T) {
        let bytes = key.as_bytes();
        let mut cur = ROOT;

        for &byte in bytes {
            cur = match self.arena.child(cur, byte) {
                Some(child) => child,
                None => self.arena.add_child(cur, byte),
            };
        }

        if let Some(idx) = self.arena.node(cur).value_idx {
            self.values[idx] = Some(value);
        } else {
            let idx = if let Some(free) = self.free_values.pop() {
                self.values[free] = Some(value);
                free
            } else {
                self.values.push(Some(value));
                self.values.len() - 1
            };
            self.arena.node_mut(cur).value_idx = Some(idx);
            self.len += 1;
        }
    }

    /// Returns a reference to the value stored for `key`, or `None` when the
    /// key's path is broken or its terminal node carries no value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("abc", 1);
    /// assert_eq!(trie.get("abc"), Some(&1));
    /// assert_eq!(trie.get("ab"), None);
    /// assert_eq!(trie.get("abd"), None);
    /// ```
    pub fn get<K: AsBytes>(&self, key: K) -> Option<&T> {
        let node = self.arena.walk(ROOT, key.as_bytes())?;
        let idx = self.arena.node(node).value_idx?;
        self.values[idx].as_ref()
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 1);
    ///
    /// if let Some(value) = trie.get_mut("a") {
    ///     *value = 10;
    /// }
    ///
    /// assert_eq!(trie.get("a"), Some(&10));
    /// ```
    pub fn get_mut<K: AsBytes>(&mut self, key: K) -> Option<&mut T> {
        let node = self.arena.walk(ROOT, key.as_bytes())?;
        let idx = self.arena.node(node).value_idx?;
        self.values[idx].as_mut()
    }

    /// Returns `true` if the trie stores a value for `key`.
    ///
    /// Presence is tracked per node, independent of the payload, so a key
    /// mapped to `0` (or any other value) is still contained.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 0);
    /// assert!(trie.contains_key("a"));
    /// assert!(!trie.contains_key("b"));
    /// ```
    pub fn contains_key<K: AsBytes>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` from the trie, returning its value if it was present.
    ///
    /// After the value is cleared the key's path is pruned bottom-up: every
    /// node left with no value and no children is unlinked from its parent,
    /// so deletion never leaves dead branches behind. Removing an absent key
    /// is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("a", 1);
    ///
    /// assert_eq!(trie.remove("a"), Some(1));
    /// assert_eq!(trie.remove("a"), None);
    /// ```
    pub fn remove<K: AsBytes>(&mut self, key: K) -> Option<T> {
        let bytes = key.as_bytes();

        let mut path = Vec::with_capacity(bytes.len() + 1);
        path.push((ROOT, 0u8));
        let mut cur = ROOT;
        for &byte in bytes {
            cur = self.arena.child(cur, byte)?;
            path.push((cur, byte));
        }

        let idx = self.arena.node_mut(cur).value_idx.take()?;
        let value = self.values[idx].take();
        self.free_values.push(idx);
        self.len -= 1;

        // Walk back up; stop at the first node still carrying a value or
        // other children. The root is never unlinked.
        for i in (1..path.len()).rev() {
            let (node, byte) = path[i];
            if !self.arena.node(node).is_expendable() {
                break;
            }
            let (parent, _) = path[i - 1];
            self.arena.remove_child(parent, byte);
        }

        value
    }

    /// Returns the longest prefix of `query` that is a stored key, as a
    /// subslice of `query`. The result is empty when no stored key prefixes
    /// the query.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("stos", 1);
    /// trie.insert("stosowany", 2);
    ///
    /// assert_eq!(trie.longest_prefix_of("stosowanie"), b"stos");
    /// assert_eq!(trie.longest_prefix_of("stosowanyy"), b"stosowany");
    /// assert_eq!(trie.longest_prefix_of("zzz"), b"");
    /// ```
    pub fn longest_prefix_of<'q, K: AsBytes + ?Sized>(&self, query: &'q K) -> &'q [u8] {
        let bytes = query.as_bytes();
        let mut cur = ROOT;
        let mut best = 0;

        for (depth, &byte) in bytes.iter().enumerate() {
            match self.arena.child(cur, byte) {
                Some(child) => cur = child,
                None => break,
            }
            if self.arena.node(cur).value_idx.is_some() {
                best = depth + 1;
            }
        }

        &bytes[..best]
    }

    /// Returns an iterator over all keys, in lexicographic order.
    ///
    /// Equivalent to `prefix_keys("")`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("b", 2);
    /// trie.insert("a", 1);
    ///
    /// let keys: Vec<_> = trie.keys().collect();
    /// assert_eq!(keys, [b"a".to_vec(), b"b".to_vec()]);
    /// ```
    pub fn keys(&self) -> Keys<'_, T> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over all key-value pairs, in lexicographic key
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            values: &self.values,
            inner: DfsEntries::from_root(&self.arena),
        }
    }

    /// Returns an iterator over all values, in lexicographic key order.
    pub fn values(&self) -> Values<'_, T> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over all keys that start with `prefix`, in
    /// lexicographic order. A key equal to the prefix is included. When no
    /// node matches the prefix the iterator is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("banan", 1);
    /// trie.insert("baner", 2);
    /// trie.insert("stos", 3);
    ///
    /// let keys: Vec<_> = trie.prefix_keys("ban").collect();
    /// assert_eq!(keys, [b"banan".to_vec(), b"baner".to_vec()]);
    /// ```
    pub fn prefix_keys<K: AsBytes>(&self, prefix: K) -> Keys<'_, T> {
        Keys {
            inner: self.prefix_iter(prefix),
        }
    }

    /// Returns an iterator over the key-value pairs whose keys start with
    /// `prefix`, in lexicographic key order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("apple", 1);
    /// trie.insert("application", 2);
    /// trie.insert("banana", 3);
    ///
    /// let mut iter = trie.prefix_iter("app");
    /// assert_eq!(iter.next().unwrap().1, &1);
    /// assert_eq!(iter.next().unwrap().1, &2);
    /// assert!(iter.next().is_none());
    /// ```
    pub fn prefix_iter<K: AsBytes>(&self, prefix: K) -> Iter<'_, T> {
        Iter {
            values: &self.values,
            inner: DfsEntries::from_prefix(&self.arena, prefix.as_bytes().to_vec()),
        }
    }

    /// Returns an iterator over the values whose keys start with `prefix`,
    /// in lexicographic key order.
    pub fn prefix_values<K: AsBytes>(&self, prefix: K) -> Values<'_, T> {
        Values {
            inner: self.prefix_iter(prefix),
        }
    }

    /// Returns an iterator over the keys matching `pattern`, in
    /// lexicographic order.
    ///
    /// The pattern is matched byte for byte; the [`WILDCARD`] byte (`.`)
    /// matches any single key byte. Only keys of exactly the pattern's
    /// length are candidates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bytetrie::ByteTrie;
    /// let mut trie = ByteTrie::new();
    /// trie.insert("banan", 1);
    /// trie.insert("bananan", 2);
    /// trie.insert("baner", 3);
    ///
    /// let keys: Vec<_> = trie.match_keys("ban..").collect();
    /// assert_eq!(keys, [b"banan".to_vec(), b"baner".to_vec()]);
    /// ```
    pub fn match_keys<K: AsBytes>(&self, pattern: K) -> MatchKeys<'_> {
        MatchKeys::new(&self.arena, pattern.as_bytes().to_vec())
    }

    #[cfg(test)]
    pub(crate) fn live_node_count(&self) -> usize {
        self.arena.live_count()
    }
}

impl<T> Default for ByteTrie<T> {
    /// Creates a new empty `ByteTrie`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ByteTrie<T> {
    fn clone(&self) -> Self {
        ByteTrie {
            arena: self.arena.clone(),
            values: self.values.clone(),
            free_values: self.free_values.clone(),
            len: self.len,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ByteTrie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map_debug = f.debug_map();

        for (key, value) in self.iter() {
            let key_display = match std::str::from_utf8(&key) {
                Ok(s) => s.to_string(),
                Err(_) => format!("{:?}", key),
            };
            map_debug.entry(&key_display, value);
        }

        map_debug.finish()
    }
}

impl<T> fmt::Display for ByteTrie<T> {
    /// Diagnostic dump: every key on its own line, in lexicographic order,
    /// rendered as lossy UTF-8.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in self.keys() {
            writeln!(f, "{}", String::from_utf8_lossy(&key))?;
        }
        Ok(())
    }
}

impl<T: PartialEq> PartialEq for ByteTrie<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        // Both sides iterate lexicographically, so pairwise comparison
        // decides equality.
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for ByteTrie<T> {}

impl<T, Q: ?Sized> Index<&Q> for ByteTrie<T>
where
    Q: AsBytes,
{
    type Output = T;

    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<T, Q: ?Sized> IndexMut<&Q> for ByteTrie<T>
where
    Q: AsBytes,
{
    fn index_mut(&mut self, key: &Q) -> &mut Self::Output {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<K: AsBytes, T> Extend<(K, T)> for ByteTrie<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: AsBytes, T> FromIterator<(K, T)> for ByteTrie<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut trie = ByteTrie::new();
        trie.extend(iter);
        trie
    }
}

impl<K: AsBytes, T, const N: usize> From<[(K, T); N]> for ByteTrie<T> {
    fn from(array: [(K, T); N]) -> Self {
        let mut trie = ByteTrie::with_capacity(N);
        trie.extend(array);
        trie
    }
}
