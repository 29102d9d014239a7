/// Index of a node in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeId(pub(crate) usize);

/// A single trie node.
///
/// `present` is a 256-bit bitmap marking which byte values have a child.
/// `children` holds the arena indices of those children in ascending byte
/// order, so the child for byte `b` sits at `rank(&present, b)`. A stored
/// value is represented by `value_idx` pointing into the trie's value table;
/// presence is `value_idx.is_some()`, never a sentinel payload.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) present: [u64; 4],
    pub(crate) children: Vec<NodeId>,
    pub(crate) value_idx: Option<usize>,
}

impl Node {
    pub(crate) fn new() -> Self {
        Node {
            present: [0; 4],
            children: Vec::new(),
            value_idx: None,
        }
    }

    /// True when the node carries no value and no children, i.e. it must not
    /// remain linked into the trie after a mutation.
    pub(crate) fn is_expendable(&self) -> bool {
        self.value_idx.is_none() && self.children.is_empty()
    }
}

// Bitmap utilities over the 256-bit presence map.

pub(crate) fn set_bit(a: &mut [u64; 4], k: u8) {
    a[(k / 64) as usize] |= 1u64 << (k % 64);
}

pub(crate) fn clear_bit(a: &mut [u64; 4], k: u8) {
    a[(k / 64) as usize] &= !(1u64 << (k % 64));
}

pub(crate) fn test_bit(a: &[u64; 4], k: u8) -> bool {
    (a[(k / 64) as usize] >> (k % 64)) & 0x01 != 0
}

/// Number of set bits strictly below `k`; the child-slot position for byte `k`.
pub(crate) fn rank(a: &[u64; 4], k: u8) -> usize {
    let word = (k / 64) as usize;
    let mut res = 0;
    for w in a.iter().take(word) {
        res += w.count_ones() as usize;
    }
    let mask = (1u64 << (k % 64)) - 1;
    res + (a[word] & mask).count_ones() as usize
}
