use std::{
    borrow::Borrow,
    cmp::{self, Ord, Ordering},
    collections::VecDeque,
    mem,
    ops::{Bound, Deref, DerefMut, RangeBounds},
};

use log::{debug, error};
use rand::Rng;

use crate::error::Error;

/// Llrb manage a single instance of in-memory ordered map using
/// [left-leaning-red-black][llrb] tree. Every node caches the size of
/// its sub-tree, which gives O(log n) [`Llrb::rank`] and [`Llrb::select`].
///
/// ```
/// use llrb_rank::Llrb;
///
/// let mut llrb: Llrb<i64, i64> = Llrb::new("myinstance");
/// for key in 0..10 {
///     llrb.put(key, key * 100);
/// }
/// assert_eq!(llrb.get(&4), Ok(400));
/// assert_eq!(llrb.rank(&4), 4);
/// assert_eq!(llrb.select(4), Ok(4));
/// ```
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    name: String,
    root: Option<Box<Node<K, V>>>,
}

/// Different ways to construct a new Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Create an empty instance of Llrb, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Llrb<K, V>
    where
        S: AsRef<str>,
    {
        Llrb {
            name: name.as_ref().to_string(),
            root: Default::default(),
        }
    }

    /// Create a new instance of Llrb tree and load it with entries
    /// from `iter`. Later entries for the same key overwrite the
    /// earlier ones.
    pub fn load_from<S, I>(name: S, iter: I) -> Llrb<K, V>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut llrb = Llrb::new(name);
        llrb.extend(iter);
        debug!("{}: loaded {} entries", llrb.name, llrb.len());
        llrb
    }

    // adopt a hand built tree, as is, without rebalancing.
    #[cfg(test)]
    pub(crate) fn from_root<S>(name: S, root: Box<Node<K, V>>) -> Llrb<K, V>
    where
        S: AsRef<str>,
    {
        Llrb {
            name: name.as_ref().to_string(),
            root: Some(root),
        }
    }
}

/// Maintenance API.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Llrb instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        size(self.root.as_ref().map(Deref::deref))
    }

    /// Same as [`Llrb::len`], named after the cached sub-tree size.
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<K, V>>())
    }
}

type Upsert<K, V> = (Box<Node<K, V>>, Option<V>);

type Delete<K, V> = (Option<Box<Node<K, V>>>, Option<V>);

type Delmin<K, V> = (Option<Box<Node<K, V>>>, Option<Box<Node<K, V>>>);

/// Write operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (mut root, old_value) = Llrb::upsert(self.root.take(), key, value);
        root.set_black();
        self.root = Some(root);
        old_value
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then delete is effectively a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains(key) {
            return None;
        }
        let root = self.root.take().map(Llrb::prime_root);
        let (root, old_value) = Llrb::do_delete(root, key);
        self.root = root.map(Llrb::blacken);
        old_value
    }

    /// Delete the entry with smallest key and return it.
    pub fn delete_min(&mut self) -> Result<(K, V), Error<K>> {
        let root = match self.root.take() {
            None => return Err(Error::Underflow),
            Some(root) => Llrb::prime_root(root),
        };
        let (root, min) = Llrb::do_delete_min(Some(root));
        self.root = root.map(Llrb::blacken);
        match min {
            Some(node) => Ok(node.into_entry()),
            None => panic!("delete_min(): fatal logic, call the programmer"),
        }
    }

    /// Delete the entry with largest key and return it.
    pub fn delete_max(&mut self) -> Result<(K, V), Error<K>> {
        let root = match self.root.take() {
            None => return Err(Error::Underflow),
            Some(root) => Llrb::prime_root(root),
        };
        let (root, max) = Llrb::do_delete_max(Some(root));
        self.root = root.map(Llrb::blacken);
        match max {
            Some(node) => Ok(node.into_entry()),
            None => panic!("delete_max(): fatal logic, call the programmer"),
        }
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * Root link is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * No red link leans right.
    /// * Number of blacks should be same under left child and right child.
    /// * Cached size of every node matches its sub-tree.
    /// * Make sure keys are in sorted order.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>> {
        let res = self.do_validate();
        if res.is_err() {
            error!("{}: validation failed", self.name);
        }
        res
    }
}

/// Read operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Result<V, Error<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_ref().map(Deref::deref);
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Ok(nref.value.clone()),
            };
        }
        Err(Error::NotFound)
    }

    /// Check whether key is present in this instance.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Return the smallest key.
    pub fn min(&self) -> Result<K, Error<K>> {
        let mut node = self.root.as_ref().map(Deref::deref).ok_or(Error::NotFound)?;
        while let Some(left) = node.left_deref() {
            node = left;
        }
        Ok(node.key.clone())
    }

    /// Return the largest key.
    pub fn max(&self) -> Result<K, Error<K>> {
        let mut node = self.root.as_ref().map(Deref::deref).ok_or(Error::NotFound)?;
        while let Some(right) = node.right_deref() {
            node = right;
        }
        Ok(node.key.clone())
    }

    /// Return the largest key less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.as_ref().map(Deref::deref);
        Llrb::floor_node(root, key).map(|nref| nref.key.clone())
    }

    /// Return the smallest key greater than or equal to `key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.as_ref().map(Deref::deref);
        Llrb::ceiling_node(root, key).map(|nref| nref.key.clone())
    }

    /// Return the number of keys strictly less than `key`. `key` need
    /// not be present in the index.
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut node, mut rank) = (self.root.as_ref().map(Deref::deref), 0);
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Greater => nref.left_deref(),
                Ordering::Less => {
                    rank += 1 + size(nref.left_deref());
                    nref.right_deref()
                }
                Ordering::Equal => return rank + size(nref.left_deref()),
            };
        }
        rank
    }

    /// Return the key that has exactly `k` smaller keys in the index,
    /// `k` must be within `[0, len())`.
    pub fn select(&self, k: usize) -> Result<K, Error<K>> {
        match self.select_node(k) {
            Some(nref) => Ok(nref.key.clone()),
            None => {
                let msg = format!("select({}) out of range [0, {})", k, self.len());
                Err(Error::InvalidArgument(msg))
            }
        }
    }

    /// Return the height of the tree, counted in links from root to the
    /// farthest leaf. Empty tree has height -1.
    pub fn height(&self) -> isize {
        Llrb::do_height(self.root.as_ref().map(Deref::deref))
    }

    /// Return a random entry from this index, every entry is equally
    /// likely to be picked.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(K, V)> {
        match self.len() {
            0 => None,
            n => {
                let nref = self.select_node(rng.gen_range(0, n))?;
                Some((nref.key.clone(), nref.value.clone()))
            }
        }
    }

    /// Return an iterator over all entries in this instance, in
    /// ascending order of keys.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut stack = vec![];
        push_left(&mut stack, self.root.as_ref().map(Deref::deref));
        Iter { stack }
    }

    /// Return an iterator over all keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// Return an iterator over all values, in ascending order of keys.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    /// Return all keys in breadth-first order, starting from root.
    pub fn level_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut queue = VecDeque::new();
        queue.push_back(self.root.as_ref().map(Deref::deref));
        while let Some(node) = queue.pop_front() {
            let nref = match node {
                None => continue,
                Some(nref) => nref,
            };
            keys.push(nref.key.clone());
            queue.push_back(nref.left_deref());
            queue.push_back(nref.right_deref());
        }
        keys
    }

    /// Range over all entries from low to high.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ToOwned<Owned = K> + ?Sized,
    {
        let low: Bound<K> = match range.start_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };
        let high: Bound<K> = match range.end_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };

        Range {
            root: self.root.as_ref().map(Deref::deref),
            stack: vec![],
            low,
            high,
            started: false,
        }
    }
}

impl<K, V> Extend<(K, V)> for Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn upsert(node: Option<Box<Node<K, V>>>, key: K, value: V) -> Upsert<K, V> {
        let mut node = match node {
            None => return (Node::new(key, value, false /*black*/), None),
            Some(node) => node,
        };

        let old_value = match node.key.cmp(&key) {
            Ordering::Greater => {
                let (left, o) = Llrb::upsert(node.left.take(), key, value);
                node.left = Some(left);
                o
            }
            Ordering::Less => {
                let (right, o) = Llrb::upsert(node.right.take(), key, value);
                node.right = Some(right);
                o
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };
        (Llrb::walkuprot_23(node), old_value)
    }

    // caller must make sure that key is present in the sub-tree.
    fn do_delete<Q>(node: Option<Box<Node<K, V>>>, key: &Q) -> Delete<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };

        if node.key.borrow().gt(key) {
            if node.left.is_none() {
                return (Some(node), None);
            }
            let left = node.left_deref();
            if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
                node = Llrb::move_red_left(node);
            }
            let (left, old_value) = Llrb::do_delete(node.left.take(), key);
            node.left = left;
            (Some(Llrb::balance(node)), old_value)
        } else {
            if is_red(node.left_deref()) {
                node = Llrb::rotate_right(node);
            }

            if node.key.borrow().eq(key) && node.right.is_none() {
                return (None, Some(node.into_entry().1));
            }

            let right = node.right_deref();
            let ok = right.is_some() && !is_red(right);
            if ok && !is_red(right.and_then(Node::left_deref)) {
                node = Llrb::move_red_right(node);
            }

            if node.key.borrow().eq(key) {
                // pull up the in-order successor into this node.
                let (right, min) = Llrb::do_delete_min(node.right.take());
                node.right = right;
                let (key, value) = match min {
                    Some(min) => min.into_entry(),
                    None => panic!("do_delete(): fatal logic, call the programmer"),
                };
                node.key = key;
                let old_value = mem::replace(&mut node.value, value);
                (Some(Llrb::balance(node)), Some(old_value))
            } else {
                let (right, old_value) = Llrb::do_delete(node.right.take(), key);
                node.right = right;
                (Some(Llrb::balance(node)), old_value)
            }
        }
    }

    fn do_delete_min(node: Option<Box<Node<K, V>>>) -> Delmin<K, V> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };
        if node.left.is_none() {
            return (node.right.take(), Some(node));
        }
        let left = node.left_deref();
        if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
            node = Llrb::move_red_left(node);
        }
        let (left, old_node) = Llrb::do_delete_min(node.left.take());
        node.left = left;
        (Some(Llrb::balance(node)), old_node)
    }

    fn do_delete_max(node: Option<Box<Node<K, V>>>) -> Delmin<K, V> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };
        if is_red(node.left_deref()) {
            node = Llrb::rotate_right(node);
        }
        if node.right.is_none() {
            return (node.left.take(), Some(node));
        }
        let right = node.right_deref();
        if !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
            node = Llrb::move_red_right(node);
        }
        let (right, old_node) = Llrb::do_delete_max(node.right.take());
        node.right = right;
        (Some(Llrb::balance(node)), old_node)
    }

    fn floor_node<'a, Q>(node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let nref = node?;
        match nref.key.borrow().cmp(key) {
            Ordering::Equal => Some(nref),
            Ordering::Greater => Llrb::floor_node(nref.left_deref(), key),
            Ordering::Less => Llrb::floor_node(nref.right_deref(), key).or(Some(nref)),
        }
    }

    fn ceiling_node<'a, Q>(node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let nref = node?;
        match nref.key.borrow().cmp(key) {
            Ordering::Equal => Some(nref),
            Ordering::Less => Llrb::ceiling_node(nref.right_deref(), key),
            Ordering::Greater => Llrb::ceiling_node(nref.left_deref(), key).or(Some(nref)),
        }
    }

    fn select_node(&self, mut k: usize) -> Option<&Node<K, V>> {
        let mut node = self.root.as_ref().map(Deref::deref);
        while let Some(nref) = node {
            let t = size(nref.left_deref());
            node = match k.cmp(&t) {
                Ordering::Less => nref.left_deref(),
                Ordering::Greater => {
                    k -= t + 1;
                    nref.right_deref()
                }
                Ordering::Equal => return Some(nref),
            };
        }
        None
    }

    fn do_height(node: Option<&Node<K, V>>) -> isize {
        match node {
            None => -1,
            Some(nref) => {
                let lh = Llrb::do_height(nref.left_deref());
                let rh = Llrb::do_height(nref.right_deref());
                1 + cmp::max(lh, rh)
            }
        }
    }

    fn do_validate(&self) -> Result<Stats, Error<K>> {
        let root = self.root.as_ref().map(Deref::deref);
        if is_red(root) {
            return Err(Error::RedRoot);
        }
        let blacks = Llrb::validate_tree(root, false, 0)?;

        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                if key <= prev {
                    return Err(Error::SortError(key, prev));
                }
                prev = key;
            }
        }

        let mut stats = Stats::new(self.len(), mem::size_of::<Node<K, V>>());
        stats.set_blacks(blacks);
        stats.set_height(self.height());
        Ok(stats)
    }

    fn validate_tree(
        node: Option<&Node<K, V>>,
        fromred: bool,
        mut nb: usize,
    ) -> Result<usize, Error<K>> {
        let nref = match node {
            None => return Ok(nb),
            Some(nref) => nref,
        };

        let red = !nref.is_black();
        if fromred && red {
            return Err(Error::ConsecutiveReds);
        }
        let (left, right) = (nref.left_deref(), nref.right_deref());
        if is_red(right) {
            return Err(Error::RightLeaningRed);
        }
        if !red {
            nb += 1;
        }
        let lblacks = Llrb::validate_tree(left, red, nb)?;
        let rblacks = Llrb::validate_tree(right, red, nb)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        let computed = 1 + size(left) + size(right);
        if nref.size != computed {
            let err = format!("cached: {} computed: {}", nref.size, computed);
            return Err(Error::SizeMismatch(err));
        }
        Ok(lblacks)
    }

    //--------- rotation routines for 2-3 algorithm ----------------

    // if both children are black, root is made red so that
    // move_red_left() and move_red_right() find a red link to borrow.
    fn prime_root(mut root: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if !is_red(root.left_deref()) && !is_red(root.right_deref()) {
            root.set_red();
        }
        root
    }

    fn blacken(mut root: Box<Node<K, V>>) -> Box<Node<K, V>> {
        root.set_black();
        root
    }

    fn walkuprot_23(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) && !is_red(node.left_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(node.deref_mut())
        }
        node.resize();
        node
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    (r)                 (r)  \
    //            /       \                 /     \
    //          left       x             node      xr
    //                    / \            /  \
    //                  xl   xr       left   xl
    //
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = match node.right.take() {
            Some(x) if !x.is_black() => x,
            _ => panic!("rotate_left(): rotating a black link ? Call the programmer"),
        };
        node.right = x.left.take();
        x.black = node.black;
        x.size = node.size;
        node.set_red();
        node.resize();
        x.left = Some(node);
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //            (r)   \                   (r)  \
    //           /       \                 /      \
    //          x       right             xl      node
    //         / \                                / \
    //       xl   xr                             xr  right
    //
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = match node.left.take() {
            Some(x) if !x.is_black() => x,
            _ => panic!("rotate_right(): rotating a black link ? Call the programmer"),
        };
        node.left = x.right.take();
        x.black = node.black;
        x.size = node.size;
        node.set_red();
        node.resize();
        x.right = Some(node);
        x
    }

    //        (x)                   (!x)
    //         |                     |
    //        node                  node
    //        / \                   / \
    //      (y) (z)              (!y) (!z)
    //     /      \              /      \
    //   left    right         left    right
    //
    fn flip(node: &mut Node<K, V>) {
        match (node.left.as_mut(), node.right.as_mut()) {
            (Some(left), Some(right)) => {
                left.toggle_link();
                right.toggle_link();
            }
            _ => panic!("flip(): missing child, call the programmer"),
        }
        node.toggle_link();
    }

    fn balance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(node.deref_mut());
        }
        node.resize();
        node
    }

    // node is red, node.left and node.left.left are black; make
    // node.left or one of its children red.
    fn move_red_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(node.deref_mut());
        if is_red(node.right_deref().and_then(Node::left_deref)) {
            node.right = node.right.take().map(Llrb::rotate_right);
            node = Llrb::rotate_left(node);
            Llrb::flip(node.deref_mut());
        }
        node
    }

    // node is red, node.right and node.right.left are black; make
    // node.right or one of its children red.
    fn move_red_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(node.deref_mut());
        if is_red(node.left_deref().and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
            Llrb::flip(node.deref_mut());
        }
        node
    }
}

fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool
where
    K: Clone + Ord,
    V: Clone,
{
    node.map_or(false, |node| !node.is_black())
}

fn size<K, V>(node: Option<&Node<K, V>>) -> usize
where
    K: Clone + Ord,
    V: Clone,
{
    node.map_or(0, |node| node.size)
}

fn push_left<'a, K, V>(stack: &mut Vec<&'a Node<K, V>>, mut node: Option<&'a Node<K, V>>)
where
    K: Clone + Ord,
    V: Clone,
{
    while let Some(nref) = node {
        stack.push(nref);
        node = nref.left_deref();
    }
}

fn push_right<'a, K, V>(stack: &mut Vec<&'a Node<K, V>>, mut node: Option<&'a Node<K, V>>)
where
    K: Clone + Ord,
    V: Clone,
{
    while let Some(nref) = node {
        stack.push(nref);
        node = nref.right_deref();
    }
}

fn below_low<K: Ord>(key: &K, low: &Bound<K>) -> bool {
    match low {
        Bound::Included(low) => key.lt(low),
        Bound::Excluded(low) => key.le(low),
        Bound::Unbounded => false,
    }
}

fn above_high<K: Ord>(key: &K, high: &Bound<K>) -> bool {
    match high {
        Bound::Included(high) => key.gt(high),
        Bound::Excluded(high) => key.ge(high),
        Bound::Unbounded => false,
    }
}

/// Iterate over entries in ascending order of keys. Holds a stack of
/// the left spine yet to be visited, O(log n) in size.
pub struct Iter<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let nref = self.stack.pop()?;
        push_left(&mut self.stack, nref.right_deref());
        Some((nref.key.clone(), nref.value.clone()))
    }
}

/// Iterate over keys in ascending order.
pub struct Keys<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }
}

/// Iterate over values, in ascending order of keys.
pub struct Values<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }
}

/// Iterate over entries between a low and high bound, in ascending order.
pub struct Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    root: Option<&'a Node<K, V>>,
    stack: Vec<&'a Node<K, V>>,
    low: Bound<K>,
    high: Bound<K>,
    started: bool,
}

impl<'a, K, V> Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Iterate over the same range in descending order.
    pub fn rev(self) -> Reverse<'a, K, V> {
        Reverse {
            root: self.root,
            stack: vec![],
            low: self.low,
            high: self.high,
            started: false,
        }
    }

    // stack up every node on the path to low bound, that is not
    // below the bound.
    fn seek_low(&mut self) {
        let mut node = self.root;
        while let Some(nref) = node {
            node = if below_low(&nref.key, &self.low) {
                nref.right_deref()
            } else {
                self.stack.push(nref);
                nref.left_deref()
            };
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.seek_low();
        }
        let nref = self.stack.pop()?;
        // check for upper bound
        if above_high(&nref.key, &self.high) {
            self.stack.clear();
            return None;
        }
        push_left(&mut self.stack, nref.right_deref());
        Some((nref.key.clone(), nref.value.clone()))
    }
}

/// Iterate over entries between a low and high bound, in descending order.
pub struct Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    root: Option<&'a Node<K, V>>,
    stack: Vec<&'a Node<K, V>>,
    low: Bound<K>,
    high: Bound<K>,
    started: bool,
}

impl<'a, K, V> Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn seek_high(&mut self) {
        let mut node = self.root;
        while let Some(nref) = node {
            node = if above_high(&nref.key, &self.high) {
                nref.left_deref()
            } else {
                self.stack.push(nref);
                nref.right_deref()
            };
        }
    }
}

impl<'a, K, V> Iterator for Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.seek_high();
        }
        let nref = self.stack.pop()?;
        // check for lower bound
        if below_low(&nref.key, &self.low) {
            self.stack.clear();
            return None;
        }
        push_right(&mut self.stack, nref.left_deref());
        Some((nref.key.clone(), nref.value.clone()))
    }
}

/// Node corresponds to a single entry in Llrb instance.
#[derive(Clone)]
pub(crate) struct Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    key: K,
    value: V,
    black: bool,                    // store: black or red
    size: usize,                    // store: number of nodes in sub-tree
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    // CREATE operation
    pub(crate) fn new(key: K, value: V, black: bool) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            black,
            size: 1,
            left: None,
            right: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_children(
        key: K,
        value: V,
        black: bool,
        left: Option<Box<Node<K, V>>>,
        right: Option<Box<Node<K, V>>>,
    ) -> Box<Node<K, V>> {
        let mut node = Node::new(key, value, black);
        node.left = left;
        node.right = right;
        node.resize();
        node
    }

    // consume a node detached from the tree.
    fn into_entry(self: Box<Self>) -> (K, V) {
        let node = *self;
        (node.key, node.value)
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    fn resize(&mut self) {
        self.size = 1 + size(self.left_deref()) + size(self.right_deref());
    }

    #[inline]
    fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    fn toggle_link(&mut self) {
        self.black = !self.black
    }

    #[inline]
    fn is_black(&self) -> bool {
        self.black
    }
}

/// Statistics on [`Llrb`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Llrb::stats`] method.
/// * To get full statisics via [`Llrb::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    height: Option<isize>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            height: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_height(&mut self, height: isize) {
        self.height = Some(height)
    }

    /// Return number entries in [`Llrb`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Llrb<k,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use llrb_rank::Llrb;
    /// let llrb: Llrb<u64, u64> = Llrb::new("myinstance");
    ///
    /// // key and value: 16 bytes, colour, size and two children: 32 bytes
    /// assert_eq!(llrb.stats().node_size(), 48);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to leaf, on both left
    /// and right child. Available only via [`Llrb::validate`].
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return height of the tree. Available only via [`Llrb::validate`].
    #[inline]
    pub fn height(&self) -> Option<isize> {
        self.height
    }
}
