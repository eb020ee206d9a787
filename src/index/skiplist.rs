//! Probabilistic skip list over posting positions
//!
//! Each term's postings live in one skip list keyed by `(doc_id, offset)`.
//! The list supports O(log n) expected insert, predecessor, successor and
//! membership lookups, which is what the phrase and cover walks lean on.
//!
//! Nodes are arena-allocated in a `Vec` and towers hold 1-based node ids
//! (`0` is nil) instead of pointers. The arena form survives serialization
//! unchanged: the at-rest tower records are these same indices, renumbered
//! into ascending key order.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{CinderError, Result};

/// Maximum tower height
pub(crate) const MAX_HEIGHT: usize = 32;

/// Posting key: `(doc_id, offset)`, ordered lexicographically
pub(crate) type PostingKey = (u32, u32);

/// Nil node reference inside towers
const NIL: u32 = 0;

#[derive(Clone, Debug)]
struct Node {
    key: PostingKey,
    /// Forward references per level, 1-based ids into the arena.
    /// Nil entries only ever form a suffix.
    tower: Vec<u32>,
}

/// Sorted container of posting positions
pub struct SkipList {
    nodes: Vec<Node>,
    /// Head forward references per level; the head stores no key
    head: [u32; MAX_HEIGHT],
    height: usize,
    /// Tower-height coin flips; one generator per list, reused across inserts
    rng: SmallRng,
}

impl SkipList {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: [NIL; MAX_HEIGHT],
            height: 1,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Number of stored positions
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a position; duplicates are ignored
    pub fn insert(&mut self, key: PostingKey) {
        let (found, journey) = self.search(key);
        if found != NIL {
            return;
        }

        let height = self.random_height();
        self.nodes.push(Node {
            key,
            tower: vec![NIL; height],
        });
        let id = self.nodes.len() as u32;

        for level in 0..height {
            let pred = journey[level];
            let displaced = if pred == NIL {
                std::mem::replace(&mut self.head[level], id)
            } else {
                let tower = &mut self.nodes[pred as usize - 1].tower;
                if tower.len() <= level {
                    tower.resize(level + 1, NIL);
                }
                std::mem::replace(&mut tower[level], id)
            };
            self.nodes[id as usize - 1].tower[level] = displaced;
        }

        if height > self.height {
            self.height = height;
        }
    }

    /// Greatest stored key strictly less than `key`
    pub fn find_lt(&self, key: PostingKey) -> Option<PostingKey> {
        let (_, journey) = self.search(key);
        let pred = journey[0];
        (pred != NIL).then(|| self.key_of(pred))
    }

    /// Least stored key strictly greater than `key`
    pub fn find_gt(&self, key: PostingKey) -> Option<PostingKey> {
        let (found, journey) = self.search(key);
        let succ = if found != NIL {
            self.forward_from(found, 0)
        } else {
            self.forward_from(journey[0], 0)
        };
        (succ != NIL).then(|| self.key_of(succ))
    }

    /// Exact membership test
    pub fn contains(&self, key: PostingKey) -> bool {
        let (found, _) = self.search(key);
        found != NIL
    }

    /// Smallest stored key
    pub fn first(&self) -> Option<PostingKey> {
        let first = self.head[0];
        (first != NIL).then(|| self.key_of(first))
    }

    /// Largest stored key, by greedy right-then-down descent
    pub fn last(&self) -> Option<PostingKey> {
        let mut current = NIL;
        for level in (0..self.height).rev() {
            loop {
                let next = self.forward_from(current, level);
                if next == NIL {
                    break;
                }
                current = next;
            }
        }
        (current != NIL).then(|| self.key_of(current))
    }

    /// In-order iteration over all stored keys
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            current: self.head[0],
        }
    }

    /// In-order iteration starting at the first key >= `key`
    pub fn iter_from(&self, key: PostingKey) -> Iter<'_> {
        let (found, journey) = self.search(key);
        let start = if found != NIL {
            found
        } else {
            self.forward_from(journey[0], 0)
        };
        Iter {
            list: self,
            current: start,
        }
    }

    /// Locate `key` and record the rightmost node before it at every level.
    ///
    /// Returns the node holding `key` (or nil) and the journey of
    /// predecessors; journey entries of `NIL` stand for the head.
    fn search(&self, key: PostingKey) -> (u32, [u32; MAX_HEIGHT]) {
        let mut journey = [NIL; MAX_HEIGHT];
        let mut current = NIL;

        for level in (0..self.height).rev() {
            loop {
                let next = self.forward_from(current, level);
                if next != NIL && self.key_of(next) < key {
                    current = next;
                } else {
                    break;
                }
            }
            journey[level] = current;
        }

        let candidate = self.forward_from(current, 0);
        let found = if candidate != NIL && self.key_of(candidate) == key {
            candidate
        } else {
            NIL
        };
        (found, journey)
    }

    /// Forward reference of `node` (or the head when `node` is nil) at `level`
    fn forward_from(&self, node: u32, level: usize) -> u32 {
        if node == NIL {
            self.head[level]
        } else {
            self.nodes[node as usize - 1]
                .tower
                .get(level)
                .copied()
                .unwrap_or(NIL)
        }
    }

    fn key_of(&self, node: u32) -> PostingKey {
        self.nodes[node as usize - 1].key
    }

    /// Geometric tower height: each extra level has probability 1/2
    fn random_height(&mut self) -> usize {
        let mut height = 1;
        while height < MAX_HEIGHT && self.rng.random_bool(0.5) {
            height += 1;
        }
        height
    }

    /// Flatten into ascending keys plus per-node towers of 1-based ranks.
    ///
    /// Rank `r` names the `r`-th key in ascending order; towers keep only
    /// their non-nil prefix. Callers must ensure `len() <= u16::MAX`.
    pub(crate) fn to_parts(&self) -> (Vec<PostingKey>, Vec<Vec<u16>>) {
        debug_assert!(self.nodes.len() <= u16::MAX as usize);

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut current = self.head[0];
        while current != NIL {
            order.push(current);
            current = self.forward_from(current, 0);
        }

        let mut rank = vec![0u16; self.nodes.len() + 1];
        for (i, &id) in order.iter().enumerate() {
            rank[id as usize] = (i + 1) as u16;
        }

        let mut keys = Vec::with_capacity(order.len());
        let mut towers = Vec::with_capacity(order.len());
        for &id in &order {
            let node = &self.nodes[id as usize - 1];
            keys.push(node.key);
            let links = node
                .tower
                .iter()
                .take_while(|&&target| target != NIL)
                .map(|&target| rank[target as usize])
                .collect();
            towers.push(links);
        }
        (keys, towers)
    }

    /// Rebuild a list from ascending keys and rank-based towers.
    ///
    /// Ranks equal arena ids here because nodes are stored in key order.
    /// Every link must point strictly forward; anything else is corrupt
    /// data and is rejected before a cycle can form.
    pub(crate) fn from_parts(keys: Vec<PostingKey>, towers: Vec<Vec<u16>>) -> Result<Self> {
        debug_assert_eq!(keys.len(), towers.len());
        let count = keys.len();

        let mut nodes = Vec::with_capacity(count);
        for (i, (key, links)) in keys.into_iter().zip(towers).enumerate() {
            if links.len() > MAX_HEIGHT {
                return Err(CinderError::TowerTooTall {
                    levels: links.len(),
                    max: MAX_HEIGHT,
                });
            }
            let mut tower = Vec::with_capacity(links.len());
            for target in links {
                if (target as usize) <= i + 1 || (target as usize) > count {
                    return Err(CinderError::TowerIndexOutOfRange {
                        index: target,
                        count,
                    });
                }
                tower.push(target as u32);
            }
            nodes.push(Node { key, tower });
        }

        // every node but the last must chain to its successor at level 0
        for (i, node) in nodes.iter().enumerate().take(count.saturating_sub(1)) {
            if node.tower.first() != Some(&(i as u32 + 2)) {
                return Err(CinderError::BrokenTowerChain { rank: i + 1 });
            }
        }

        let mut head = [NIL; MAX_HEIGHT];
        let mut height = 1;
        if count > 0 {
            head[0] = 1;
            for (i, node) in nodes.iter().enumerate() {
                let levels = node.tower.len();
                if levels > height {
                    height = levels;
                }
                for level in 1..levels {
                    if head[level] == NIL {
                        head[level] = (i + 1) as u32;
                    }
                }
            }
        }

        Ok(Self {
            nodes,
            head,
            height,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SkipList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.nodes.len())
            .field("height", &self.height)
            .finish()
    }
}

/// Iterator over stored keys in ascending order
pub struct Iter<'a> {
    list: &'a SkipList,
    current: u32,
}

impl Iterator for Iter<'_> {
    type Item = PostingKey;

    fn next(&mut self) -> Option<PostingKey> {
        if self.current == NIL {
            return None;
        }
        let key = self.list.key_of(self.current);
        self.current = self.list.forward_from(self.current, 0);
        Some(key)
    }
}
