//! Ordered player index: an unbalanced binary search tree keyed by player id.
//!
//! Every node exclusively owns its player and both child subtrees. The shape
//! is purely a function of insertion order, so a sorted load produces a
//! linked list. For that reason every traversal here runs on an explicit
//! stack rather than recursion, and `Drop` tears the tree down iteratively.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::format_player;
use crate::error::{Entity, LedgerError};
use crate::game::GameId;
use crate::player::{MAX_NAME_LEN, Player, PlayerId, check_text};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    player: Player,
    left: Link,
    right: Link,
}

impl Node {
    fn new(player: Player) -> Self {
        Self {
            player,
            left: None,
            right: None,
        }
    }
}

/// A player visited by a depth-tracking traversal. The root is at depth 1.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub depth: usize,
    pub player: &'a Player,
}

/// Binary search tree of players keyed by [`PlayerId`].
///
/// Invariant: every player in a node's left subtree has a smaller id and
/// every player in its right subtree a larger one. No rebalancing happens.
#[derive(Default)]
pub struct PlayerIndex {
    root: Link,
    len: usize,
}

impl std::fmt::Debug for PlayerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.preorder().map(|p| p.id)).finish()
    }
}

impl PlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a player along its search path.
    ///
    /// An existing player with the same id is never overwritten: the call
    /// fails with `DuplicateKey` and the tree is unchanged.
    pub fn insert(&mut self, player: Player) -> Result<(), LedgerError> {
        player.validate()?;
        let id = player.id;
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match id.cmp(&node.player.id) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    tracing::debug!(player_id = id, "duplicate player id, insertion ignored");
                    return Err(LedgerError::DuplicateKey {
                        entity: Entity::Player,
                        id,
                    });
                },
            };
        }
        *slot = Some(Box::new(Node::new(player)));
        self.len += 1;
        tracing::debug!(player_id = id, len = self.len, "player inserted");
        Ok(())
    }

    /// Binary-search descent. Returns a borrowed view of the stored player.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match id.cmp(&node.player.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.player),
            };
        }
        None
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    // Not exposed: callers could otherwise rewrite the key in place.
    fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        find_slot(&mut self.root, id)?
            .as_mut()
            .map(|node| &mut node.player)
    }

    /// Remove the player with `id`, handing it back to the caller. Removing
    /// an absent id is a no-op returning `None`.
    ///
    /// A node with at most one child is replaced by that child. A node with
    /// two children takes over the player of its in-order successor (the
    /// leftmost node of its right subtree), and the successor node is then
    /// unlinked from the right subtree, where it has no left child.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let slot = find_slot(&mut self.root, id)?;
        let node = slot.as_mut()?;
        let removed = if node.left.is_some() && node.right.is_some() {
            let successor = take_min(&mut node.right)?;
            std::mem::replace(&mut node.player, successor)
        } else {
            let mut node = slot.take()?;
            *slot = node.left.take().or(node.right.take());
            node.player
        };
        self.len -= 1;
        tracing::debug!(player_id = id, len = self.len, "player removed");
        Some(removed)
    }

    /// Replace a player's display name.
    pub fn rename(&mut self, id: PlayerId, name: &str) -> Result<(), LedgerError> {
        check_text("name", name, MAX_NAME_LEN)?;
        let player = self
            .get_mut(id)
            .ok_or_else(|| LedgerError::player_not_found(id))?;
        tracing::debug!(player_id = id, old = %player.display_name, new = name, "player renamed");
        player.display_name = name.to_string();
        Ok(())
    }

    /// Append a game to a player's played list.
    pub fn record_game(
        &mut self,
        id: PlayerId,
        game_id: GameId,
        rating: f64,
    ) -> Result<(), LedgerError> {
        self.get_mut(id)
            .ok_or_else(|| LedgerError::player_not_found(id))?
            .add_game(game_id, rating)
    }

    pub fn has_played(&self, id: PlayerId, game_id: GameId) -> Result<bool, LedgerError> {
        self.get(id)
            .map(|p| p.has_played(game_id))
            .ok_or_else(|| LedgerError::player_not_found(id))
    }

    /// Players in ascending id order.
    pub fn inorder(&self) -> InOrder<'_> {
        InOrder::new(&self.root, false)
    }

    /// Players in pre-order: node, then left subtree, then right subtree.
    /// This follows the tree shape and is not sorted by id.
    pub fn preorder(&self) -> impl Iterator<Item = &Player> + '_ {
        PreOrder::new(&self.root, usize::MAX).map(|v| v.player)
    }

    /// Pre-order walk that only descends to nodes at depth `max_depth` or
    /// shallower. Not a level-order traversal.
    pub fn layers(&self, max_depth: usize) -> PreOrder<'_> {
        PreOrder::new(&self.root, max_depth)
    }

    /// Depth (root = 1) of the first node with `id` met by a left-biased
    /// pre-order walk.
    pub fn depth_of(&self, id: PlayerId) -> Option<usize> {
        PreOrder::new(&self.root, usize::MAX)
            .find(|v| v.player.id == id)
            .map(|v| v.depth)
    }

    /// Ids of every node a pre-order walk visits until it reaches `id`,
    /// the target included.
    ///
    /// This is the visited-node trail, not the search path: nodes from
    /// subtrees explored before the target are part of it. Use
    /// [`descent_path`](Self::descent_path) for the root-to-target path.
    pub fn path_to(&self, id: PlayerId) -> Option<Vec<PlayerId>> {
        let mut path = Vec::new();
        for visit in PreOrder::new(&self.root, usize::MAX) {
            path.push(visit.player.id);
            if visit.player.id == id {
                return Some(path);
            }
        }
        None
    }

    /// Ids on the binary-search path from the root down to `id`.
    pub fn descent_path(&self, id: PlayerId) -> Option<Vec<PlayerId>> {
        let mut path = Vec::new();
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            path.push(node.player.id);
            cur = match id.cmp(&node.player.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(path),
            };
        }
        None
    }

    /// The `n` players with the highest ids, highest first, taken from a
    /// reverse in-order walk (right subtree, node, left subtree).
    pub fn top_n(&self, n: usize) -> Vec<&Player> {
        InOrder::new(&self.root, true).take(n).collect()
    }

    /// The `n` players with the most played games. Ties go to the lower id.
    pub fn most_active(&self, n: usize) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.inorder().collect();
        // Stable sort keeps ascending id order among equal counts.
        players.sort_by(|a, b| b.games_played_count().cmp(&a.games_played_count()));
        players.truncate(n);
        players
    }

    /// Number of levels; 0 for an empty index.
    pub fn height(&self) -> usize {
        PreOrder::new(&self.root, usize::MAX)
            .map(|v| v.depth)
            .max()
            .unwrap_or(0)
    }

    /// Whether an in-order walk yields strictly increasing ids.
    pub fn is_ordered(&self) -> bool {
        let mut prev: Option<PlayerId> = None;
        for player in self.inorder() {
            if prev.is_some_and(|p| p >= player.id) {
                return false;
            }
            prev = Some(player.id);
        }
        true
    }

    /// Write every player as one persisted record line, in pre-order.
    /// Returns the number of records written.
    pub fn save_all<W: Write>(&self, mut sink: W) -> Result<usize, LedgerError> {
        let mut written = 0;
        for player in self.preorder() {
            writeln!(sink, "{}", format_player(player))?;
            written += 1;
        }
        sink.flush()?;
        Ok(written)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<usize, LedgerError> {
        let path = path.as_ref();
        let written = self.save_all(BufWriter::new(File::create(path)?))?;
        tracing::info!(path = %path.display(), written, "players saved");
        Ok(written)
    }

    /// Release every node, children before their parent.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            let left = node.left.take();
            let right = node.right.take();
            if left.is_none() && right.is_none() {
                drop(node);
                continue;
            }
            // Revisit the now childless node once both subtrees are gone.
            stack.push(node);
            stack.extend(right);
            stack.extend(left);
        }
        self.len = 0;
    }
}

impl Drop for PlayerIndex {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Locate the link holding `id`.
fn find_slot(mut slot: &mut Link, id: PlayerId) -> Option<&mut Link> {
    loop {
        let ord = id.cmp(&slot.as_ref()?.player.id);
        slot = match ord {
            Ordering::Less => &mut slot.as_mut()?.left,
            Ordering::Greater => &mut slot.as_mut()?.right,
            Ordering::Equal => return Some(slot),
        };
    }
}

/// Unlink the leftmost node under `slot` and return its player. The node's
/// right subtree takes its place.
fn take_min(mut slot: &mut Link) -> Option<Player> {
    while slot.as_ref()?.left.is_some() {
        slot = &mut slot.as_mut()?.left;
    }
    let node = slot.take()?;
    let Node { player, right, .. } = *node;
    *slot = right;
    Some(player)
}

/// In-order iterator, ascending or descending by id.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
    descending: bool,
}

impl<'a> InOrder<'a> {
    fn new(root: &'a Link, descending: bool) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            descending,
        };
        iter.push_spine(root.as_deref());
        iter
    }

    fn push_spine(&mut self, mut cur: Option<&'a Node>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = if self.descending {
                node.right.as_deref()
            } else {
                node.left.as_deref()
            };
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Player;

    fn next(&mut self) -> Option<&'a Player> {
        let node = self.stack.pop()?;
        let next = if self.descending {
            node.left.as_deref()
        } else {
            node.right.as_deref()
        };
        self.push_spine(next);
        Some(&node.player)
    }
}

/// Depth-bounded pre-order iterator.
pub struct PreOrder<'a> {
    stack: Vec<(&'a Node, usize)>,
    max_depth: usize,
}

impl<'a> PreOrder<'a> {
    fn new(root: &'a Link, max_depth: usize) -> Self {
        let mut stack = Vec::new();
        if max_depth >= 1
            && let Some(node) = root.as_deref()
        {
            stack.push((node, 1));
        }
        Self { stack, max_depth }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let (node, depth) = self.stack.pop()?;
        if depth < self.max_depth {
            // Right first so the left subtree is visited first.
            if let Some(right) = node.right.as_deref() {
                self.stack.push((right, depth + 1));
            }
            if let Some(left) = node.left.as_deref() {
                self.stack.push((left, depth + 1));
            }
        }
        Some(Visit {
            depth,
            player: &node.player,
        })
    }
}
