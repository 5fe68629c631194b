//! Typed publish/subscribe for block store mutations.
//!
//! Delivery is synchronous and follows subscription order. A subscriber that
//! returns an error stops delivery to everything subscribed after it; the
//! error is handed back to whoever emitted the event.

use crate::editing::reorder::Direction;
use crate::models::{Block, BlockKind};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BlockEventKind {
    Create,
    Update,
    Transform,
    Delete,
    Reorder,
}

/// Fields touched by an `update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockChanges {
    pub content: String,
    /// `None` when the language was left untouched
    pub language: Option<String>,
}

/// What caused a reorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderGesture {
    Drag {
        source_index: usize,
        destination_index: usize,
    },
    Move {
        direction: Direction,
    },
    /// Order stamps were rewritten to 0..n-1 without moving anything
    Renumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    Create {
        block: Block,
    },
    Update {
        block: Block,
        changes: BlockChanges,
    },
    Transform {
        block: Block,
        previous_kind: BlockKind,
    },
    Delete {
        block: Block,
    },
    Reorder {
        blocks: Vec<Block>,
        gesture: ReorderGesture,
    },
}

impl BlockEvent {
    pub fn kind(&self) -> BlockEventKind {
        match self {
            BlockEvent::Create { .. } => BlockEventKind::Create,
            BlockEvent::Update { .. } => BlockEventKind::Update,
            BlockEvent::Transform { .. } => BlockEventKind::Transform,
            BlockEvent::Delete { .. } => BlockEventKind::Delete,
            BlockEvent::Reorder { .. } => BlockEventKind::Reorder,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubscriptionId(u64);

pub type Subscriber = Box<dyn FnMut(&BlockEvent) -> anyhow::Result<()>>;

struct Subscription {
    id: SubscriptionId,
    /// `None` receives every kind
    kind: Option<BlockEventKind>,
    callback: Subscriber,
}

/// Fan-out of block events to registered observers. Holds no block data.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind
    pub fn on<F>(&mut self, kind: BlockEventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&BlockEvent) -> anyhow::Result<()> + 'static,
    {
        self.register(Some(kind), Box::new(callback))
    }

    /// Register a callback for every event kind
    pub fn on_any<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&BlockEvent) -> anyhow::Result<()> + 'static,
    {
        self.register(None, Box::new(callback))
    }

    fn register(&mut self, kind: Option<BlockEventKind>, callback: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, callback });
        id
    }

    /// Returns false if the subscription was already gone
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn emit(&mut self, event: &BlockEvent) -> anyhow::Result<()> {
        let kind = event.kind();
        for subscription in &mut self.subscriptions {
            if subscription.kind.is_none_or(|k| k == kind) {
                (subscription.callback)(event)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
