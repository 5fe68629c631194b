/*!
 * # Block Editing Core
 *
 * The editing core owns the block sequence of the one open document and is
 * the only place it changes.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Authoritative Store
 * - A [`BlockStore`] holds the ordered `Vec<Block>` of the open document
 * - Every mutation goes through its operations: `create`, `update`,
 *   `transform`, `delete`, `reorder`, `move_selected`
 * - Whole-document replacement (`replace_all`) runs through the same type, so
 *   the two mutation paths cannot drift apart
 *
 * ### 2. Typed Change Notifications
 * - Each mutation is announced as a [`BlockEvent`] on the store's [`EventBus`]
 * - Observers (navigation, persistence) subscribe to the bus and never
 *   re-read ambient storage to learn about changes
 * - Delivery is synchronous, in subscription order, with no isolation
 *
 * ### 3. Validation at the Boundary
 * - `create` and `transform` validate against kind rules before touching the
 *   sequence; all violations are reported together
 * - Unknown ids make id-addressed mutations no-ops (`Ok(None)`)
 *
 * ### 4. Dense Order Stamps
 * - `order` is re-stamped to 0..n-1 after structural changes
 * - `delete` alone leaves gaps; callers follow with `normalize_order`
 *
 * ## Module Structure
 *
 * - **`store`**: `BlockStore` and `StoreError`
 * - **`validation`**: kind-dispatched block validation
 * - **`events`**: `EventBus`, `BlockEvent` and payloads
 * - **`reorder`**: pure order computations for drag and keyboard moves
 * - **`clipboard`**: copy/paste of blocks through a transient key/value store
 * - **`intents`**: executes selection intents against the store
 *
 * ## Usage Pattern
 *
 * ```rust
 * use docbuilder_engine::editing::*;
 * use docbuilder_engine::models::{BlockKind, NewBlock};
 *
 * let mut store = BlockStore::new();
 * store.events_mut().on(BlockEventKind::Transform, |event| {
 *     println!("{:?}", event.kind());
 *     Ok(())
 * });
 *
 * let block = store.create(NewBlock::text("")).unwrap();
 * store
 *     .transform(block.id, BlockKind::Code, Some("print(1)".into()), Some("python".into()))
 *     .unwrap();
 * assert_eq!(store.blocks()[0].kind, BlockKind::Code);
 * ```
 */

pub mod clipboard;
pub mod events;
pub mod intents;
pub mod reorder;
pub mod store;
pub mod validation;

pub use clipboard::{CLIPBOARD_KEY, MemoryTransientStore, TransientStore};
pub use events::{
    BlockChanges, BlockEvent, BlockEventKind, EventBus, ReorderGesture, SubscriptionId,
};
pub use intents::IntentOutcome;
pub use reorder::Direction;
pub use store::{BlockStore, StoreError};
pub use validation::{ValidationError, ValidationErrors, validate};
