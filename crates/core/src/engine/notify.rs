//! Notification emitter.
//!
//! Stages exactly one notification per call into the engine's write batch.
//! Persistence is part of the operation's atomic unit; push delivery is a
//! separate collaborator that subscribes to the store's notification feed,
//! so delivery can never unwind a committed operation.

use kivela_shared::types::{AccountId, NotificationId};
use kivela_store::{NotificationCategory, StagedNotification, WriteBatch};

/// Stages a notification on `owner_id`'s inbox.
pub(crate) fn push(
    batch: &mut WriteBatch,
    owner_id: AccountId,
    title: &str,
    body: String,
    category: NotificationCategory,
) -> NotificationId {
    let id = NotificationId::new();
    batch.push_notification(StagedNotification {
        id,
        owner_id,
        title: title.to_string(),
        body,
        category,
    });
    id
}
