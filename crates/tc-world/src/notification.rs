//! Transient money notifications shown by a front-end.

use tc_core::{NotificationId, Pos};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NotificationKind {
    MoneyMade,
    MoneyLost,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id:     NotificationId,
    pub kind:   NotificationKind,
    pub amount: i64,
    /// Where on the map the money changed hands.
    pub pos:    Pos,
}

/// Live notifications in creation order.  Ids are never reused.
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    last:  u64,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, kind: NotificationKind, amount: i64, pos: Pos) -> NotificationId {
        self.last += 1;
        let id = NotificationId(self.last);
        self.items.push(Notification { id, kind, amount, pos });
        id
    }

    /// Returns `false` if `id` was not live.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
