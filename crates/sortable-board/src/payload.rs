#![forbid(unsafe_code)]

//! Drag payloads, drop-target data, and drop locations.
//!
//! A [`DragPayload`] is captured once when a drag session begins and is never
//! mutated afterwards. A [`DropTargetData`] is produced by a drop target's
//! data provider, and a [`DropLocation`] pairs it with the edge the pointer
//! was closest to.

use bitflags::bitflags;
use sortable_core::Edge;

use crate::model::{ContainerId, ItemId};

/// Which kind of element is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "board-config", serde(rename_all = "snake_case"))]
pub enum PayloadKind {
    Item,
    Container,
}

impl PayloadKind {
    #[must_use]
    pub const fn flag(self) -> PayloadKinds {
        match self {
            Self::Item => PayloadKinds::ITEM,
            Self::Container => PayloadKinds::CONTAINER,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Container => "container",
        }
    }
}

bitflags! {
    /// Payload kinds a drop target accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PayloadKinds: u8 {
        const ITEM      = 0b01;
        const CONTAINER = 0b10;
    }
}

impl PayloadKinds {
    #[must_use]
    pub const fn accepts(self, kind: PayloadKind) -> bool {
        self.contains(kind.flag())
    }
}

/// Data attached to the element being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "board-config", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DragPayload {
    Item {
        item_id: ItemId,
        container_id: ContainerId,
        source_index: usize,
    },
    Container {
        container_id: ContainerId,
        source_index: usize,
    },
}

impl DragPayload {
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Item { .. } => PayloadKind::Item,
            Self::Container { .. } => PayloadKind::Container,
        }
    }

    /// Container the dragged element belongs to (or is).
    #[must_use]
    pub fn container_id(&self) -> &ContainerId {
        match self {
            Self::Item { container_id, .. } | Self::Container { container_id, .. } => container_id,
        }
    }

    #[must_use]
    pub const fn source_index(&self) -> usize {
        match self {
            Self::Item { source_index, .. } | Self::Container { source_index, .. } => *source_index,
        }
    }
}

/// Data attached to a drop target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "board-config", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DropTargetData {
    /// An item inside a container.
    Item {
        item_id: ItemId,
        container_id: ContainerId,
        index: usize,
    },
    /// A container as a whole (its header or empty body).
    Container {
        container_id: ContainerId,
        index: usize,
    },
}

impl DropTargetData {
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Item { .. } => PayloadKind::Item,
            Self::Container { .. } => PayloadKind::Container,
        }
    }

    #[must_use]
    pub fn container_id(&self) -> &ContainerId {
        match self {
            Self::Item { container_id, .. } | Self::Container { container_id, .. } => container_id,
        }
    }
}

/// Where a drag session ended: the innermost target and its closest edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
pub struct DropLocation {
    pub target: DropTargetData,
    pub edge: Option<Edge>,
}

impl DropLocation {
    pub fn new(target: DropTargetData, edge: Option<Edge>) -> Self {
        Self { target, edge }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_flags() {
        let payload = DragPayload::Item {
            item_id: "t1".into(),
            container_id: "A".into(),
            source_index: 2,
        };
        assert_eq!(payload.kind(), PayloadKind::Item);
        assert_eq!(payload.container_id().as_str(), "A");
        assert_eq!(payload.source_index(), 2);
        assert!(PayloadKinds::all().accepts(PayloadKind::Container));
        assert!(!PayloadKinds::ITEM.accepts(PayloadKind::Container));
    }

    #[cfg(feature = "board-config")]
    #[test]
    fn payload_serializes_with_kind_tag() {
        let payload = DragPayload::Container {
            container_id: "A".into(),
            source_index: 0,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "container");
        assert_eq!(json["container_id"], "A");
    }
}
