#![forbid(unsafe_code)]

//! Board data model: items, containers (columns), and the board itself.
//!
//! # Invariants
//!
//! 1. An item id appears in at most one container, at most once.
//! 2. Container ids are unique across the board.
//! 3. Every ordering operation conserves the total item count.
//!
//! The model is a plain value. Engines take `&Board` and return a new
//! `Board`; only [`crate::controller::BoardController`] decides which value
//! is authoritative. [`Board::check_invariants`] reports violations of (1)
//! and (2) for boards assembled by hand or loaded from a snapshot.

use std::fmt;

use ahash::AHashSet;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "board-config", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random (v4 UUID) identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Opaque unique identifier of an [`Item`].
    ItemId
);
string_id!(
    /// Opaque unique identifier of a [`Container`].
    ContainerId
);

/// A draggable entry. Immutable once created; identity is its id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    id: ItemId,
    name: String,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// New item with a generated id.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(ItemId::generate(), name)
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named, ordered column of items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    id: ContainerId,
    name: String,
    #[cfg_attr(feature = "board-config", serde(default))]
    items: Vec<Item>,
}

impl Container {
    /// Empty container.
    pub fn new(id: impl Into<ContainerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Empty container with a generated id.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(ContainerId::generate(), name)
    }

    /// Builder: replace the item sequence.
    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of `id` in this container.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Item names in order. Handy for assertions and log fields.
    #[must_use]
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(Item::name).collect()
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

/// A violated board invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardViolation {
    /// The same item id appears more than once.
    DuplicateItem(ItemId),
    /// Two containers share an id.
    DuplicateContainer(ContainerId),
}

impl fmt::Display for BoardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItem(id) => write!(f, "item id {id} appears more than once"),
            Self::DuplicateContainer(id) => write!(f, "container id {id} appears more than once"),
        }
    }
}

/// Ordered sequence of containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    #[cfg_attr(feature = "board-config", serde(default))]
    containers: Vec<Container>,
}

impl Board {
    pub fn new(containers: impl IntoIterator<Item = Container>) -> Self {
        Self {
            containers: containers.into_iter().collect(),
        }
    }

    /// Two columns of four items each (`test1`..`test8`), fresh ids.
    #[must_use]
    pub fn demo() -> Self {
        let column = |name: &str, range: std::ops::RangeInclusive<u8>| {
            Container::named(name).with_items(range.map(|n| Item::named(format!("test{n}"))))
        };
        Self::new([column("Column1", 1..=4), column("Column2", 5..=8)])
    }

    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    #[must_use]
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn container_index(&self, id: &ContainerId) -> Option<usize> {
        self.containers.iter().position(|c| c.id() == id)
    }

    /// Container index and in-container index of an item.
    #[must_use]
    pub fn locate_item(&self, id: &ItemId) -> Option<(usize, usize)> {
        self.containers
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.index_of(id).map(|ii| (ci, ii)))
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.locate_item(id)
            .map(|(ci, ii)| &self.containers[ci].items[ii])
    }

    /// Total number of items across all containers.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.containers.iter().map(Container::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Container names in order.
    #[must_use]
    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(Container::name).collect()
    }

    /// Report duplicate item and container ids. Empty means consistent.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<BoardViolation> {
        let mut violations = Vec::new();
        let mut containers = AHashSet::with_capacity(self.containers.len());
        let mut items = AHashSet::with_capacity(self.item_count());
        for container in &self.containers {
            if !containers.insert(container.id()) {
                violations.push(BoardViolation::DuplicateContainer(container.id().clone()));
            }
            for item in container.items() {
                if !items.insert(item.id()) {
                    violations.push(BoardViolation::DuplicateItem(item.id().clone()));
                }
            }
        }
        violations
    }

    pub(crate) fn containers_mut(&mut self) -> &mut Vec<Container> {
        &mut self.containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_board_shape() {
        let board = Board::demo();
        assert_eq!(board.container_names(), vec!["Column1", "Column2"]);
        assert_eq!(board.item_count(), 8);
        assert_eq!(
            board.containers()[1].item_names(),
            vec!["test5", "test6", "test7", "test8"]
        );
        assert!(board.check_invariants().is_empty());
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn locate_item_finds_container_and_index() {
        let board = Board::new([
            Container::new("a", "A").with_items([Item::new("t1", "one")]),
            Container::new("b", "B").with_items([Item::new("t2", "two"), Item::new("t3", "three")]),
        ]);
        assert_eq!(board.locate_item(&"t3".into()), Some((1, 1)));
        assert_eq!(board.item(&"t2".into()).map(Item::name), Some("two"));
        assert_eq!(board.locate_item(&"nope".into()), None);
        assert_eq!(board.container_index(&"b".into()), Some(1));
    }

    #[test]
    fn check_invariants_reports_duplicates() {
        let board = Board::new([
            Container::new("a", "A").with_items([Item::new("t1", "x"), Item::new("t1", "y")]),
            Container::new("a", "A2"),
        ]);
        let violations = board.check_invariants();
        assert!(violations.contains(&BoardViolation::DuplicateItem("t1".into())));
        assert!(violations.contains(&BoardViolation::DuplicateContainer("a".into())));
        assert_eq!(violations.len(), 2);
    }

    #[cfg(feature = "board-config")]
    #[test]
    fn board_snapshot_round_trips_through_json() {
        let board = Board::demo();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
