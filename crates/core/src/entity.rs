//! Records that carry a store-assigned identity.

/// Anything keyed by an id the store hands out.
///
/// Two rows with equal fields but different ids are different records; the
/// in-memory store keys its map by this id.
pub trait Entity {
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
