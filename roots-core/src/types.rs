/// Identifier for a node in a [`crate::root::RootTree`].
///
/// This is an index into `RootTree::nodes`, and is only meaningful within
/// the lifetime of a given `RootTree` instance.
pub type RootId = usize;

/// Identifier for a planted [`crate::root::RootTree`] inside a
/// [`crate::schedule::FrameScheduler`].
///
/// Ids are handed out monotonically and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u64);
