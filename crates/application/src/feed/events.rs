//! Change notifications published by [`FeedClient`](super::FeedClient).

/// A change to the feed contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A page was fetched and merged into the feed.
    PageLoaded {
        /// Page number that was loaded.
        page: u32,
        /// Photos appended from this page.
        added: usize,
        /// Photos in the feed after the merge.
        total: usize,
    },
    /// The like state of one photo changed.
    PhotoUpdated {
        /// Photo id.
        id: String,
        /// New like state.
        is_liked: bool,
    },
    /// The feed was emptied.
    Reset,
}
