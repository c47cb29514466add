//! Board aggregation
//!
//! A [`BoardAggregator`] owns every post on one board. Writers are
//! serialized by a lock; readers clone an `Arc` snapshot under a read lock
//! and work on it without holding the lock, so a listing never observes a
//! half-applied insert.

pub mod collection;
pub mod directory;
pub mod threads;

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::citation::CitationIndex;
use crate::error::{BoardError, Result};
use crate::models::{
    Author, BoardInfo, Paginated, Pagination, Post, PostContent, PostId, ThreadTitle,
    ValidationError,
};

pub use collection::{Order, PostCollection, Posts};
pub use directory::BoardDirectory;
pub use threads::{Thread, ThreadIndex};

/// A post plus the citation links needed to render it
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: Post,
    /// Earlier posts on this board that the content references
    pub cites: Vec<PostId>,
    /// Later posts that reference this one
    pub cited_by: Vec<PostId>,
}

/// A thread ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    pub title: ThreadTitle,
    pub last_bump: DateTime<Utc>,
    pub op: PostView,
    pub replies: Vec<PostView>,
    /// Replies left out of a preview
    pub omitted: usize,
}

impl ThreadView {
    pub fn id(&self) -> PostId {
        self.op.post.id()
    }

    /// Total replies, shown or not.
    pub fn reply_count(&self) -> usize {
        self.replies.len() + self.omitted
    }
}

#[derive(Debug, Clone, Default)]
struct BoardState {
    posts: PostCollection,
    threads: ThreadIndex,
    citations: CitationIndex,
    last_id: Option<PostId>,
}

impl BoardState {
    fn next_id(&self) -> Result<PostId> {
        match self.last_id {
            None => Ok(PostId::FIRST),
            Some(last) => last.next().ok_or_else(|| {
                BoardError::Validation(ValidationError::InvalidFormat {
                    field: "post id",
                    reason: "board has run out of post ids",
                })
            }),
        }
    }

    /// Timestamp for a new post: never earlier than the newest post, so
    /// creation time stays non-decreasing along the id sequence.
    fn stamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.posts
            .newest()
            .map_or(now, |newest| newest.created_at().max(now))
    }

    /// Citations in `post` that point at earlier posts on this board.
    fn live_citations(&self, post: &Post) -> Vec<PostId> {
        post.content()
            .citations()
            .into_iter()
            .filter(|cited| *cited < post.id() && self.posts.contains(*cited))
            .collect()
    }

    fn insert(&mut self, post: Post) -> Result<()> {
        let id = post.id();
        let cites = self.live_citations(&post);

        self.posts.insert(post)?;
        self.citations.record(id, &cites);
        self.last_id = self.last_id.max(Some(id));
        Ok(())
    }

    fn view(&self, post: &Post) -> PostView {
        PostView {
            cites: self.live_citations(post),
            cited_by: self.citations.cited_by(post.id()).to_vec(),
            post: post.clone(),
        }
    }

    fn thread_view(&self, thread: &Thread, preview: Option<usize>) -> Option<ThreadView> {
        let op = self.posts.get(thread.op)?;
        let shown = preview.map_or(thread.replies.len(), |n| n.min(thread.replies.len()));
        let omitted = thread.replies.len() - shown;

        let replies = thread.replies[omitted..]
            .iter()
            .filter_map(|id| self.posts.get(*id))
            .map(|reply| self.view(reply))
            .collect();

        Some(ThreadView {
            title: thread.title.clone(),
            last_bump: thread.last_bump,
            op: self.view(op),
            replies,
            omitted,
        })
    }
}

/// Snapshot listing returned by [`BoardAggregator::list_posts`].
///
/// Iterating is lazy and can be restarted any number of times; every pass
/// sees the same posts.
#[derive(Debug, Clone)]
pub struct PostListing {
    state: Arc<BoardState>,
    order: Order,
}

impl PostListing {
    pub fn iter(&self) -> Posts<'_> {
        self.state.posts.iter(self.order)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn len(&self) -> usize {
        self.state.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.posts.is_empty()
    }
}

impl<'a> IntoIterator for &'a PostListing {
    type Item = &'a Post;
    type IntoIter = Posts<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// All posts and threads of a single board
#[derive(Debug)]
pub struct BoardAggregator {
    info: BoardInfo,
    state: RwLock<Arc<BoardState>>,
}

impl BoardAggregator {
    pub fn new(info: BoardInfo) -> Self {
        Self {
            info,
            state: RwLock::new(Arc::new(BoardState::default())),
        }
    }

    pub fn info(&self) -> &BoardInfo {
        &self.info
    }

    fn snapshot(&self) -> Arc<BoardState> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Run a mutation under the write lock. Operations check their
    /// preconditions before touching state, so an error leaves the board
    /// unchanged.
    fn write<T>(&self, op: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        op(Arc::make_mut(&mut guard))
    }

    /// Insert a validated post.
    ///
    /// # Errors
    /// [`BoardError::DuplicateId`] when a post with the same id exists.
    pub fn add_post(&self, post: Post) -> Result<()> {
        let id = post.id();
        self.write(|state| state.insert(post))?;
        tracing::debug!(board = %self.info.id, post = %id, "post added");
        Ok(())
    }

    /// Posts ordered by creation time.
    pub fn list_posts(&self, order: Order) -> PostListing {
        PostListing {
            state: self.snapshot(),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().posts.is_empty()
    }

    pub fn post(&self, id: PostId) -> Option<PostView> {
        let state = self.snapshot();
        state.posts.get(id).map(|post| state.view(post))
    }

    /// Start a new thread with the next post id.
    pub fn create_thread(
        &self,
        title: ThreadTitle,
        content: PostContent,
        author: Author,
        now: DateTime<Utc>,
    ) -> Result<Post> {
        let post = self.write(|state| {
            let post = Post::from_parts(state.next_id()?, content, author, state.stamp(now));
            let created_at = post.created_at();
            state.insert(post.clone())?;
            state.threads.open(post.id(), title, created_at);
            Ok(post)
        })?;

        tracing::debug!(board = %self.info.id, thread = %post.id(), "thread created");
        Ok(post)
    }

    /// Append a reply to `thread` and bump it.
    ///
    /// # Errors
    /// [`BoardError::NotFound`] when `thread` is not an opening post here.
    pub fn reply(
        &self,
        thread: PostId,
        content: PostContent,
        author: Author,
        now: DateTime<Utc>,
    ) -> Result<Post> {
        let post = self.write(|state| {
            if !state.threads.contains(thread) {
                return Err(BoardError::not_found("thread", thread));
            }

            let post = Post::from_parts(state.next_id()?, content, author, state.stamp(now));
            let created_at = post.created_at();
            state.insert(post.clone())?;
            state.threads.append(thread, post.id(), created_at);
            Ok(post)
        })?;

        tracing::debug!(board = %self.info.id, thread = %thread, post = %post.id(), "reply added");
        Ok(post)
    }

    /// Full thread: opening post and every reply, oldest first.
    pub fn thread(&self, id: PostId) -> Option<ThreadView> {
        let state = self.snapshot();
        let thread = state.threads.get(id)?;
        state.thread_view(thread, None)
    }

    /// Thread containing `post` (the post itself when it opens a thread).
    pub fn thread_of(&self, post: PostId) -> Option<PostId> {
        self.snapshot().threads.thread_of(post)
    }

    /// Threads by most recent bump, each with its last `preview` replies.
    pub fn latest_threads(&self, window: Pagination, preview: usize) -> Paginated<ThreadView> {
        let state = self.snapshot();
        let ordered = state.threads.by_bump();
        let page = Paginated::from_window(ordered, window);

        Paginated {
            items: page
                .items
                .into_iter()
                .filter_map(|thread| state.thread_view(thread, Some(preview)))
                .collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }

    /// Posts that cite `id`, oldest first.
    pub fn cited_by(&self, id: PostId) -> Vec<PostId> {
        self.snapshot().citations.cited_by(id).to_vec()
    }
}
