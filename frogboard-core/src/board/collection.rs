//! Append-only post collection kept in creation order

use std::collections::HashMap;
use std::slice;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DuplicateIdError;
use crate::models::{Post, PostId};

/// Listing direction by `created_at` (ties broken by id)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

/// Posts keyed by id plus a timeline sorted by `(created_at, id)`
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: HashMap<PostId, Post>,
    timeline: Vec<(DateTime<Utc>, PostId)>,
}

impl PostCollection {
    /// Insert a post. A colliding id leaves the collection untouched.
    pub fn insert(&mut self, post: Post) -> Result<(), DuplicateIdError> {
        let id = post.id();
        if self.posts.contains_key(&id) {
            return Err(DuplicateIdError { id });
        }

        let key = (post.created_at(), id);
        let at = self.timeline.partition_point(|entry| *entry < key);
        self.timeline.insert(at, key);
        self.posts.insert(id, post);
        Ok(())
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.posts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Most recently created post.
    pub fn newest(&self) -> Option<&Post> {
        self.timeline.last().and_then(|(_, id)| self.posts.get(id))
    }

    /// Walk posts in `order` without copying them.
    pub fn iter(&self, order: Order) -> Posts<'_> {
        Posts {
            timeline: self.timeline.iter(),
            posts: &self.posts,
            order,
        }
    }
}

/// Lazy iterator over a [`PostCollection`]
pub struct Posts<'a> {
    timeline: slice::Iter<'a, (DateTime<Utc>, PostId)>,
    posts: &'a HashMap<PostId, Post>,
    order: Order,
}

impl<'a> Iterator for Posts<'a> {
    type Item = &'a Post;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, id) = match self.order {
            Order::Ascending => self.timeline.next()?,
            Order::Descending => self.timeline.next_back()?,
        };
        self.posts.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.timeline.size_hint()
    }
}
