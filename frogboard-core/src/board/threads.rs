//! Thread index: opening posts, their replies and bump order

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{PostId, ThreadTitle};

/// A thread is an opening post plus replies in posting order
#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    pub op: PostId,
    pub title: ThreadTitle,
    /// Creation time of the newest post in the thread
    pub last_bump: DateTime<Utc>,
    pub replies: Vec<PostId>,
}

#[derive(Debug, Clone, Default)]
pub struct ThreadIndex {
    threads: HashMap<PostId, Thread>,
    /// reply -> thread it belongs to
    parent: HashMap<PostId, PostId>,
}

impl ThreadIndex {
    pub fn open(&mut self, op: PostId, title: ThreadTitle, at: DateTime<Utc>) {
        self.threads.insert(
            op,
            Thread {
                op,
                title,
                last_bump: at,
                replies: Vec::new(),
            },
        );
    }

    /// Append a reply and bump the thread. Returns false for an unknown thread.
    pub fn append(&mut self, thread: PostId, reply: PostId, at: DateTime<Utc>) -> bool {
        let Some(entry) = self.threads.get_mut(&thread) else {
            return false;
        };
        entry.replies.push(reply);
        entry.last_bump = entry.last_bump.max(at);
        self.parent.insert(reply, thread);
        true
    }

    pub fn get(&self, op: PostId) -> Option<&Thread> {
        self.threads.get(&op)
    }

    pub fn contains(&self, op: PostId) -> bool {
        self.threads.contains_key(&op)
    }

    /// Thread a post lives in: itself for an opening post, its parent for a reply.
    pub fn thread_of(&self, post: PostId) -> Option<PostId> {
        if self.threads.contains_key(&post) {
            Some(post)
        } else {
            self.parent.get(&post).copied()
        }
    }

    /// All threads, most recently bumped first.
    pub fn by_bump(&self) -> Vec<&Thread> {
        let mut threads: Vec<&Thread> = self.threads.values().collect();
        threads.sort_by(|a, b| b.last_bump.cmp(&a.last_bump).then(b.op.cmp(&a.op)));
        threads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn id(n: u64) -> PostId {
        PostId::new(n).unwrap()
    }

    #[test]
    fn reply_bumps_thread() {
        let mut index = ThreadIndex::default();
        index.open(id(1), ThreadTitle::default(), at(0));
        index.open(id(2), ThreadTitle::default(), at(1));

        let order: Vec<_> = index.by_bump().iter().map(|t| t.op).collect();
        assert_eq!(order, vec![id(2), id(1)]);

        assert!(index.append(id(1), id(3), at(2)));
        let order: Vec<_> = index.by_bump().iter().map(|t| t.op).collect();
        assert_eq!(order, vec![id(1), id(2)]);
        assert_eq!(index.get(id(1)).unwrap().replies, vec![id(3)]);
    }

    #[test]
    fn append_to_unknown_thread_fails() {
        let mut index = ThreadIndex::default();
        assert!(!index.append(id(7), id(8), at(0)));
        assert!(index.thread_of(id(8)).is_none());
    }

    #[test]
    fn thread_of_resolves_replies() {
        let mut index = ThreadIndex::default();
        index.open(id(1), ThreadTitle::default(), at(0));
        index.append(id(1), id(2), at(1));

        assert_eq!(index.thread_of(id(1)), Some(id(1)));
        assert_eq!(index.thread_of(id(2)), Some(id(1)));
        assert_eq!(index.thread_of(id(3)), None);
    }
}
