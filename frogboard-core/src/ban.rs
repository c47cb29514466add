//! IP bans
//!
//! Bans come from configuration and never change while the process runs.
//! A ban applies from `start` (inclusive) until `end` (exclusive).

use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    pub ip: IpAddr,
    #[serde(default)]
    pub reason: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Ban {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }
}

/// Bans indexed by address
#[derive(Debug, Clone, Default)]
pub struct BanList {
    by_ip: HashMap<IpAddr, Vec<Ban>>,
}

impl BanList {
    pub fn new(bans: impl IntoIterator<Item = Ban>) -> Self {
        let mut by_ip: HashMap<IpAddr, Vec<Ban>> = HashMap::new();
        for ban in bans {
            by_ip.entry(ban.ip).or_default().push(ban);
        }
        Self { by_ip }
    }

    /// The ban in force for `ip` at `now`, if any. With overlapping bans the
    /// one ending last wins.
    pub fn active(&self, ip: IpAddr, now: DateTime<Utc>) -> Option<&Ban> {
        self.by_ip
            .get(&ip)?
            .iter()
            .filter(|ban| ban.is_active(now))
            .max_by_key(|ban| ban.end)
    }

    pub fn len(&self) -> usize {
        self.by_ip.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ip.is_empty()
    }
}
