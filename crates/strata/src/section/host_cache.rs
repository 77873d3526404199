//! Container-side storage for content hosts.
//!
//! Hosts are expensive. A container keeps one per identity (and one per
//! supplementary slot) and hands it back to the owning section on every
//! update pass so it is rebound in place instead of recreated.

use std::collections::{HashMap, HashSet};

use strata_core::ThreadAffinity;
use strata_core::logging::targets;

use super::collection::SectionList;
use super::host::ContentHost;
use super::traits::{HostUpdate, SectionDataSource};
use super::unique_id::{SectionKey, UniqueId};

/// What a cached host is serving.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKey {
    /// An item cell.
    Item(UniqueId),
    /// A supplementary view of one section.
    Supplementary {
        /// The owning section.
        section: SectionKey,
        /// The slot kind.
        kind: String,
    },
}

/// Hosts keyed by identity, owned by one thread.
///
/// # Example
///
/// ```
/// use strata::section::{HostCache, Section, SectionDataSource};
///
/// let section = Section::new("s", vec![1u32, 2], |n: &u32| *n, |n: &u32, _| n * 10);
/// let id = section.unique_id_at(0).unwrap();
///
/// let mut cache = HostCache::new();
/// let first = cache.host_for_item(&section, &id).map(|h| h.host_id());
/// let again = cache.host_for_item(&section, &id).map(|h| h.host_id());
/// assert_eq!(first, again);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Default)]
pub struct HostCache {
    hosts: HashMap<HostKey, Box<dyn ContentHost>>,
    affinity: ThreadAffinity,
}

impl HostCache {
    /// Creates an empty cache owned by the current thread.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if called off the thread that created the cache.
    ///
    /// Containers call this at the start of an update pass. The per-call
    /// checks on the other methods only run in debug builds.
    pub fn check_thread(&self) -> strata_core::Result<()> {
        self.affinity.check().inspect_err(|err| {
            tracing::error!(target: targets::HOST, %err, "host cache used off its owner thread");
        })
    }

    /// The host for `id`, rebound with the item's current content.
    ///
    /// Creates the host on first use. If `id` no longer resolves, any cached
    /// host for it is dropped and `None` is returned.
    pub fn host_for_item(
        &mut self,
        source: &dyn SectionDataSource,
        id: &UniqueId,
    ) -> Option<&mut dyn ContentHost> {
        self.affinity.debug_assert_same_thread();
        let key = HostKey::Item(*id);
        self.host_for(key, |existing| source.update_or_create_host(id, existing))
    }

    /// The host for supplementary slot `kind` of `source`.
    pub fn host_for_supplementary(
        &mut self,
        source: &dyn SectionDataSource,
        kind: &str,
    ) -> Option<&mut dyn ContentHost> {
        self.affinity.debug_assert_same_thread();
        let key = HostKey::Supplementary {
            section: source.section_key(),
            kind: kind.to_owned(),
        };
        self.host_for(key, |existing| {
            source.update_or_create_supplementary_host(kind, existing)
        })
    }

    fn host_for<F>(&mut self, key: HostKey, produce: F) -> Option<&mut dyn ContentHost>
    where
        F: FnOnce(Option<Box<dyn ContentHost>>) -> Option<Box<dyn ContentHost>>,
    {
        let existing = self.hosts.remove(&key);
        let had_existing = existing.is_some();
        match produce(existing) {
            Some(host) => {
                let slot = self.hosts.entry(key).or_insert(host);
                Some(slot.as_mut())
            }
            None => {
                if had_existing {
                    tracing::trace!(target: targets::HOST, ?key, "key gone; host dropped");
                }
                None
            }
        }
    }

    /// Refresh the cached host for `id` in place.
    ///
    /// A host of the wrong content type is discarded and recreated. Returns
    /// what happened to the cached host, or `Unresolved` if there is nothing
    /// cached or the identity does not resolve.
    pub fn refresh_item(&mut self, source: &dyn SectionDataSource, id: &UniqueId) -> HostUpdate {
        self.affinity.debug_assert_same_thread();
        let key = HostKey::Item(*id);
        let Some(host) = self.hosts.get_mut(&key) else {
            return HostUpdate::Unresolved;
        };
        let outcome = source.update_host(host.as_mut(), id);
        if outcome == HostUpdate::NotApplicable {
            self.hosts.remove(&key);
            tracing::debug!(target: targets::HOST, %id, "content type changed; recreating host");
            if let Some(fresh) = source.update_or_create_host(id, None) {
                self.hosts.insert(key, fresh);
            }
        }
        outcome
    }

    /// Drop every item host whose identity is not in `live`.
    ///
    /// Supplementary hosts are kept. Returns the number of hosts dropped.
    pub fn retain_ids(&mut self, live: &HashSet<UniqueId>) -> usize {
        self.affinity.debug_assert_same_thread();
        let before = self.hosts.len();
        self.hosts.retain(|key, _| match key {
            HostKey::Item(id) => live.contains(id),
            HostKey::Supplementary { .. } => true,
        });
        before - self.hosts.len()
    }

    /// Drop every host whose identity or slot does not recur in `sections`.
    ///
    /// Returns the number of hosts dropped.
    pub fn prune_to(&mut self, sections: &SectionList) -> usize {
        self.affinity.debug_assert_same_thread();
        let live_ids: HashSet<UniqueId> = sections
            .unique_ids()
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        let live_slots: HashSet<(SectionKey, String)> = sections
            .iter()
            .flat_map(|section| {
                let key = section.section_key();
                section.supplementary_kinds().into_iter().map(move |kind| (key, kind))
            })
            .collect();

        let before = self.hosts.len();
        self.hosts.retain(|key, _| match key {
            HostKey::Item(id) => live_ids.contains(id),
            HostKey::Supplementary { section, kind } => {
                live_slots.contains(&(*section, kind.clone()))
            }
        });
        let dropped = before - self.hosts.len();
        if dropped > 0 {
            tracing::debug!(
                target: targets::HOST,
                dropped,
                remaining = self.hosts.len(),
                "pruned hosts"
            );
        }
        dropped
    }

    /// The cached host for `key`, without rebinding it.
    pub fn get(&self, key: &HostKey) -> Option<&dyn ContentHost> {
        self.hosts.get(key).map(|h| h.as_ref())
    }

    /// Remove and return the cached host for `key`.
    pub fn remove(&mut self, key: &HostKey) -> Option<Box<dyn ContentHost>> {
        self.affinity.debug_assert_same_thread();
        self.hosts.remove(key)
    }

    /// Number of cached hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns `true` if no hosts are cached.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Drop every cached host.
    pub fn clear(&mut self) {
        self.affinity.debug_assert_same_thread();
        self.hosts.clear();
    }
}

impl std::fmt::Debug for HostCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostCache")
            .field("len", &self.hosts.len())
            .field("owner", &self.affinity.owner())
            .finish()
    }
}
