// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Several providers behind one index space.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use hashbrown::HashMap;

use crate::offsets::StartOffsets;
use crate::pairing::{checked_pair, unpair};
use crate::provider::{AdapterChange, ChangeObserver, INVALID_VIEW_TYPE, ItemProvider, NO_ID};
use crate::ComposeError;

/// A boxed provider as stored by the composer.
pub type BoxedProvider<E> = Box<dyn ItemProvider<Element = E>>;

/// How composed view types are derived from provider view types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeMode {
    /// The provider's slot and its view type are paired into one value, so
    /// providers never share a view type.
    #[default]
    Paired,
    /// Provider view types are used as is. Providers reporting the same view
    /// type must create interchangeable elements; the last provider to report
    /// a type creates its elements.
    Consistent,
}

struct Registration<E> {
    slot: u64,
    provider: BoxedProvider<E>,
}

/// Concatenates the items of several providers into one position space.
///
/// Each provider owns a contiguous slice of positions, in list order. Every
/// provider is also given a slot: an id assigned on registration, never
/// reused, and independent of the provider's place in the list. View types
/// and stable ids are made unique across providers by pairing them with the
/// slot (see [`pairing`](crate::pairing)).
///
/// Providers report their own changes with [`AdapterComposer::notify`]; the
/// composer updates its offsets and forwards the change, translated to
/// composed positions, to its observer.
pub struct AdapterComposer<E, P = ()> {
    registrations: Vec<Registration<E>>,
    offsets: StartOffsets,
    mode: TypeMode,
    has_stable_ids: bool,
    next_slot: u64,
    type_owners: HashMap<i64, u64>,
    observer: Option<Box<dyn ChangeObserver<P>>>,
}

impl<E, P> fmt::Debug for AdapterComposer<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<_> = self
            .registrations
            .iter()
            .map(|r| (r.slot, &r.provider))
            .collect();
        f.debug_struct("AdapterComposer")
            .field("providers", &providers)
            .field("offsets", &self.offsets)
            .field("mode", &self.mode)
            .field("has_stable_ids", &self.has_stable_ids)
            .field("next_slot", &self.next_slot)
            .field("type_owners", &self.type_owners)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<E, P: Clone> AdapterComposer<E, P> {
    /// An empty composer.
    #[must_use]
    pub fn new(mode: TypeMode) -> Self {
        Self {
            registrations: Vec::new(),
            offsets: StartOffsets::default(),
            mode,
            has_stable_ids: false,
            next_slot: 0,
            type_owners: HashMap::new(),
            observer: None,
        }
    }

    /// Whether [`AdapterComposer::stable_id`] reports provider ids.
    #[must_use]
    pub fn with_stable_ids(mut self, has_stable_ids: bool) -> Self {
        self.has_stable_ids = has_stable_ids;
        self
    }

    /// The view type mode chosen at construction.
    #[must_use]
    pub const fn mode(&self) -> TypeMode {
        self.mode
    }

    /// Whether stable ids are reported.
    #[must_use]
    pub const fn has_stable_ids(&self) -> bool {
        self.has_stable_ids
    }

    /// Sets the observer receiving composed changes, returning the previous one.
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn ChangeObserver<P>>>,
    ) -> Option<Box<dyn ChangeObserver<P>>> {
        core::mem::replace(&mut self.observer, observer)
    }

    /// Total number of composed items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.offsets.total()
    }

    /// Number of providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.registrations.len()
    }

    /// The provider at `index` in list order.
    #[must_use]
    pub fn provider(&self, index: usize) -> Option<&dyn ItemProvider<Element = E>> {
        self.registrations.get(index).map(|r| &*r.provider)
    }

    /// Mutable access to the provider at `index`.
    ///
    /// Changes to its items must be reported with [`AdapterComposer::notify`].
    pub fn provider_mut(&mut self, index: usize) -> Option<&mut BoxedProvider<E>> {
        self.registrations.get_mut(index).map(|r| &mut r.provider)
    }

    /// Slot of the provider at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<u64> {
        self.registrations.get(index).map(|r| r.slot)
    }

    /// List index of the provider registered with `slot`.
    #[must_use]
    pub fn index_of_slot(&self, slot: u64) -> Option<usize> {
        self.registrations.iter().position(|r| r.slot == slot)
    }

    /// First composed position of the provider at `index`.
    #[must_use]
    pub fn start_position(&self, index: usize) -> Option<usize> {
        self.offsets.start(index)
    }

    /// Composed positions owned by the provider at `index`.
    #[must_use]
    pub fn provider_range(&self, index: usize) -> Option<Range<usize>> {
        self.offsets.span(index)
    }

    /// The provider index and local position for a composed `position`.
    #[must_use]
    pub fn find_provider(&self, position: usize) -> Option<(usize, usize)> {
        self.offsets.locate(position)
    }

    /// Appends a provider and returns its slot.
    pub fn add_provider(&mut self, provider: BoxedProvider<E>) -> u64 {
        let index = self.registrations.len();
        self.register(index, provider)
    }

    /// Inserts a provider before the one at `index` and returns its slot.
    pub fn insert_provider(
        &mut self,
        index: usize,
        provider: BoxedProvider<E>,
    ) -> Result<u64, ComposeError> {
        let len = self.registrations.len();
        if index > len {
            return Err(ComposeError::ProviderOutOfBounds { index, len });
        }
        Ok(self.register(index, provider))
    }

    fn register(&mut self, index: usize, provider: BoxedProvider<E>) -> u64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        let count = provider.item_count();
        self.registrations.insert(index, Registration { slot, provider });
        self.offsets.insert(index, count);
        log::debug!("provider slot {slot} registered at {index} with {count} items");
        if count > 0 {
            let start = self.offsets.start(index).unwrap_or_default();
            self.emit(AdapterChange::Inserted { start, count });
        }
        slot
    }

    /// Removes the provider at `index`.
    pub fn remove_provider(&mut self, index: usize) -> Result<BoxedProvider<E>, ComposeError> {
        let len = self.registrations.len();
        if index >= len {
            return Err(ComposeError::ProviderOutOfBounds { index, len });
        }
        let start = self.offsets.start(index).unwrap_or_default();
        let count = self.offsets.remove(index);
        let Registration { slot, provider } = self.registrations.remove(index);
        self.type_owners.retain(|_, owner| *owner != slot);
        log::debug!("provider slot {slot} removed from {index}");
        if count > 0 {
            self.emit(AdapterChange::Removed { start, count });
        }
        Ok(provider)
    }

    /// Removes the provider registered with `slot`.
    pub fn remove_provider_by_slot(&mut self, slot: u64) -> Result<BoxedProvider<E>, ComposeError> {
        let index = self
            .index_of_slot(slot)
            .ok_or(ComposeError::UnknownSlot { slot })?;
        self.remove_provider(index)
    }

    /// Removes every provider.
    pub fn clear_providers(&mut self) -> Vec<BoxedProvider<E>> {
        let had_items = self.item_count() > 0;
        self.offsets.clear();
        self.type_owners.clear();
        let providers = self.registrations.drain(..).map(|r| r.provider).collect();
        if had_items {
            self.emit(AdapterChange::Changed);
        }
        providers
    }

    /// Replaces every provider, reporting a single full change.
    ///
    /// Returns the new slots in list order.
    pub fn set_providers(&mut self, providers: Vec<BoxedProvider<E>>) -> Vec<u64> {
        let observer = self.observer.take();
        self.clear_providers();
        let slots = providers
            .into_iter()
            .map(|provider| self.add_provider(provider))
            .collect();
        self.observer = observer;
        self.emit(AdapterChange::Changed);
        slots
    }

    /// Folds a provider change into the composed space and forwards it.
    ///
    /// Call after the provider at `slot` changed its items. The provider's
    /// new item count is read back, later providers' start positions are
    /// recomputed, and `change` is forwarded with composed positions. A
    /// `Changed` that keeps the item count becomes a change of the provider's
    /// items only. A change that does not agree with the new item count is
    /// forwarded as a full `Changed`.
    ///
    /// Returns the forwarded change.
    pub fn notify(
        &mut self,
        slot: u64,
        change: AdapterChange<P>,
    ) -> Result<AdapterChange<P>, ComposeError> {
        let index = self
            .index_of_slot(slot)
            .ok_or(ComposeError::UnknownSlot { slot })?;
        let count = self.registrations[index].provider.item_count();
        let previous = self.offsets.set_count(index, count);
        let start = self.offsets.start(index).unwrap_or_default();

        let consistent = match &change {
            AdapterChange::Changed => true,
            AdapterChange::Inserted { start, count: n } => {
                previous + n == count && start + n <= count
            }
            AdapterChange::Removed { start, count: n } => {
                previous.checked_sub(*n) == Some(count) && start + n <= previous
            }
            AdapterChange::Moved { from, to, count: n } => {
                previous == count && from.max(to) + n <= count
            }
            AdapterChange::ItemsChanged { start, count: n, .. } => {
                previous == count && start + n <= count
            }
        };
        let composed = match change {
            AdapterChange::Changed if previous == count => AdapterChange::ItemsChanged {
                start,
                count,
                payload: None,
            },
            AdapterChange::Changed => AdapterChange::Changed,
            change if consistent => change.shifted(start),
            _ => {
                log::warn!(
                    "slot {slot} reported a change that does not match going from {previous} \
                     to {count} items; forwarding a full change"
                );
                AdapterChange::Changed
            }
        };
        self.emit(composed.clone());
        Ok(composed)
    }

    fn emit(&mut self, change: AdapterChange<P>) {
        if let Some(observer) = self.observer.as_deref_mut() {
            change.dispatch(observer);
        }
    }

    fn locate(&self, position: usize) -> Result<(usize, usize), ComposeError> {
        self.offsets
            .locate(position)
            .ok_or(ComposeError::PositionOutOfBounds {
                position,
                item_count: self.item_count(),
            })
    }

    /// Composed view type of the item at `position`, without recording it.
    ///
    /// Negative provider view types are returned unchanged. In
    /// [`TypeMode::Consistent`] the type is returned as reported, and
    /// [`create_element`](Self::create_element) only knows it once
    /// [`item_view_type`](Self::item_view_type) has recorded its provider.
    pub fn view_type(&self, position: usize) -> Result<i64, ComposeError> {
        let (index, local) = self.locate(position)?;
        let Registration { slot, provider } = &self.registrations[index];
        let view_type = provider.item_view_type(local);
        if view_type < 0 || self.mode == TypeMode::Consistent {
            return Ok(view_type);
        }
        Ok(compose(*slot, view_type).unwrap_or_else(|| {
            log::warn!("view type {view_type} of slot {slot} does not fit when paired");
            INVALID_VIEW_TYPE
        }))
    }

    /// Composed view type of the item at `position`, recorded for element creation.
    ///
    /// Same as [`view_type`](Self::view_type). In [`TypeMode::Consistent`]
    /// the item's provider also becomes the one that creates elements of
    /// this type.
    pub fn item_view_type(&mut self, position: usize) -> Result<i64, ComposeError> {
        let view_type = self.view_type(position)?;
        if self.mode == TypeMode::Consistent && view_type >= 0 {
            let (index, _) = self.locate(position)?;
            let slot = self.registrations[index].slot;
            if let Some(previous) = self.type_owners.insert(view_type, slot)
                && previous != slot
            {
                log::debug!("view type {view_type} now created by slot {slot}, was {previous}");
            }
        }
        Ok(view_type)
    }

    /// Composed stable id of the item at `position`.
    ///
    /// [`NO_ID`] unless stable ids were enabled and the provider reports one.
    pub fn stable_id(&self, position: usize) -> Result<i64, ComposeError> {
        let (index, local) = self.locate(position)?;
        if !self.has_stable_ids {
            return Ok(NO_ID);
        }
        let Registration { slot, provider } = &self.registrations[index];
        let id = provider.stable_id(local);
        if id < 0 {
            return Ok(id);
        }
        Ok(compose(*slot, id).unwrap_or_else(|| {
            log::warn!("stable id {id} of slot {slot} does not fit when paired");
            NO_ID
        }))
    }

    /// Creates an element for a composed view type with the provider it came from.
    pub fn create_element(&mut self, view_type: i64) -> Result<E, ComposeError> {
        let unknown = ComposeError::UnknownViewType { view_type };
        let Ok(raw) = u64::try_from(view_type) else {
            return Err(unknown);
        };
        let (slot, local_type) = match self.mode {
            TypeMode::Paired => {
                let (slot, local) = unpair(raw);
                (slot, i64::try_from(local).map_err(|_| unknown)?)
            }
            TypeMode::Consistent => (*self.type_owners.get(&view_type).ok_or(unknown)?, view_type),
        };
        let index = self.index_of_slot(slot).ok_or(unknown)?;
        Ok(self.registrations[index].provider.create_element(local_type))
    }

    /// Binds `element` to the item at composed `position`.
    pub fn bind_element(&mut self, element: &mut E, position: usize) -> Result<(), ComposeError> {
        let (index, local) = self.locate(position)?;
        self.registrations[index]
            .provider
            .bind_element(element, local);
        Ok(())
    }
}

/// Pairs a slot with a non-negative provider value.
fn compose(slot: u64, value: i64) -> Option<i64> {
    let value = u64::try_from(value).ok()?;
    checked_pair(slot, value).and_then(|z| i64::try_from(z).ok())
}
