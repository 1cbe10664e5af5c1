//! Offer module - the three-slot tray and its weighted generator
//!
//! The generator partitions a catalog into size buckets (small / medium /
//! large) once, then fills each tray slot with an independent weighted draw:
//! first pick a bucket using the slot's thresholds, then pick uniformly inside
//! the bucket. Earlier slots lean towards smaller, easier shapes.

use thiserror::Error;

use crate::rng::RandomSource;
use crate::shapes::{Shape, SizeBucket, CATALOG};
use crate::types::{OFFER_SLOTS, OFFER_SLOT_THRESHOLDS};

/// The current tray: each slot holds a shape until it is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offer {
    slots: [Option<&'static Shape>; OFFER_SLOTS],
}

impl Offer {
    pub fn new(slots: [Option<&'static Shape>; OFFER_SLOTS]) -> Self {
        Self { slots }
    }

    /// A tray with every slot used up
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shape in `slot`; `None` when the slot is used or out of range
    pub fn get(&self, slot: usize) -> Option<&'static Shape> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<&'static Shape>; OFFER_SLOTS] {
        &self.slots
    }

    /// Remove and return the shape in `slot`
    pub fn take(&mut self, slot: usize) -> Option<&'static Shape> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// True once every slot has been used
    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Shapes still available, in slot order
    pub fn shapes(&self) -> impl Iterator<Item = &'static Shape> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Index of the first slot that still holds a shape
    pub fn first_available(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog has no {} shapes", .0.as_str())]
    EmptyBucket(SizeBucket),
}

/// Weighted-bucket offer generator over a static catalog
#[derive(Debug, Clone)]
pub struct OfferGenerator {
    small: Vec<&'static Shape>,
    medium: Vec<&'static Shape>,
    large: Vec<&'static Shape>,
}

impl OfferGenerator {
    /// Generator over the built-in [`CATALOG`]
    ///
    /// The built-in catalog's buckets are checked at compile time.
    pub fn standard() -> Self {
        Self::partition(&CATALOG)
    }

    /// Generator over a custom catalog; every bucket must be non-empty.
    pub fn from_catalog(catalog: &'static [Shape]) -> Result<Self, CatalogError> {
        let generator = Self::partition(catalog);
        for bucket in SizeBucket::ALL {
            if generator.bucket(bucket).is_empty() {
                return Err(CatalogError::EmptyBucket(bucket));
            }
        }
        Ok(generator)
    }

    fn partition(catalog: &'static [Shape]) -> Self {
        let mut generator = Self {
            small: Vec::new(),
            medium: Vec::new(),
            large: Vec::new(),
        };
        for shape in catalog {
            match shape.bucket() {
                SizeBucket::Small => generator.small.push(shape),
                SizeBucket::Medium => generator.medium.push(shape),
                SizeBucket::Large => generator.large.push(shape),
            }
        }
        generator
    }

    pub fn bucket(&self, bucket: SizeBucket) -> &[&'static Shape] {
        match bucket {
            SizeBucket::Small => &self.small,
            SizeBucket::Medium => &self.medium,
            SizeBucket::Large => &self.large,
        }
    }

    /// Draw one shape for tray slot `slot`
    pub fn draw_slot<R: RandomSource + ?Sized>(&self, slot: usize, rng: &mut R) -> &'static Shape {
        let bucket = self.bucket(bucket_for_draw(slot, rng.next_f64()));
        bucket[rng.pick(bucket.len())]
    }

    /// A full tray of three fresh shapes
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Offer {
        let mut slots = [None; OFFER_SLOTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = Some(self.draw_slot(i, rng));
        }
        Offer::new(slots)
    }
}

impl Default for OfferGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Bucket chosen for tray slot `slot` by a uniform draw `r` in `[0, 1)`.
///
/// Slots past the last threshold entry reuse the last one.
pub fn bucket_for_draw(slot: usize, r: f64) -> SizeBucket {
    let t = OFFER_SLOT_THRESHOLDS[slot.min(OFFER_SLOTS - 1)];
    if r < t.small {
        SizeBucket::Small
    } else if r < t.medium {
        SizeBucket::Medium
    } else {
        SizeBucket::Large
    }
}
