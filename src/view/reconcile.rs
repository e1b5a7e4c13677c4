use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Gender, Month};

/// Identity of one line-chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeriesId {
    Gender(Gender),
    Total,
}

impl SeriesId {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gender(gender) => gender.label(),
            Self::Total => "Total",
        }
    }
}

/// Stable identity key used to match rendered elements across redraws.
///
/// Keys are pure data derived from the element's domain identity, never from
/// its position in a collection, so an unchanged filter re-derivation maps
/// every element onto itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKey {
    /// One heatmap grid cell.
    Cell { year: i32, month: Month },
    /// One stacked-bar segment.
    Segment { gender: Gender, month: Month },
    /// One series path in the line chart.
    SeriesPath { series: SeriesId },
    /// One point marker on a line series.
    SeriesPoint {
        series: SeriesId,
        year: i32,
        month: Month,
    },
    /// One overview-strip bar.
    YearBar { year: i32 },
    /// Conditional-existence overlay anchored to a calendar date.
    DateMarker { year: i32, month: Month },
}

/// Element counts of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

impl ReconcileStats {
    pub fn merge(&mut self, other: Self) {
        self.entered += other.entered;
        self.updated += other.updated;
        self.exited += other.exited;
    }
}

/// One persisting element with its previous and target visual state.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedUpdate<T> {
    pub key: ElementKey,
    pub previous: T,
    pub target: T,
}

/// Three-way partition of one redraw: entering, persisting, and exiting
/// elements, each carrying the visual payload the animation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan<T> {
    pub enter: Vec<(ElementKey, T)>,
    pub update: Vec<KeyedUpdate<T>>,
    pub exit: Vec<(ElementKey, T)>,
}

impl<T> ReconcilePlan<T> {
    #[must_use]
    pub fn stats(&self) -> ReconcileStats {
        ReconcileStats {
            entered: self.enter.len(),
            updated: self.update.len(),
            exited: self.exit.len(),
        }
    }
}

/// Retained, keyed element store for one view.
///
/// Insertion order is paint order; reconciliation replaces the contents with
/// the target elements in target order, so the store always mirrors what is
/// on screen and exiting elements can never be left orphaned.
#[derive(Debug, Clone, Default)]
pub struct KeyedScene<T> {
    elements: IndexMap<ElementKey, T>,
}

impl<T: Clone> KeyedScene<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: ElementKey) -> bool {
        self.elements.contains_key(&key)
    }

    #[must_use]
    pub fn get(&self, key: ElementKey) -> Option<&T> {
        self.elements.get(&key)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ElementKey, &T)> {
        self.elements.iter().map(|(key, value)| (*key, value))
    }

    /// Replaces the scene contents with `targets` and returns the three-way
    /// enter/update/exit plan between the previous and the new contents.
    pub fn reconcile(&mut self, targets: Vec<(ElementKey, T)>) -> ReconcilePlan<T> {
        let mut next: IndexMap<ElementKey, T> = IndexMap::with_capacity(targets.len());
        let mut enter = Vec::new();
        let mut update = Vec::new();

        for (key, target) in targets {
            debug_assert!(!next.contains_key(&key), "duplicate element key in targets");
            match self.elements.get(&key) {
                Some(previous) => update.push(KeyedUpdate {
                    key,
                    previous: previous.clone(),
                    target: target.clone(),
                }),
                None => enter.push((key, target.clone())),
            }
            next.insert(key, target);
        }

        let exit = self
            .elements
            .iter()
            .filter(|(key, _)| !next.contains_key(*key))
            .map(|(key, value)| (*key, value.clone()))
            .collect();

        self.elements = next;
        ReconcilePlan {
            enter,
            update,
            exit,
        }
    }
}
