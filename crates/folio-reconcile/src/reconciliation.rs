use std::collections::BTreeSet;
use std::fmt;

use folio_types::SequenceKey;
use serde::{Deserialize, Serialize};

/// How a delivery differs from what is already stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drift {
    /// Nothing is stored for the volume.
    NoPriorRecord,
    Unchanged,
    /// At least one stored page is absent from the delivery. Takes
    /// precedence over [`Drift::MorePages`].
    FewerPages,
    MorePages,
}

impl Drift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPriorRecord => "no_prior_record",
            Self::Unchanged => "unchanged",
            Self::FewerPages => "fewer_pages",
            Self::MorePages => "more_pages",
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The drift classification together with the key sets behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub drift: Drift,
    pub prior: BTreeSet<SequenceKey>,
    pub new: BTreeSet<SequenceKey>,
    /// Stored keys absent from the delivery.
    pub to_remove: BTreeSet<SequenceKey>,
    /// Delivered keys not yet stored.
    pub to_add: BTreeSet<SequenceKey>,
}

impl Reconciliation {
    /// Returns `true` if the delivery matches what is stored.
    pub fn is_unchanged(&self) -> bool {
        self.drift == Drift::Unchanged
    }

    /// First and last stored keys.
    pub fn prior_bounds(&self) -> Option<(&SequenceKey, &SequenceKey)> {
        first_last(&self.prior)
    }

    /// First and last delivered keys.
    pub fn new_bounds(&self) -> Option<(&SequenceKey, &SequenceKey)> {
        first_last(&self.new)
    }
}

fn first_last(keys: &BTreeSet<SequenceKey>) -> Option<(&SequenceKey, &SequenceKey)> {
    Some((keys.first()?, keys.last()?))
}

/// Classify the drift between stored keys `prior` and delivered keys `new`.
///
/// With nothing stored the result is [`Drift::NoPriorRecord`] and no
/// difference sets are computed.
pub fn reconcile(prior: BTreeSet<SequenceKey>, new: BTreeSet<SequenceKey>) -> Reconciliation {
    if prior.is_empty() {
        return Reconciliation {
            drift: Drift::NoPriorRecord,
            prior,
            new,
            to_remove: BTreeSet::new(),
            to_add: BTreeSet::new(),
        };
    }

    let to_remove: BTreeSet<_> = prior.difference(&new).cloned().collect();
    let to_add: BTreeSet<_> = new.difference(&prior).cloned().collect();
    let drift = if !to_remove.is_empty() {
        Drift::FewerPages
    } else if !to_add.is_empty() {
        Drift::MorePages
    } else {
        Drift::Unchanged
    };

    Reconciliation {
        drift,
        prior,
        new,
        to_remove,
        to_add,
    }
}
