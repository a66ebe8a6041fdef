//! Bag directory: the validated, ordered set of bags for one run
//!
//! Loading fails fast when the snapshot carries a bag ceiling outside the
//! configured threshold list, since that means the run's threshold
//! configuration is stale. Empty bags are dropped, and the rest are ordered
//! descending by ceiling; that total order is what makes a global rank
//! well-defined across repeated runs against the same snapshot.

use bagtender_core::{BagSnapshot, Error, ListProvider, Result, Thresholds, Weight};
use tracing::debug;

/// All non-empty bags of a snapshot, descending by ceiling, plus the
/// validated threshold configuration
#[derive(Debug, Clone)]
pub struct BagDirectory {
    bags: Vec<BagSnapshot>,
    thresholds: Thresholds,
}

impl BagDirectory {
    /// Fetch and validate the bag set from a provider
    ///
    /// # Errors
    ///
    /// [`Error::UnrecognizedThreshold`] if any observed bag ceiling is not
    /// in the configured list; [`Error::InvalidThresholds`] if the
    /// configuration itself is malformed.
    pub async fn load<P: ListProvider + ?Sized>(provider: &P) -> Result<Self> {
        let thresholds = Thresholds::new(provider.thresholds().await?)?;

        let mut bags: Vec<BagSnapshot> = provider
            .bags()
            .await?
            .into_iter()
            .filter(|bag| !bag.is_empty())
            .collect();
        for bag in &bags {
            if !thresholds.recognizes(bag.ceiling) {
                return Err(Error::UnrecognizedThreshold {
                    ceiling: bag.ceiling,
                });
            }
        }
        bags.sort_by(|a, b| b.ceiling.cmp(&a.ceiling));

        debug!(target: "bagtender::rank", bags = bags.len(), "bag directory loaded");
        Ok(Self { bags, thresholds })
    }

    /// The bags, descending by ceiling
    pub fn bags(&self) -> &[BagSnapshot] {
        &self.bags
    }

    /// The validated threshold configuration
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// The bag with exactly this ceiling, if present and non-empty
    pub fn bag(&self, ceiling: Weight) -> Option<&BagSnapshot> {
        self.bags.iter().find(|b| b.ceiling == ceiling)
    }

    /// The bag a weight canonically belongs to, if that bag is non-empty
    ///
    /// # Errors
    ///
    /// [`Error::NoCeilingAbove`] when the weight cannot be classified.
    pub fn bag_for_weight(&self, weight: Weight) -> Result<Option<&BagSnapshot>> {
        let ceiling = self.thresholds.canonical_ceiling(weight)?;
        Ok(self.bag(ceiling))
    }
}
