//! Cart sanitization
//!
//! `plan_repair` decides what a stored cart blob should become without
//! touching storage. `CartSanitizer` wraps it with one read and at most one
//! write against a `CartStore`.

use tracing::{debug, error, info, warn};

use crate::cart::{value_kind, Cart, CartEntry};
use crate::config::SanitizerConfig;
use crate::error::CartResult;
use crate::item::ItemRepair;
use crate::report::{RepairStatus, SanitizeReport};
use crate::storage::CartStore;

/// Decision reached for one stored cart
#[derive(Debug, Clone, PartialEq)]
pub struct RepairPlan {
    /// `Empty`, `Unchanged` or `Repaired`
    pub status: RepairStatus,
    /// Final cart contents, absent when nothing was stored
    pub cart: Option<Cart>,
    /// Every field replaced, in cart order
    pub repairs: Vec<ItemRepair>,
    /// Serialized cart to write back; only set when something was repaired
    pub persist: Option<String>,
}

impl RepairPlan {
    pub fn empty() -> Self {
        Self {
            status: RepairStatus::Empty,
            cart: None,
            repairs: Vec::new(),
            persist: None,
        }
    }
}

/// Work out the repaired form of a raw stored cart.
///
/// `None` or an empty string means nothing is stored. Errors are
/// `CartError::Format` for unparseable input and `CartError::Shape` for
/// anything that is not an array.
pub fn plan_repair(raw: Option<&str>, default_image_url: &str) -> CartResult<RepairPlan> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(RepairPlan::empty());
    };

    let mut cart = Cart::parse(raw)?;
    debug!(before = raw, entries = cart.len(), "cart data before repair");

    let mut repairs = Vec::new();
    for (index, entry) in cart.entries_mut().iter_mut().enumerate() {
        match entry {
            CartEntry::Item(item) => {
                for (field, previous) in item.repair(default_image_url) {
                    info!(
                        index,
                        name = item.name().unwrap_or_default(),
                        field = field.as_str(),
                        previous = %previous,
                        "repaired cart item"
                    );
                    repairs.push(ItemRepair {
                        index,
                        name: item.name().map(str::to_string),
                        field,
                        previous,
                    });
                }
            }
            CartEntry::Other(value) => {
                warn!(index, kind = value_kind(value), "leaving non-object cart entry as stored");
            }
        }
    }

    if repairs.is_empty() {
        return Ok(RepairPlan {
            status: RepairStatus::Unchanged,
            cart: Some(cart),
            repairs,
            persist: None,
        });
    }

    let persist = cart.to_json()?;
    debug!(after = %persist, "cart data after repair");

    Ok(RepairPlan {
        status: RepairStatus::Repaired,
        cart: Some(cart),
        repairs,
        persist: Some(persist),
    })
}

/// Runs repair passes against one store
pub struct CartSanitizer<S> {
    store: S,
    config: SanitizerConfig,
}

impl<S: CartStore> CartSanitizer<S> {
    /// Create a sanitizer, rejecting an invalid configuration
    pub fn new(store: S, config: SanitizerConfig) -> CartResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Run one pass, returning the raw plan or the error that stopped it
    pub fn try_sanitize(&self) -> CartResult<RepairPlan> {
        let key = self.config.storage_key.as_str();
        info!(key, "starting cart repair");

        let raw = self.store.get(key)?;
        let plan = plan_repair(raw.as_deref(), &self.config.default_image_url)?;

        match (&plan.persist, self.config.dry_run) {
            (Some(_), true) => {
                info!(key, repairs = plan.repairs.len(), "dry run, repaired cart not written");
            }
            (Some(persist), false) => {
                self.store.set(key, persist)?;
                info!(key, repairs = plan.repairs.len(), "repaired cart saved");
            }
            (None, _) => {
                info!(key, status = plan.status.as_str(), "cart needs no repair");
            }
        }

        Ok(plan)
    }

    /// Run one pass and fold any failure into the report
    pub fn sanitize(&self) -> SanitizeReport {
        match self.try_sanitize() {
            Ok(plan) => SanitizeReport::from_plan(plan, self.config.dry_run),
            Err(e) => {
                error!(key = %self.config.storage_key, error = %e, "cart repair failed");
                SanitizeReport::failure(&e, self.config.dry_run)
            }
        }
    }
}
