//! Line items ("quotes"): one uploaded file plus its print parameters and
//! server-computed estimate.
//!
//! Items are identified by a stable [`QuoteId`] assigned at creation, never
//! by position. Each slot carries a revision counter; an estimate response
//! is applied only if no newer request has been started for that slot since,
//! so overlapping estimates resolve last-write-wins without ever writing a
//! stale result.

use printforge_core::{Color, Dimensions, Material, Money, QuoteId};
use serde_json::{Value, json};

use crate::api::{ApiError, Estimate};
use crate::file::DesignFile;

/// Fixed user-facing message when an estimate fails without a
/// server-supplied payload.
pub const ESTIMATE_FAILED_MESSAGE: &str =
    "We couldn't get an estimate for this model. Please try again. \
     If the issue persists, please reach out to us.";

/// Why an estimate failed, carried on the line item itself.
///
/// A failed item stays in the list (and in shipping-rate requests) but is
/// excluded from the subtotal and from checkout eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateFailure {
    payload: Value,
}

impl EstimateFailure {
    pub(crate) fn from_api(err: &ApiError) -> Self {
        let payload = match err.rejection_payload() {
            Some(payload) => payload.clone(),
            None => json!({ "message": ESTIMATE_FAILED_MESSAGE }),
        };
        Self { payload }
    }

    /// User-facing message, from the server payload where present.
    #[must_use]
    pub fn message(&self) -> &str {
        self.payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(ESTIMATE_FAILED_MESSAGE)
    }

    /// The payload as received (verbatim for 400 responses).
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Requested changes to a line item. `None` fields keep the current value.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
    pub quantity: Option<u32>,
    pub material: Option<Material>,
    pub color: Option<Color>,
    pub file: Option<DesignFile>,
}

/// One uploaded design file with its print parameters and estimate state.
#[derive(Debug, Clone)]
pub struct LineItem {
    id: QuoteId,
    file: DesignFile,
    quantity: u32,
    material: Material,
    color: Color,
    price_each: Option<Money>,
    price_total: Option<Money>,
    dimensions: Option<Dimensions>,
    error: Option<EstimateFailure>,
    /// Bumped on every estimate request for this slot; responses carrying
    /// an older value are discarded.
    revision: u64,
    /// True while an estimate for this slot is in flight.
    busy: bool,
}

impl LineItem {
    /// Stable identity, assigned at creation.
    #[must_use]
    pub const fn id(&self) -> QuoteId {
        self.id
    }

    #[must_use]
    pub const fn file(&self) -> &DesignFile {
        &self.file
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn material(&self) -> Material {
        self.material
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Price per unit; `None` until a successful estimate.
    #[must_use]
    pub const fn price_each(&self) -> Option<Money> {
        self.price_each
    }

    /// Price for the full quantity; `None` until a successful estimate.
    #[must_use]
    pub const fn price_total(&self) -> Option<Money> {
        self.price_total
    }

    /// Measured bounding box; `None` until a successful estimate.
    #[must_use]
    pub const fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Why the last estimate failed, if it did.
    #[must_use]
    pub const fn error(&self) -> Option<&EstimateFailure> {
        self.error.as_ref()
    }

    /// True while an estimate for this item is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// A failed item is carried along but cannot be checked out.
    #[must_use]
    pub const fn is_checkout_eligible(&self) -> bool {
        self.error.is_none()
    }
}

/// Token tying an in-flight estimate request to the slot state it was
/// issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EstimateTicket {
    pub(crate) id: QuoteId,
    pub(crate) revision: u64,
}

/// Snapshot of everything an estimate request needs, taken before the
/// await point so the list can be mutated while the call is in flight.
#[derive(Debug, Clone)]
pub(crate) struct PendingEstimate {
    pub(crate) ticket: EstimateTicket,
    pub(crate) quantity: u32,
    pub(crate) material: Material,
    pub(crate) file: DesignFile,
}

/// Ordered line-item store with stable IDs.
#[derive(Debug, Default)]
pub(crate) struct LineItems {
    items: Vec<LineItem>,
    next_id: u64,
}

impl LineItems {
    /// Append a fresh, unpriced item (quantity 1, default material/color)
    /// and return it alongside the estimate request to run for it.
    pub(crate) fn append(&mut self, file: DesignFile) -> (QuoteId, PendingEstimate) {
        let id = QuoteId::new(self.next_id);
        self.next_id += 1;

        let item = LineItem {
            id,
            file,
            quantity: 1,
            material: Material::default(),
            color: Color::default(),
            price_each: None,
            price_total: None,
            dimensions: None,
            error: None,
            revision: 0,
            busy: true,
        };

        let pending = PendingEstimate {
            ticket: EstimateTicket { id, revision: 0 },
            quantity: item.quantity,
            material: item.material,
            file: item.file.clone(),
        };

        self.items.push(item);
        (id, pending)
    }

    /// Apply a patch to an item and return the re-estimate request for it.
    /// Bumps the slot revision, invalidating any estimate still in flight.
    pub(crate) fn begin_update(
        &mut self,
        id: QuoteId,
        patch: LineItemPatch,
    ) -> Option<PendingEstimate> {
        let item = self.get_mut(id)?;

        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(material) = patch.material {
            item.material = material;
        }
        if let Some(color) = patch.color {
            item.color = color;
        }
        if let Some(file) = patch.file {
            item.file = file;
        }

        item.revision += 1;
        item.busy = true;

        Some(PendingEstimate {
            ticket: EstimateTicket {
                id,
                revision: item.revision,
            },
            quantity: item.quantity,
            material: item.material,
            file: item.file.clone(),
        })
    }

    /// Write an estimate outcome into its slot. No-op if the item was
    /// removed or a newer request superseded this one.
    pub(crate) fn apply_estimate(
        &mut self,
        ticket: EstimateTicket,
        outcome: &Result<Estimate, ApiError>,
    ) {
        let Some(item) = self.items.iter_mut().find(|i| i.id == ticket.id) else {
            tracing::debug!(id = %ticket.id, "estimate arrived for removed line item; dropped");
            return;
        };
        if item.revision != ticket.revision {
            tracing::debug!(id = %ticket.id, "stale estimate superseded; dropped");
            return;
        }

        item.busy = false;
        match outcome {
            Ok(estimate) => {
                item.price_each = Some(estimate.price_each);
                item.price_total = Some(estimate.price_total);
                item.dimensions = Some(Dimensions {
                    width: estimate.width,
                    length: estimate.length,
                    height: estimate.height,
                });
                item.error = None;
            }
            Err(err) => {
                tracing::warn!(id = %ticket.id, error = %err, "estimate failed");
                item.price_each = None;
                item.price_total = None;
                item.dimensions = None;
                item.error = Some(EstimateFailure::from_api(err));
            }
        }
    }

    /// Remove an item. Later items keep their IDs.
    pub(crate) fn remove(&mut self, id: QuoteId) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn get(&self, id: QuoteId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn get_mut(&mut self, id: QuoteId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub(crate) fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
