//! Signature placement.
//!
//! Insert and clear both target the [`AnchorRect`] derived from the active
//! cell of the active worksheet. A worksheet holds at most one shape per
//! anchor: insert removes the first shape already pinned there before
//! appending the new picture, clear only removes it.
//!
//! Neither operation fails. Missing preconditions (no mounted viewer, no
//! document, nothing drawn) and "nothing to clear" are reported through
//! [`PlacementOutcome`] and otherwise ignored.

mod data_url;
mod pad;

pub use pad::{PadOptions, SignaturePad};

use serde::Serialize;

use crate::anchor::AnchorRect;
use crate::types::{ImagePayload, Shape, ShapeId, Worksheet};
use crate::viewer::ViewerBinding;

/// Anything that can hand over the drawn signature as an image `data:` URL.
pub trait SignatureSource {
    /// `None` when there is nothing to capture.
    fn to_data_url(&self) -> Option<String>;
}

impl SignatureSource for SignaturePad {
    fn to_data_url(&self) -> Option<String> {
        SignaturePad::to_data_url(self)
    }
}

/// A capture taken elsewhere (e.g. `canvas.toDataURL()` on the JS side).
impl SignatureSource for str {
    fn to_data_url(&self) -> Option<String> {
        let url = self.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}

impl SignatureSource for String {
    fn to_data_url(&self) -> Option<String> {
        self.as_str().to_data_url()
    }
}

#[cfg(target_arch = "wasm32")]
impl SignatureSource for web_sys::HtmlCanvasElement {
    fn to_data_url(&self) -> Option<String> {
        web_sys::HtmlCanvasElement::to_data_url(self).ok()
    }
}

/// Why a placement did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// The viewer is not mounted
    Unmounted,
    /// No document has been loaded
    NoDocument,
    /// The document has no active worksheet
    NoWorksheet,
    /// Nothing was drawn, or the capture could not be decoded
    EmptyCapture,
    /// The anchor would extend past the last row or column
    OutsideGrid,
}

/// What a placement did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum PlacementOutcome {
    Inserted {
        id: ShapeId,
        anchor: AnchorRect,
    },
    Replaced {
        removed: ShapeId,
        id: ShapeId,
        anchor: AnchorRect,
    },
    Cleared {
        removed: ShapeId,
        anchor: AnchorRect,
    },
    NothingToClear {
        anchor: AnchorRect,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl PlacementOutcome {
    /// Whether the shape collection changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Self::Inserted { .. } | Self::Replaced { .. } | Self::Cleared { .. }
        )
    }
}

/// Capture `source` and pin it to the anchor of the active cell,
/// replacing a shape already at that anchor.
pub fn insert_signature(
    binding: &mut ViewerBinding,
    source: &(impl SignatureSource + ?Sized),
) -> PlacementOutcome {
    if !binding.is_mounted() {
        return skipped(SkipReason::Unmounted);
    }

    let payload = match source.to_data_url().map(|url| ImagePayload::from_data_url(&url)) {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            log::debug!("signature capture rejected: {e}");
            return skipped(SkipReason::EmptyCapture);
        }
        None => return skipped(SkipReason::EmptyCapture),
    };

    let (worksheet, anchor) = match target(binding) {
        Ok(target) => target,
        Err(reason) => return skipped(reason),
    };

    let removed = remove_at_anchor(worksheet, &anchor);

    let shape = Shape::picture(payload, anchor.top_left, anchor.bottom_right)
        .with_name(format!("Signature {}", anchor.top_left.to_a1()));
    let id = worksheet.shapes.add(shape);

    log::info!(
        "signature placed on {:?} at {}:{}",
        worksheet.name,
        anchor.top_left_r1c1(),
        anchor.bottom_right_r1c1()
    );

    match removed {
        Some(removed) => PlacementOutcome::Replaced {
            removed,
            id,
            anchor,
        },
        None => PlacementOutcome::Inserted { id, anchor },
    }
}

/// Remove the shape pinned to the anchor of the active cell, if any.
pub fn clear_signature(binding: &mut ViewerBinding) -> PlacementOutcome {
    if !binding.is_mounted() {
        return skipped(SkipReason::Unmounted);
    }

    let (worksheet, anchor) = match target(binding) {
        Ok(target) => target,
        Err(reason) => return skipped(reason),
    };

    match remove_at_anchor(worksheet, &anchor) {
        Some(removed) => {
            log::info!(
                "signature cleared on {:?} at {}",
                worksheet.name,
                anchor.top_left_r1c1()
            );
            PlacementOutcome::Cleared { removed, anchor }
        }
        None => PlacementOutcome::NothingToClear { anchor },
    }
}

fn skipped(reason: SkipReason) -> PlacementOutcome {
    log::debug!("signature placement skipped: {reason:?}");
    PlacementOutcome::Skipped { reason }
}

/// Active worksheet and the anchor of its active cell.
fn target(binding: &mut ViewerBinding) -> Result<(&mut Worksheet, AnchorRect), SkipReason> {
    let Some(workbook) = binding.document_mut() else {
        return Err(SkipReason::NoDocument);
    };
    let Some(worksheet) = workbook.active_worksheet_mut() else {
        return Err(SkipReason::NoWorksheet);
    };
    let anchor = AnchorRect::resolve(worksheet, worksheet.active_cell)
        .map_err(|_| SkipReason::OutsideGrid)?;
    Ok((worksheet, anchor))
}

/// Remove the first shape pinned exactly to `anchor` and stop.
fn remove_at_anchor(worksheet: &mut Worksheet, anchor: &AnchorRect) -> Option<ShapeId> {
    let occupants = worksheet.shapes.count_at_anchor(anchor);
    if occupants > 1 {
        log::warn!(
            "{occupants} shapes share anchor {}:{} on {:?}; removing only the first",
            anchor.top_left_r1c1(),
            anchor.bottom_right_r1c1(),
            worksheet.name
        );
    }

    let index = worksheet.shapes.find_at_anchor(anchor)?;
    worksheet.shapes.remove_at(index).map(|shape| shape.id)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{CellAddress, Workbook};

    const PNG_URL: &str = "data:image/png;base64,iVBORw==";

    fn bound(active: (u32, u32)) -> ViewerBinding {
        let mut binding = ViewerBinding::new();
        binding.attach(Workbook::new(vec![Worksheet::new("Sheet1")], 0));
        binding.set_active_cell(active.0, active.1);
        binding
    }

    fn shape_count(binding: &ViewerBinding) -> usize {
        binding.active_worksheet().unwrap().shapes.count()
    }

    #[test]
    fn test_insert_then_replace() {
        let mut binding = bound((4, 2));
        let first = insert_signature(&mut binding, PNG_URL);
        let PlacementOutcome::Inserted { id, anchor } = first else {
            panic!("expected insert, got {first:?}");
        };
        assert_eq!(anchor.top_left, CellAddress::new(4, 2));

        let second = insert_signature(&mut binding, PNG_URL);
        assert!(
            matches!(second, PlacementOutcome::Replaced { removed, .. } if removed == id),
            "got {second:?}"
        );
        assert_eq!(shape_count(&binding), 1);
    }

    #[test]
    fn test_clear() {
        let mut binding = bound((0, 0));
        assert!(matches!(
            clear_signature(&mut binding),
            PlacementOutcome::NothingToClear { .. }
        ));
        insert_signature(&mut binding, PNG_URL);
        assert!(matches!(
            clear_signature(&mut binding),
            PlacementOutcome::Cleared { .. }
        ));
        assert_eq!(shape_count(&binding), 0);
    }

    #[test]
    fn test_skips() {
        let mut binding = ViewerBinding::new();
        assert_eq!(
            insert_signature(&mut binding, PNG_URL),
            PlacementOutcome::Skipped {
                reason: SkipReason::NoDocument
            }
        );

        let mut binding = bound((0, 0));
        assert_eq!(
            insert_signature(&mut binding, ""),
            PlacementOutcome::Skipped {
                reason: SkipReason::EmptyCapture
            }
        );
        assert_eq!(
            insert_signature(&mut binding, &SignaturePad::default()),
            PlacementOutcome::Skipped {
                reason: SkipReason::EmptyCapture
            }
        );

        binding.unmount();
        assert_eq!(
            clear_signature(&mut binding),
            PlacementOutcome::Skipped {
                reason: SkipReason::Unmounted
            }
        );
    }

    #[test]
    fn test_last_row_is_outside_grid() {
        let mut binding = bound((u32::MAX, 0));
        assert_eq!(
            insert_signature(&mut binding, PNG_URL),
            PlacementOutcome::Skipped {
                reason: SkipReason::OutsideGrid
            }
        );
        assert_eq!(shape_count(&binding), 0);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let mut binding = bound((4, 2));
        let json = serde_json::to_value(insert_signature(&mut binding, PNG_URL)).unwrap();
        assert_eq!(json["outcome"], "inserted");
        assert_eq!(json["anchor"]["topLeft"]["row"], 4);
        assert_eq!(json["anchor"]["bottomRight"]["col"], 3);
    }
}
