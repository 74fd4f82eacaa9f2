//! Baseline-aligned arrays and fixed-size rectangles
//!
//! [`arrange`] is the one layout algorithm shared by every multi-child node:
//! children are laid out one after another along the primary axis and
//! shifted on the cross axis so their primary-axis baselines line up.

use super::fields::out_of_range;
use super::{Field, FieldValue, Fields, Node, Slot, Visual, slots};
use crate::errors::{FieldError, StructureError};
use crate::render::{Context, defaults};
use crate::types::{Extent, Offset, PaintPoint, half_round};

/// Direction children are laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Side by side, aligned on their horizontal baselines.
    Horizontal,
    /// Stacked, aligned on their vertical baselines.
    Vertical,
}

impl Axis {
    /// (primary size, cross size, baseline on the primary axis)
    fn components(self, extent: &Extent) -> (i32, i32, i32) {
        match self {
            Axis::Horizontal => (extent.width, extent.height, extent.horz_baseline),
            Axis::Vertical => (extent.height, extent.width, extent.vert_baseline),
        }
    }

    fn offset(self, along: i32, across: i32) -> Offset {
        match self {
            Axis::Horizontal => Offset::new(along, across),
            Axis::Vertical => Offset::new(across, along),
        }
    }
}

/// Result of [`arrange`]: the combined box and one offset per child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub extent: Extent,
    pub offsets: Vec<Offset>,
}

/// Lay out boxes along `axis` with `gap` pixels between neighbours.
///
/// The combined baseline on the primary axis is the largest child baseline;
/// each child is shifted across by the difference to its own. The cross
/// size is that baseline plus the largest extent any child has past it.
/// The baseline on the cross axis is the middle of the primary size.
pub fn arrange(axis: Axis, children: &[Extent], gap: i32) -> Arrangement {
    let mut align: i32 = 0;
    let mut trailing: i32 = 0;
    let mut along: i32 = 0;
    let mut positions = Vec::with_capacity(children.len());

    for (i, child) in children.iter().enumerate() {
        let (size, cross, baseline) = axis.components(child);
        align = align.max(baseline);
        trailing = trailing.max(cross.saturating_sub(baseline));
        if i > 0 {
            along = along.saturating_add(gap);
        }
        positions.push(along);
        along = along.saturating_add(size);
    }

    let offsets = children
        .iter()
        .zip(positions)
        .map(|(child, along)| {
            let (_, _, baseline) = axis.components(child);
            axis.offset(along, align - baseline)
        })
        .collect();

    let cross = align.saturating_add(trailing);
    let extent = match axis {
        Axis::Horizontal => Extent::new(along, cross, align, half_round(along)),
        Axis::Vertical => Extent::new(cross, along, half_round(along), align),
    };
    Arrangement { extent, offsets }
}

/// Measure every slot, then arrange them along `axis`.
pub(crate) fn measure_sequence(slots: &mut [Slot], ctx: &mut Context<'_>, axis: Axis, gap: i32) -> Extent {
    for slot in slots.iter_mut() {
        slot.measure(ctx);
    }
    let extents: Vec<Extent> = slots.iter().map(Slot::extent).collect();
    let arrangement = arrange(axis, &extents, gap);
    for (slot, offset) in slots.iter_mut().zip(arrangement.offsets) {
        slot.offset = offset;
    }
    arrangement.extent
}

fn at_least_two(tag: &str, children: &[Node]) -> Result<(), StructureError> {
    if children.len() < 2 {
        return Err(StructureError::arity(tag, 2, None, children.len()));
    }
    Ok(())
}

/// Children side by side, sharing one horizontal baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalArray {
    children: Vec<Slot>,
    extent: Extent,
}

impl HorizontalArray {
    pub const TAG: &'static str = "Visualization.HorizontalArray";

    pub fn new(children: Vec<Node>) -> Result<Self, StructureError> {
        at_least_two(Self::TAG, &children)?;
        Ok(Self {
            children: slots(children),
            extent: Extent::ZERO,
        })
    }
}

impl Visual for HorizontalArray {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = measure_sequence(&mut self.children, ctx, Axis::Horizontal, defaults::ARRAY_GAP);
        crate::log::debug!(
            children = self.children.len(),
            width = self.extent.width,
            height = self.extent.height,
            "measured horizontal array"
        );
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        for child in &self.children {
            child.paint(ctx, origin);
        }
    }

    fn children(&self) -> &[Slot] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut self.children
    }
}

impl Fields for HorizontalArray {}

/// Children stacked top to bottom, sharing one vertical baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalArray {
    children: Vec<Slot>,
    extent: Extent,
}

impl VerticalArray {
    pub const TAG: &'static str = "Visualization.VerticalArray";

    pub fn new(children: Vec<Node>) -> Result<Self, StructureError> {
        at_least_two(Self::TAG, &children)?;
        Ok(Self {
            children: slots(children),
            extent: Extent::ZERO,
        })
    }
}

impl Visual for VerticalArray {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = measure_sequence(&mut self.children, ctx, Axis::Vertical, defaults::ARRAY_GAP);
        crate::log::debug!(
            children = self.children.len(),
            width = self.extent.width,
            height = self.extent.height,
            "measured vertical array"
        );
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        for child in &self.children {
            child.paint(ctx, origin);
        }
    }

    fn children(&self) -> &[Slot] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut self.children
    }
}

impl Fields for VerticalArray {}

/// Invisible leaf with externally declared geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rectangle {
    extent: Extent,
}

impl Rectangle {
    pub const TAG: &'static str = "Visualization.Rectangle";

    pub fn new(width: i32, height: i32, horz_baseline: i32, vert_baseline: i32) -> Self {
        Self {
            extent: Extent::new(width, height, horz_baseline, vert_baseline),
        }
    }
}

impl Visual for Rectangle {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, _ctx: &mut Context<'_>) {}

    fn paint(&self, _ctx: &mut Context<'_>, _origin: PaintPoint) {}
}

impl Fields for Rectangle {
    fn fields(&self) -> &'static [Field] {
        &[
            Field::Width,
            Field::Height,
            Field::HorizontalBaseline,
            Field::VerticalBaseline,
        ]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        let value = match field {
            Field::Width => self.extent.width,
            Field::Height => self.extent.height,
            Field::HorizontalBaseline => self.extent.horz_baseline,
            Field::VerticalBaseline => self.extent.vert_baseline,
            _ => {
                return Err(FieldError::UnknownField {
                    tag: Self::TAG,
                    field: field.to_string(),
                });
            }
        };
        Ok(FieldValue::Int(value.into()))
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        let target = match field {
            Field::Width => &mut self.extent.width,
            Field::Height => &mut self.extent.height,
            Field::HorizontalBaseline => &mut self.extent.horz_baseline,
            Field::VerticalBaseline => &mut self.extent.vert_baseline,
            _ => {
                return Err(FieldError::UnknownField {
                    tag: Self::TAG,
                    field: field.to_string(),
                });
            }
        };
        let raw = value.as_int(field)?;
        *target = i32::try_from(raw)
            .ok()
            .filter(|v| (0..=defaults::MAX_PIXEL_SIZE).contains(v))
            .ok_or_else(|| out_of_range(field, format!("{raw} is not a pixel size")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_alignment_follows_largest_baseline() {
        let children = [
            Extent::new(10, 10, 3, 5),
            Extent::new(10, 12, 7, 5),
            Extent::new(10, 4, 2, 5),
        ];
        let arrangement = arrange(Axis::Horizontal, &children, 5);
        assert_eq!(arrangement.extent.horz_baseline, 7);
        let ys: Vec<i32> = arrangement.offsets.iter().map(|o| o.y).collect();
        assert_eq!(ys, [4, 0, 5]);
        let xs: Vec<i32> = arrangement.offsets.iter().map(|o| o.x).collect();
        assert_eq!(xs, [0, 15, 30]);
        // trailing parts: 7, 5, 2
        assert_eq!(arrangement.extent.height, 14);
        assert_eq!(arrangement.extent.width, 40);
        assert_eq!(arrangement.extent.vert_baseline, 20);
    }

    #[test]
    fn horizontal_width_includes_gaps() {
        let children = [Extent::new(10, 4, 2, 5), Extent::new(20, 4, 2, 10)];
        let arrangement = arrange(Axis::Horizontal, &children, 5);
        assert_eq!(arrangement.extent.width, 35);
        assert_eq!(arrangement.extent.vert_baseline, 18);
    }

    #[test]
    fn vertical_mirrors_horizontal() {
        let children = [Extent::new(8, 10, 5, 2), Extent::new(12, 6, 3, 9)];
        let arrangement = arrange(Axis::Vertical, &children, 5);
        assert_eq!(arrangement.offsets, [Offset::new(7, 0), Offset::new(0, 15)]);
        assert_eq!(arrangement.extent, Extent::new(15, 21, 11, 9));
    }

    #[test]
    fn arrays_reject_fewer_than_two_children() {
        assert!(VerticalArray::new(vec![]).is_err());
        assert!(HorizontalArray::new(vec![Rectangle::default().into()]).is_err());
    }

    #[test]
    fn rectangle_rejects_negative_sizes() {
        let mut rect = Rectangle::default();
        assert!(rect.set_field(Field::Height, FieldValue::Int(-1)).is_err());
        assert!(rect.set_field(Field::Height, FieldValue::Int(9)).is_ok());
        assert_eq!(rect.extent().height, 9);
        assert!(rect.set_field(Field::Size, FieldValue::Int(1)).is_err());
    }

    #[test]
    fn rectangle_rejects_oversized_values() {
        let mut rect = Rectangle::default();
        let huge = FieldValue::Int(i64::from(i32::MAX));
        assert!(matches!(
            rect.set_field(Field::Width, huge),
            Err(FieldError::OutOfRange { field: "Width", .. })
        ));
        let limit = FieldValue::Int(defaults::MAX_PIXEL_SIZE.into());
        assert!(rect.set_field(Field::Width, limit).is_ok());
    }

    #[test]
    fn arrange_saturates_instead_of_overflowing() {
        let children = [
            Extent::new(i32::MAX, 1, 0, 0),
            Extent::new(6, 12, 9, 3),
        ];
        let arrangement = arrange(Axis::Horizontal, &children, 5);
        assert_eq!(arrangement.extent.width, i32::MAX);
        assert_eq!(arrangement.extent.height, 12);
        assert_eq!(arrangement.offsets[1].x, i32::MAX);
    }
}
