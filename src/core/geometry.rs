use serde::{Deserialize, Serialize};

/// Axis-aligned box in integer pixel coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Bbox {
    pub col_min: i32,
    pub row_min: i32,
    pub col_max: i32,
    pub row_max: i32,
}

/// How box `a` sits relative to box `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a` lies inside `b`.
    Inside,
    Disjoint,
    /// `b` lies inside `a`.
    Contains,
    /// Identical or partially overlapping.
    Intersecting,
}

/// Intersection area of two boxes and the ratios derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub inter: i64,
    pub iou: f64,
    /// Intersection over the area of the first box.
    pub ioa: f64,
    /// Intersection over the area of the second box.
    pub iob: f64,
}

impl Overlap {
    fn from_intersection(inter: i64, area_a: i64, area_b: i64) -> Self {
        Self {
            inter,
            iou: ratio(inter as f64, (area_a + area_b - inter) as f64),
            ioa: ratio(inter as f64, area_a as f64),
            iob: ratio(inter as f64, area_b as f64),
        }
    }

    pub fn relation(&self) -> Relation {
        if self.ioa == 0.0 {
            Relation::Disjoint
        } else if self.ioa >= 1.0 {
            Relation::Inside
        } else if self.iob >= 1.0 {
            Relation::Contains
        } else {
            Relation::Intersecting
        }
    }
}

/// Division where an empty denominator contributes nothing.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        0.0
    } else {
        num / den
    }
}

impl Bbox {
    pub fn new(col_min: i32, row_min: i32, col_max: i32, row_max: i32) -> Self {
        Self {
            col_min: col_min.min(col_max),
            row_min: row_min.min(row_max),
            col_max: col_min.max(col_max),
            row_max: row_min.max(row_max),
        }
    }

    pub fn width(&self) -> i32 {
        self.col_max - self.col_min
    }

    pub fn height(&self) -> i32 {
        self.row_max - self.row_min
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            col_min: self.col_min.min(other.col_min),
            row_min: self.row_min.min(other.row_min),
            col_max: self.col_max.max(other.col_max),
            row_max: self.row_max.max(other.row_max),
        }
    }

    pub fn translate(&self, cols: i32, rows: i32) -> Self {
        Self {
            col_min: self.col_min + cols,
            row_min: self.row_min + rows,
            col_max: self.col_max + cols,
            row_max: self.row_max + rows,
        }
    }

    /// Scales every corner, truncating toward zero.
    pub fn scale(&self, factor: f64) -> Self {
        let scale = |v: i32| (v as f64 * factor) as i32;
        Self::new(
            scale(self.col_min),
            scale(self.row_min),
            scale(self.col_max),
            scale(self.row_max),
        )
    }

    /// Clamps the box into `[0, width] x [0, height]`.
    pub fn clip(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        Self::new(
            self.col_min.clamp(0, w),
            self.row_min.clamp(0, h),
            self.col_max.clamp(0, w),
            self.row_max.clamp(0, h),
        )
    }

    /// Overlap with the bias subtracted from the leading edge of the
    /// intersection, so boxes that are `bias` pixels apart still touch.
    pub fn overlap(&self, other: &Self, bias: (i32, i32)) -> Overlap {
        let col_min = self.col_min.max(other.col_min) - bias.0;
        let row_min = self.row_min.max(other.row_min) - bias.1;
        let col_max = self.col_max.min(other.col_max);
        let row_max = self.row_max.min(other.row_max);
        let inter = (col_max - col_min).max(0) as i64 * (row_max - row_min).max(0) as i64;
        Overlap::from_intersection(inter, self.area(), other.area())
    }

    /// Non-maximum-suppression style relation used between detected
    /// components. Both boxes are grown by `bias` before intersecting and
    /// small overlaps count as disjoint.
    pub fn relation(&self, other: &Self, bias: (i32, i32)) -> Relation {
        let col_min = self.col_min.max(other.col_min) - bias.0;
        let row_min = self.row_min.max(other.row_min) - bias.1;
        let col_max = self.col_max.min(other.col_max) + bias.0;
        let row_max = self.row_max.min(other.row_max) + bias.1;
        let inter = (col_max - col_min).max(0) as i64 * (row_max - row_min).max(0) as i64;
        let overlap = Overlap::from_intersection(inter, self.area(), other.area());

        if overlap.iou == 0.0 && overlap.ioa == 0.0 && overlap.iob == 0.0 {
            return Relation::Disjoint;
        }
        if overlap.ioa >= 1.0 {
            return Relation::Inside;
        }
        if overlap.iob >= 1.0 {
            return Relation::Contains;
        }
        if overlap.iou >= 0.02 || overlap.iob > 0.2 || overlap.ioa > 0.2 {
            return Relation::Intersecting;
        }
        Relation::Disjoint
    }

    /// True when `self` is covered by `other` and does not stick out of
    /// `other` by more than `bias` on any side.
    pub fn is_within(&self, other: &Self, bias: (i32, i32)) -> bool {
        self.overlap(other, bias).relation() == Relation::Inside
            && self.col_min >= other.col_min - bias.0
            && self.row_min >= other.row_min - bias.1
            && self.col_max <= other.col_max + bias.0
            && self.row_max <= other.row_max + bias.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_reversed_corners() {
        let bbox = Bbox::new(30, 40, 10, 5);
        assert_eq!(bbox, Bbox::new(10, 5, 30, 40));
        assert_eq!(bbox.width(), 20);
        assert_eq!(bbox.height(), 35);
        assert_eq!(bbox.area(), 700);
    }

    #[test]
    fn computes_overlap_ratios() {
        let a = Bbox::new(0, 0, 10, 10);
        let b = Bbox::new(5, 5, 15, 15);
        let overlap = a.overlap(&b, (0, 0));
        assert_eq!(overlap.inter, 25);
        assert_eq!(overlap.ioa, 0.25);
        assert_eq!(overlap.iou, 25.0 / 175.0);
        assert_eq!(overlap.relation(), Relation::Intersecting);
    }

    #[test]
    fn bias_bridges_small_gaps() {
        let upper = Bbox::new(0, 0, 50, 20);
        let lower = Bbox::new(0, 24, 50, 44);
        assert_eq!(upper.overlap(&lower, (0, 0)).inter, 0);
        assert!(upper.overlap(&lower, (0, 20)).inter > 0);
    }

    #[test]
    fn zero_area_boxes_have_no_relation() {
        let point = Bbox::new(5, 5, 5, 5);
        let frame = Bbox::new(0, 0, 10, 10);
        let overlap = point.overlap(&frame, (0, 0));
        assert_eq!(overlap.ioa, 0.0);
        assert_eq!(overlap.relation(), Relation::Disjoint);
        assert_eq!(point.relation(&frame, (0, 0)), Relation::Disjoint);
        assert!(!point.is_within(&frame, (2, 2)));
    }

    #[test]
    fn nms_relation_classifies_nesting() {
        let outer = Bbox::new(0, 0, 100, 100);
        let inner = Bbox::new(10, 10, 40, 40);
        let far = Bbox::new(200, 200, 220, 220);
        let sliver = Bbox::new(99, 0, 150, 100);
        assert_eq!(inner.relation(&outer, (0, 0)), Relation::Inside);
        assert_eq!(outer.relation(&inner, (0, 0)), Relation::Contains);
        assert_eq!(outer.relation(&far, (0, 0)), Relation::Disjoint);
        assert_eq!(outer.relation(&Bbox::new(50, 50, 150, 150), (0, 0)), Relation::Intersecting);
        // 1 px shared column is below every overlap threshold
        assert_eq!(outer.relation(&sliver, (0, 0)), Relation::Disjoint);
    }

    #[test]
    fn within_respects_bias() {
        let parent = Bbox::new(10, 10, 100, 100);
        assert!(Bbox::new(20, 20, 50, 50).is_within(&parent, (2, 2)));
        assert!(Bbox::new(9, 10, 50, 50).is_within(&parent, (2, 2)));
        assert!(!Bbox::new(0, 10, 50, 50).is_within(&parent, (2, 2)));
        assert!(!parent.is_within(&Bbox::new(20, 20, 50, 50), (2, 2)));
    }

    #[test]
    fn scale_truncates_and_clip_clamps() {
        let bbox = Bbox::new(3, 5, 11, 17).scale(0.5);
        assert_eq!(bbox, Bbox::new(1, 2, 5, 8));
        let clipped = Bbox::new(-4, 10, 120, 90).clip(100, 50);
        assert_eq!(clipped, Bbox::new(0, 10, 100, 50));
        assert_eq!(Bbox::new(1, 1, 4, 4).translate(10, 20), Bbox::new(11, 21, 14, 24));
    }
}
