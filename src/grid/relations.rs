use super::grid::Color;
use super::object::EnhancedObject;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
    LeftOf,
    RightOf,
    Overlapping,
}

/// Pairwise relation between two objects: direction (by centroid), Euclidean centroid
/// distance, bbox overlap, and shape/color/size equivalence.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub direction: Direction,
    pub distance: f64,
    pub overlaps: bool,
    pub same_color: bool,
    pub same_size: bool,
    pub same_shape: bool,
}

pub fn relation(a: &EnhancedObject, b: &EnhancedObject) -> Relation {
    let (ar, ac) = a.centroid;
    let (br, bc) = b.centroid;
    let distance = ((ar - br).powi(2) + (ac - bc).powi(2)).sqrt();
    let overlaps = a.base.bbox.overlaps(&b.base.bbox);
    let direction = if overlaps {
        Direction::Overlapping
    } else if (ar - br).abs() >= (ac - bc).abs() {
        if ar < br {
            Direction::Above
        } else {
            Direction::Below
        }
    } else if ac < bc {
        Direction::LeftOf
    } else {
        Direction::RightOf
    };
    Relation {
        direction,
        distance,
        overlaps,
        same_color: a.base.primary_color() == b.base.primary_color(),
        same_size: a.base.pixel_count() == b.base.pixel_count(),
        same_shape: normalized_shape(a) == normalized_shape(b),
    }
}

fn normalized_shape(obj: &EnhancedObject) -> HashSet<(usize, usize)> {
    obj.base.pixels.iter().map(|&(r, c, _)| (r, c)).collect()
}

/// Summary statistics over a collection of objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStats {
    pub count: usize,
    pub total_area: usize,
    pub avg_area: f64,
    pub min_area: usize,
    pub max_area: usize,
    pub avg_fill_ratio: f64,
    pub colors_used: HashSet<Color>,
    pub all_monochrome: bool,
    pub all_rectangular: bool,
    pub bbox_sizes: Vec<(usize, usize)>,
}

pub fn object_stats(objects: &[EnhancedObject]) -> ObjectStats {
    if objects.is_empty() {
        return ObjectStats {
            count: 0,
            total_area: 0,
            avg_area: 0.0,
            min_area: 0,
            max_area: 0,
            avg_fill_ratio: 0.0,
            colors_used: HashSet::new(),
            all_monochrome: true,
            all_rectangular: true,
            bbox_sizes: Vec::new(),
        };
    }
    let areas: Vec<usize> = objects.iter().map(|o| o.base.pixel_count()).collect();
    let total_area: usize = areas.iter().sum();
    ObjectStats {
        count: objects.len(),
        total_area,
        avg_area: total_area as f64 / objects.len() as f64,
        min_area: *areas.iter().min().unwrap(),
        max_area: *areas.iter().max().unwrap(),
        avg_fill_ratio: objects.iter().map(|o| o.fill_ratio).sum::<f64>() / objects.len() as f64,
        colors_used: objects.iter().map(|o| o.base.primary_color()).collect(),
        all_monochrome: objects.iter().all(|o| o.is_monochrome),
        all_rectangular: objects.iter().all(|o| o.is_rectangular),
        bbox_sizes: objects
            .iter()
            .map(|o| (o.base.bbox.height(), o.base.bbox.width()))
            .collect(),
    }
}

pub fn largest(objects: &[EnhancedObject]) -> Option<&EnhancedObject> {
    objects.iter().max_by_key(|o| o.base.pixel_count())
}

pub fn filter_by_color(objects: &[EnhancedObject], color: Color) -> Vec<&EnhancedObject> {
    objects
        .iter()
        .filter(|o| o.base.primary_color() == color)
        .collect()
}

pub fn filter_by_size_range(
    objects: &[EnhancedObject],
    min: usize,
    max: usize,
) -> Vec<&EnhancedObject> {
    objects
        .iter()
        .filter(|o| {
            let n = o.base.pixel_count();
            n >= min && n <= max
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::bbox::BoundingBox;
    use crate::grid::object::GridObject;

    fn obj(id: usize, row: usize, col: usize, color: Color) -> EnhancedObject {
        EnhancedObject::from_object(GridObject {
            object_id: id,
            pixels: vec![(0, 0, color)],
            bbox: BoundingBox::new(row, col, row, col),
        })
    }

    #[test]
    fn direction_above_below() {
        let top = obj(0, 0, 0, 1);
        let bottom = obj(1, 5, 0, 1);
        assert_eq!(relation(&top, &bottom).direction, Direction::Above);
        assert_eq!(relation(&bottom, &top).direction, Direction::Below);
    }

    #[test]
    fn largest_picks_max_pixel_count() {
        let small = obj(0, 0, 0, 1);
        let big = EnhancedObject::from_object(GridObject {
            object_id: 1,
            pixels: vec![(0, 0, 2), (0, 1, 2), (1, 0, 2)],
            bbox: BoundingBox::new(0, 0, 1, 1),
        });
        let picked = largest(&[small, big.clone()]).unwrap();
        assert_eq!(picked.base.pixel_count(), big.base.pixel_count());
    }
}
