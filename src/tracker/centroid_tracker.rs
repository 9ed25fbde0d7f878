//! Centroid tracking algorithm.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::tracker::bounding_box::BoundingBox;
use crate::tracker::matching::{self, AssignmentResult, AssignmentStrategy, GreedyAssignment};
use crate::tracker::tracked_object::TrackedObject;

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// An object is dropped once its consecutive miss count exceeds this.
    pub max_missing_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_missing_frames: 5,
        }
    }
}

/// Tracks objects across frames by matching bounding box centroids.
///
/// `objects` and `disappeared` always share the same key set. Ids are issued
/// from `next_id`, which only ever grows, so an id is never reused even after
/// its object is dropped.
#[derive(Debug, Clone)]
pub struct CentroidTracker<S = GreedyAssignment> {
    pub(crate) objects: BTreeMap<u64, TrackedObject>,
    pub(crate) disappeared: BTreeMap<u64, u32>,
    pub(crate) next_id: u64,
    pub(crate) max_missing_frames: u32,
    strategy: S,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_strategy(config, GreedyAssignment)
    }
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl<S: AssignmentStrategy> CentroidTracker<S> {
    /// Create an empty tracker that pairs objects with `strategy`.
    pub fn with_strategy(config: TrackerConfig, strategy: S) -> Self {
        Self {
            objects: BTreeMap::new(),
            disappeared: BTreeMap::new(),
            next_id: 0,
            max_missing_frames: config.max_missing_frames,
            strategy,
        }
    }

    pub(crate) fn from_parts(
        objects: BTreeMap<u64, TrackedObject>,
        disappeared: BTreeMap<u64, u32>,
        next_id: u64,
        max_missing_frames: u32,
        strategy: S,
    ) -> Self {
        Self {
            objects,
            disappeared,
            next_id,
            max_missing_frames,
            strategy,
        }
    }

    /// Id the next registered object will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn max_missing_frames(&self) -> u32 {
        self.max_missing_frames
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&TrackedObject> {
        self.objects.get(&id)
    }

    /// Consecutive frames the object went unmatched, if it is still tracked.
    pub fn missing_count(&self, id: u64) -> Option<u32> {
        self.disappeared.get(&id).copied()
    }

    /// Currently tracked objects in id order.
    pub fn objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.values()
    }

    /// Start tracking a new object and return its id.
    pub fn register(&mut self, bbox: BoundingBox) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(id, TrackedObject::new(id, bbox));
        self.disappeared.insert(id, 0);
        debug!("Object registered: {} at {:?}", id, bbox);
        id
    }

    /// Stop tracking an object and return it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not currently tracked. Only ids taken from this
    /// tracker's own state may be deregistered.
    pub fn deregister(&mut self, id: u64) -> TrackedObject {
        let removed = self.objects.remove(&id);
        let missing = self.disappeared.remove(&id);
        match (removed, missing) {
            (Some(object), Some(_)) => {
                debug!("Object deregistered: {}", id);
                object
            }
            _ => panic!("deregister called with untracked object id {id}"),
        }
    }

    /// Advance the tracker by one frame and return the tracked objects.
    ///
    /// The returned objects are in id order; their position carries no
    /// relation to the position of the detections.
    pub fn update(&mut self, detections: &[BoundingBox]) -> Vec<TrackedObject> {
        if detections.is_empty() {
            let ids: Vec<u64> = self.disappeared.keys().copied().collect();
            for id in ids {
                self.mark_missing(id);
            }
            return self.current_objects();
        }

        if self.objects.is_empty() {
            for &bbox in detections {
                self.register(bbox);
            }
            return self.current_objects();
        }

        let object_ids: Vec<u64> = self.objects.keys().copied().collect();
        let object_boxes: Vec<BoundingBox> = self.objects.values().map(|o| o.bbox()).collect();
        let dists = matching::centroid_distance(&object_boxes, detections);

        let AssignmentResult {
            matches,
            unmatched_objects,
            unmatched_detections,
        } = self.strategy.assign(&dists);

        for (row, col) in matches {
            let id = object_ids[row];
            trace!(
                "Object {} matched detection {} at distance {:.2}",
                id,
                col,
                dists[[row, col]]
            );
            if let Some(object) = self.objects.get_mut(&id) {
                object.replace_box(detections[col]);
            }
            self.disappeared.insert(id, 0);
        }

        if object_ids.len() >= detections.len() {
            for row in unmatched_objects {
                self.mark_missing(object_ids[row]);
            }
        } else {
            for col in unmatched_detections {
                self.register(detections[col]);
            }
        }

        self.current_objects()
    }

    /// Bump the miss count of `id`, dropping the object once it exceeds the limit.
    fn mark_missing(&mut self, id: u64) {
        let Some(count) = self.disappeared.get_mut(&id) else {
            return;
        };
        *count += 1;
        if *count > self.max_missing_frames {
            self.deregister(id);
        }
    }

    fn current_objects(&self) -> Vec<TrackedObject> {
        self.objects.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_keys_in_lockstep<S: AssignmentStrategy>(tracker: &CentroidTracker<S>) {
        let object_ids: Vec<_> = tracker.objects.keys().collect();
        let missing_ids: Vec<_> = tracker.disappeared.keys().collect();
        assert_eq!(object_ids, missing_ids);
    }

    #[test]
    fn test_register_issues_next_id() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        for expected in 0..4 {
            let before = tracker.next_id();
            let id = tracker.register(BoundingBox::new(0, 0, 10, 10));
            assert_eq!(id, before);
            assert_eq!(id, expected);
            assert_eq!(tracker.next_id(), before + 1);
            assert_eq!(tracker.missing_count(id), Some(0));
        }
        assert_keys_in_lockstep(&tracker);
    }

    #[test]
    fn test_ids_are_not_reused_after_deregister() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        let first = tracker.register(BoundingBox::new(0, 0, 10, 10));
        tracker.deregister(first);
        let second = tracker.register(BoundingBox::new(0, 0, 10, 10));
        assert_eq!(second, first + 1);
        assert!(tracker.get(first).is_none());
        assert_keys_in_lockstep(&tracker);
    }

    #[test]
    #[should_panic(expected = "untracked object id")]
    fn test_deregister_unknown_id_panics() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.deregister(3);
    }

    #[test]
    fn test_empty_tracker_registers_in_input_order() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        let objects = tracker.update(&[
            BoundingBox::new(0, 0, 10, 10),
            BoundingBox::new(100, 100, 110, 110),
        ]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].id(), 0);
        assert_eq!(objects[0].bbox(), BoundingBox::new(0, 0, 10, 10));
        assert_eq!(objects[1].id(), 1);
        assert_eq!(objects[1].bbox(), BoundingBox::new(100, 100, 110, 110));
    }

    #[test]
    fn test_small_offset_keeps_identity() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(10, 10, 50, 50)]);

        let objects = tracker.update(&[BoundingBox::new(12, 11, 52, 51)]);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id(), 0);
        assert_eq!(objects[0].bbox(), BoundingBox::new(12, 11, 52, 51));
        assert_eq!(tracker.missing_count(0), Some(0));
        assert_eq!(tracker.next_id(), 1);
    }

    #[test]
    fn test_removed_only_after_exceeding_max_missing() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(10, 10, 50, 50)]);

        for frame in 1..=5 {
            let objects = tracker.update(&[]);
            assert_eq!(objects.len(), 1, "object dropped early at frame {frame}");
            assert_eq!(tracker.missing_count(0), Some(frame));
        }

        let objects = tracker.update(&[]);
        assert!(objects.is_empty());
        assert!(tracker.is_empty());
        assert_keys_in_lockstep(&tracker);
    }

    #[test]
    fn test_match_resets_missing_count() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(10, 10, 50, 50)]);
        tracker.update(&[]);
        tracker.update(&[]);
        assert_eq!(tracker.missing_count(0), Some(2));

        tracker.update(&[BoundingBox::new(11, 11, 51, 51)]);
        assert_eq!(tracker.missing_count(0), Some(0));
    }

    #[test]
    fn test_more_detections_registers_the_difference() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(10, 10, 20, 20)]);
        let before = tracker.next_id();

        let objects = tracker.update(&[
            BoundingBox::new(200, 200, 220, 220),
            BoundingBox::new(11, 11, 21, 21),
            BoundingBox::new(100, 0, 120, 20),
        ]);

        assert_eq!(objects.len(), 3);
        assert_eq!(tracker.get(0).map(|o| o.bbox()), Some(BoundingBox::new(11, 11, 21, 21)));
        let new_ids: Vec<u64> = objects.iter().map(|o| o.id()).filter(|&id| id >= before).collect();
        assert_eq!(new_ids.len(), 2);
        assert_eq!(tracker.next_id(), before + 2);
        assert_keys_in_lockstep(&tracker);
    }

    #[test]
    fn test_fewer_detections_marks_the_difference_missing() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[
            BoundingBox::new(0, 0, 10, 10),
            BoundingBox::new(100, 100, 110, 110),
            BoundingBox::new(200, 200, 210, 210),
        ]);
        let before = tracker.next_id();

        let objects = tracker.update(&[BoundingBox::new(101, 101, 111, 111)]);

        assert_eq!(objects.len(), 3);
        assert_eq!(tracker.next_id(), before);
        assert_eq!(tracker.missing_count(0), Some(1));
        assert_eq!(tracker.missing_count(1), Some(0));
        assert_eq!(tracker.missing_count(2), Some(1));
    }

    #[test]
    fn test_losing_object_keeps_miss_count_when_detections_outnumber() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(0, 0, 20, 20), BoundingBox::new(4, 0, 24, 20)]);
        tracker.update(&[]);
        let before = tracker.next_id();

        // Both objects are closest to the first detection; object 0 wins it.
        let objects = tracker.update(&[
            BoundingBox::new(1, 0, 21, 20),
            BoundingBox::new(200, 200, 220, 220),
            BoundingBox::new(250, 0, 270, 20),
        ]);

        assert_eq!(objects.len(), 4);
        assert_eq!(tracker.missing_count(0), Some(0));
        assert_eq!(tracker.missing_count(1), Some(1));
        assert_eq!(tracker.get(1).map(|o| o.bbox()), Some(BoundingBox::new(4, 0, 24, 20)));
        assert_eq!(tracker.next_id(), before + 2);
        assert_keys_in_lockstep(&tracker);
    }

    #[test]
    fn test_equal_counts_never_register() {
        let mut tracker = CentroidTracker::new(TrackerConfig::default());
        tracker.update(&[BoundingBox::new(0, 0, 10, 10), BoundingBox::new(50, 50, 60, 60)]);

        let objects = tracker.update(&[
            BoundingBox::new(52, 52, 62, 62),
            BoundingBox::new(1, 1, 11, 11),
        ]);

        assert_eq!(objects.len(), 2);
        assert_eq!(tracker.next_id(), 2);
        assert_eq!(tracker.get(0).map(|o| o.bbox()), Some(BoundingBox::new(1, 1, 11, 11)));
        assert_eq!(tracker.get(1).map(|o| o.bbox()), Some(BoundingBox::new(52, 52, 62, 62)));
    }

    #[test]
    fn test_custom_max_missing_frames() {
        let mut tracker = CentroidTracker::new(TrackerConfig {
            max_missing_frames: 0,
        });
        tracker.update(&[BoundingBox::new(0, 0, 10, 10)]);
        assert!(tracker.update(&[]).is_empty());
    }
}
