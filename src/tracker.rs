mod bounding_box;
mod centroid_tracker;
mod matching;
mod snapshot;
mod tracked_object;

pub use bounding_box::BoundingBox;
pub use centroid_tracker::{CentroidTracker, TrackerConfig};
pub use matching::{AssignmentResult, AssignmentStrategy, GreedyAssignment, centroid_distance};
pub use snapshot::TrackerSnapshot;
pub use tracked_object::{Color, TrackedObject};
