//! Time-bucketed density overview of a snapshot.
//!
//! The timeline strip divides the snapshot's time span into one bucket per
//! track pixel. Only `Text` messages count toward density; join/leave noise
//! is excluded. Buckets are ephemeral and rebuilt from the current snapshot
//! on every render.

use crate::color::normalize;
use crate::message::{MessageKind, Snapshot};

use std::collections::BTreeSet;

/// One timeline slot: distinct (normalized) senders and a message count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DensityBucket {
    pub senders: BTreeSet<String>,
    pub count: u32,
}

/// A non-empty bucket positioned on the track
#[derive(Debug, Clone, Copy)]
pub struct DensityRow<'a> {
    /// Track pixel index, i.e. `bucket index × unit height`
    pub index: usize,
    pub count: u32,
    pub senders: &'a BTreeSet<String>,
}

/// Density buckets for the current snapshot plus the time-to-pixel mapping
/// the thumb indicator shares with them.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMap {
    buckets: Vec<Option<DensityBucket>>,
    max: u32,
    first: i64,
    duration: i64,
}

impl DensityMap {
    /// Aggregate `snapshot` into `track_height` buckets.
    ///
    /// A zero time span (single message, or all messages at one timestamp)
    /// maps every qualifying message to bucket 0; division never happens on a
    /// zero duration.
    pub fn build(snapshot: &Snapshot, track_height: usize) -> Self {
        let track = track_height.max(1);
        let first = snapshot.first_time().unwrap_or(0);
        let duration = snapshot.last_time().unwrap_or(first) - first;

        let mut buckets: Vec<Option<DensityBucket>> = vec![None; track];
        let mut max = 0;
        for msg in snapshot.iter() {
            if msg.kind != MessageKind::Text {
                continue;
            }
            let index = bucket_index(msg.time, first, duration, track);
            let bucket = buckets[index].get_or_insert_with(DensityBucket::default);
            bucket.senders.insert(normalize(&msg.from));
            bucket.count += 1;
            if bucket.count > max {
                max = bucket.count;
            }
        }

        Self { buckets, max, first, duration }
    }

    /// Largest bucket count; 0 when no text messages exist
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn track_height(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max == 0
    }

    pub fn bucket(&self, index: usize) -> Option<&DensityBucket> {
        self.buckets.get(index).and_then(|b| b.as_ref())
    }

    /// Non-empty buckets in track order
    pub fn rows(&self) -> impl Iterator<Item = DensityRow<'_>> {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(index, bucket)| {
                bucket.as_ref().map(|b| DensityRow { index, count: b.count, senders: &b.senders })
            })
    }

    /// Bar width in cells for a bucket, proportional to `count / max`
    pub fn width_for(&self, count: u32, track_width: usize) -> usize {
        if self.max == 0 {
            return 0;
        }
        ((count as usize * track_width) / self.max as usize).max(1)
    }

    /// Track pixel for a message time, using the same mapping as the buckets
    pub fn time_to_pixel(&self, time: i64) -> usize {
        bucket_index(time, self.first, self.duration, self.buckets.len())
    }

    /// Thumb indicator `(top, height)` for the visible range, derived
    /// directly from `time_to_pixel` of its first and last message times.
    pub fn thumb_span(&self, start_time: i64, end_time: i64) -> (usize, usize) {
        let top = self.time_to_pixel(start_time);
        let bottom = self.time_to_pixel(end_time).max(top);
        (top, bottom - top + 1)
    }
}

fn bucket_index(time: i64, first: i64, duration: i64, track: usize) -> usize {
    if duration <= 0 {
        return 0;
    }
    let raw = (time - first).saturating_mul(track as i64) / duration;
    raw.clamp(0, track as i64 - 1) as usize
}
