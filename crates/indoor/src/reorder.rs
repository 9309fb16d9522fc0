//! Deferred z-order promotion of a focused floor's extrusion layers.
//!
//! Ordering contract:
//! - Promotions fire in the order they were scheduled (`TimerQueue` ties
//!   break on insertion).
//! - Each applied promotion moves `floor-fill-{f}` then `room-{f}` directly
//!   below the current farthest layer, and `floor-fill-{f}` becomes the new
//!   farthest layer.

use std::time::Duration;

use foundation::FloorId;
use foundation::time::Time;
use layers::{FloorLayerIds, LayerId};
use runtime::{TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::renderer::{RendererError, RendererHandle};

/// How overlapping promotions are treated when several are pending.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Every scheduled promotion applies, in issue order.
    Queued,
    /// Only the most recently scheduled promotion applies; older ones are
    /// dropped when they fire.
    #[default]
    LatestOnly,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Promotion {
    floor: FloorId,
    generation: u64,
}

#[derive(Debug)]
pub struct LayerReorderQueue {
    delay: Duration,
    policy: PromotionPolicy,
    timers: TimerQueue<Promotion>,
    generation: u64,
    farthest: Option<LayerId>,
}

impl LayerReorderQueue {
    pub fn new(delay: Duration, policy: PromotionPolicy) -> Self {
        Self {
            delay,
            policy,
            timers: TimerQueue::new(),
            generation: 0,
            farthest: None,
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Sets the initial anchor, normally the lowest floor's outline layer.
    pub fn reset_anchor(&mut self, layer: LayerId) {
        self.farthest = Some(layer);
    }

    pub fn farthest(&self) -> Option<&LayerId> {
        self.farthest.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schedule(&mut self, now: Time, floor: FloorId) -> TimerId {
        self.generation += 1;
        let due = now.saturating_add(self.delay);
        debug!("promotion of floor {floor} scheduled for {}ms", due.as_millis());
        self.timers.schedule(
            due,
            Promotion {
                floor,
                generation: self.generation,
            },
        )
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<Time> {
        self.timers.next_due()
    }

    pub fn cancel_all(&mut self) -> usize {
        self.timers.clear()
    }

    /// Applies every promotion due at `now`. Returns the promoted floors.
    pub fn fire_due<R: RendererHandle + ?Sized>(
        &mut self,
        now: Time,
        renderer: &mut R,
    ) -> Result<Vec<FloorId>, RendererError> {
        let mut promoted = Vec::new();
        for (_, promotion) in self.timers.drain_due(now) {
            if self.policy == PromotionPolicy::LatestOnly && promotion.generation != self.generation
            {
                debug!("dropping stale promotion of floor {}", promotion.floor);
                continue;
            }
            if self.promote(promotion.floor, renderer)? {
                promoted.push(promotion.floor);
            }
        }
        Ok(promoted)
    }

    fn promote<R: RendererHandle + ?Sized>(
        &mut self,
        floor: FloorId,
        renderer: &mut R,
    ) -> Result<bool, RendererError> {
        let Some(anchor) = self.farthest.clone() else {
            debug!("no layer anchor yet, skipping promotion of floor {floor}");
            return Ok(false);
        };
        let ids = FloorLayerIds::for_floor(floor);
        renderer.move_layer(&ids.floor_fill, Some(&anchor))?;
        renderer.move_layer(&ids.room, Some(&anchor))?;
        debug!("promoted floor {floor} below {anchor}");
        self.farthest = Some(ids.floor_fill);
        Ok(true)
    }
}
