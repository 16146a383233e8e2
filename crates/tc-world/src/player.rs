//! Player economy: money and delivery counters.
//!
//! Every purchase goes through [`Player::try_spend`]: the amount is deducted
//! only when affordable and the caller applies the purchase only on `true`.
//! An unaffordable purchase is a silent no-op, never an error.

use tc_core::Pos;

/// Flat part of every delivery fee.
pub const TRIP_BASE_COST: i64 = 5;
/// Distance (world units) of driving that costs one unit of money.
pub const FUEL_COST_BUCKET: f32 = 75.0;
pub const COST_OF_TAXI_STATION: i64 = 750;
pub const COST_OF_CAR: i64 = 250;
pub const COST_OF_ROAD: i64 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    money:            i64,
    delivered:        u32,
    missed:           u32,
    pending_distance: f32,
}

impl Player {
    pub fn new(money: i64) -> Self {
        Self::with_counters(money, 0, 0)
    }

    /// Restore a player from saved counters.
    pub fn with_counters(money: i64, delivered: u32, missed: u32) -> Self {
        Self { money, delivered, missed, pending_distance: 0.0 }
    }

    /// Restore the distance driven since the last fuel charge.
    pub fn with_pending_distance(mut self, distance: f32) -> Self {
        self.pending_distance = distance;
        self
    }

    #[inline]
    pub fn money(&self) -> i64 {
        self.money
    }

    #[inline]
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    #[inline]
    pub fn missed(&self) -> u32 {
        self.missed
    }

    #[inline]
    pub fn pending_distance(&self) -> f32 {
        self.pending_distance
    }

    #[inline]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.money >= amount
    }

    /// Deduct `amount` if affordable.
    pub fn try_spend(&mut self, amount: i64) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.money -= amount;
        true
    }

    pub fn adjust(&mut self, delta: i64) {
        self.money += delta;
    }

    /// Fee for a trip from `from` to `to`: base cost plus one unit per ten
    /// world units, at least one.
    pub fn delivery_fee(from: Pos, to: Pos) -> i64 {
        let distance = (from.dist(to) / 10.0).round() as i64;
        TRIP_BASE_COST + distance.max(1)
    }

    /// Credit a delivery and return the fee earned.
    pub fn on_delivered(&mut self, from: Pos, to: Pos) -> i64 {
        let fee = Self::delivery_fee(from, to);
        self.money += fee;
        self.delivered += 1;
        fee
    }

    pub fn on_missed(&mut self) {
        self.missed += 1;
    }

    /// Accumulate driven distance and charge fuel in whole buckets.
    /// Returns the amount charged this call.
    pub fn on_distance_travelled(&mut self, distance: f32) -> i64 {
        self.pending_distance += distance;
        let cost = (self.pending_distance / FUEL_COST_BUCKET).round() as i64;
        if cost > 0 {
            self.money -= cost;
            self.pending_distance -= FUEL_COST_BUCKET * cost as f32;
        }
        cost.max(0)
    }
}
