//! Availability queries and the commit-time capacity check.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lodging_core::types::id::{BookingId, PropertyId, RoomTypeId};
use lodging_database::{BookingStore, StoreTx};
use lodging_entity::room_type::RoomType;

use super::occupancy;
use super::range::{Stay, StayRange};
use crate::error::BookingError;
use crate::lookup;

/// Outcome of a detailed availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Whether the requested rooms can be booked.
    pub available: bool,
    /// Every reason the request cannot be booked; empty when available.
    pub reasons: Vec<String>,
    /// Rooms free on every night of the range.
    pub max_rooms_available: u32,
}

/// Answers availability questions for room types.
///
/// Reads here are advisory and take no locks. The binding check runs
/// inside the booking transaction through [`InventoryLedger::ensure_capacity`].
#[derive(Clone)]
pub struct InventoryLedger {
    store: Arc<dyn BookingStore>,
}

impl InventoryLedger {
    /// Create a new ledger over the given store.
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Whether `rooms` rooms are free for every night of `[check_in, check_out)`.
    pub async fn check_availability(
        &self,
        property_id: PropertyId,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms: u32,
    ) -> Result<bool, BookingError> {
        self.check_availability_detailed(property_id, room_type_id, check_in, check_out, rooms)
            .await
            .map(|report| report.available)
    }

    /// Availability with every reason it fails and the largest bookable
    /// room count for the range.
    pub async fn check_availability_detailed(
        &self,
        property_id: PropertyId,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms: u32,
    ) -> Result<AvailabilityReport, BookingError> {
        let room_type = lookup::room_type_of(self.store.as_ref(), property_id, room_type_id).await?;
        let mut reasons = Vec::new();

        if let Err(e) = lookup::ensure_active(&room_type) {
            reasons.push(e.to_string());
        }
        if rooms < 1 {
            reasons.push(BookingError::InvalidRoomsCount.to_string());
        } else if rooms > room_type.capacity() {
            reasons.push(
                BookingError::ExceedsCapacity {
                    requested: rooms,
                    total_rooms: room_type.capacity(),
                }
                .to_string(),
            );
        }

        let range = match StayRange::new(check_in, check_out) {
            Ok(range) => range,
            Err(e) => {
                reasons.push(e.to_string());
                return Ok(AvailabilityReport {
                    available: false,
                    reasons,
                    max_rooms_available: 0,
                });
            }
        };

        let stays = self.stays(room_type_id, &range).await?;
        let free = if room_type.is_active {
            occupancy::rooms_free(room_type.capacity(), &stays, &range)
        } else {
            0
        };
        if reasons.is_empty() && free < rooms {
            reasons.push(
                BookingError::RoomsUnavailable {
                    requested: rooms,
                    available: free,
                }
                .to_string(),
            );
        }

        debug!(
            room_type_id = %room_type_id,
            check_in = %check_in,
            check_out = %check_out,
            rooms,
            free,
            "Checked availability"
        );

        Ok(AvailabilityReport {
            available: reasons.is_empty(),
            reasons,
            max_rooms_available: free,
        })
    }

    /// Days of a month on which a one-night stay of `rooms` rooms fits.
    /// Advisory for calendar display; multi-night stays are checked as a whole.
    pub async fn available_dates_in_month(
        &self,
        property_id: PropertyId,
        room_type_id: RoomTypeId,
        year: i32,
        month: u32,
        rooms: u32,
    ) -> Result<BTreeSet<NaiveDate>, BookingError> {
        if rooms < 1 {
            return Err(BookingError::InvalidRoomsCount);
        }
        let window = StayRange::month(year, month)?;
        let room_type = lookup::room_type_of(self.store.as_ref(), property_id, room_type_id).await?;
        if !room_type.is_active || rooms > room_type.capacity() {
            return Ok(BTreeSet::new());
        }
        let stays = self.stays(room_type_id, &window).await?;
        Ok(occupancy::available_dates(
            room_type.capacity(),
            &stays,
            &window,
            rooms,
        ))
    }

    async fn stays(
        &self,
        room_type_id: RoomTypeId,
        range: &StayRange,
    ) -> Result<Vec<Stay>, BookingError> {
        let stays = self
            .store
            .occupying_stays(room_type_id, range.check_in(), range.check_out())
            .await?;
        Ok(stays.into_iter().map(Stay::from).collect())
    }

    /// Commit-time check, run inside the transaction that holds the room
    /// type lock. `exclude` skips a booking being moved back into an
    /// occupying state.
    pub async fn ensure_capacity(
        tx: &mut dyn StoreTx,
        room_type: &RoomType,
        range: &StayRange,
        rooms: u32,
        exclude: Option<BookingId>,
    ) -> Result<(), BookingError> {
        let stays: Vec<Stay> = tx
            .occupying_stays(room_type.id, range.check_in(), range.check_out(), exclude)
            .await?
            .into_iter()
            .map(Stay::from)
            .collect();
        let free = occupancy::rooms_free(room_type.capacity(), &stays, range);
        if free < rooms {
            return Err(BookingError::RoomsUnavailable {
                requested: rooms,
                available: free,
            });
        }
        Ok(())
    }
}
