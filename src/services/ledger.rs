//! Stock arithmetic for movements.
//!
//! A product's `quantity` is a cached projection of its initial quantity plus
//! the signed effect of every movement that still exists. The functions here
//! compute the next quantity for each of the three movement operations and
//! refuse any result below zero. They are pure; callers run them while
//! holding the product row lock and persist the returned value.

use thiserror::Error;

use crate::models::MovementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("movement quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(i32),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("operation would result in negative stock ({resulting})")]
    NegativeStock { resulting: i64 },

    #[error("stock quantity exceeds the supported range")]
    Overflow,
}

/// The part of a movement that affects stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub kind: MovementType,
    pub quantity: i32,
}

impl Effect {
    pub fn new(kind: MovementType, quantity: i32) -> Result<Self, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::NonPositiveQuantity(quantity));
        }
        Ok(Self { kind, quantity })
    }

    pub fn signed(&self) -> i64 {
        match self.kind {
            MovementType::Entry => i64::from(self.quantity),
            MovementType::Exit => -i64::from(self.quantity),
        }
    }
}

/// Quantity after recording `effect` on a product holding `current`.
pub fn record(current: i32, effect: Effect) -> Result<i32, LedgerError> {
    if effect.kind == MovementType::Exit && current < effect.quantity {
        return Err(LedgerError::InsufficientStock {
            available: current,
            requested: effect.quantity,
        });
    }
    apply(current, effect.signed())
}

/// Quantity after replacing the stored effect `old` with `new`.
///
/// The old effect is reversed and the new one applied as a single delta, so a
/// change of direction is accounted for as well as a change of quantity.
pub fn amend(current: i32, old: Effect, new: Effect) -> Result<i32, LedgerError> {
    apply(current, new.signed() - old.signed())
}

/// Quantity after deleting a movement with effect `effect`.
pub fn remove(current: i32, effect: Effect) -> Result<i32, LedgerError> {
    apply(current, -effect.signed())
}

fn apply(current: i32, delta: i64) -> Result<i32, LedgerError> {
    let resulting = i64::from(current) + delta;
    if resulting < 0 {
        return Err(LedgerError::NegativeStock { resulting });
    }
    i32::try_from(resulting).map_err(|_| LedgerError::Overflow)
}
