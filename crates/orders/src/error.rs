use thiserror::Error;

use stitchflow_core::DomainError;

use crate::classify::OrderType;
use crate::status::OrderStatus;

/// Why a status change was refused. Never fatal, never changes state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Caller is not allowed to move orders along.
    #[error("only administrators can update order status")]
    Unauthorized,

    #[error("status is required")]
    MissingStatus,

    /// A rental-only status was requested for an order that is not a rental.
    #[error("status '{requested}' is only available for rental orders (order type: {order_type})")]
    NotAllowedForOrderType {
        requested: OrderStatus,
        order_type: OrderType,
        allowed: Vec<OrderStatus>,
    },

    /// The target is not reachable from the current status.
    #[error("cannot change status from '{from}' to '{requested}' (order type: {order_type})")]
    InvalidTransition {
        from: OrderStatus,
        requested: String,
        order_type: OrderType,
        allowed: Vec<OrderStatus>,
    },
}

impl TransitionError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::Unauthorized => "unauthorized",
            TransitionError::MissingStatus => "missing_status",
            TransitionError::NotAllowedForOrderType { .. } => "not_allowed_for_order_type",
            TransitionError::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// Statuses the order could have moved to instead.
    pub fn allowed_statuses(&self) -> &[OrderStatus] {
        match self {
            TransitionError::NotAllowedForOrderType { allowed, .. }
            | TransitionError::InvalidTransition { allowed, .. } => allowed,
            TransitionError::Unauthorized | TransitionError::MissingStatus => &[],
        }
    }

    pub fn order_type(&self) -> Option<OrderType> {
        match self {
            TransitionError::NotAllowedForOrderType { order_type, .. }
            | TransitionError::InvalidTransition { order_type, .. } => Some(*order_type),
            TransitionError::Unauthorized | TransitionError::MissingStatus => None,
        }
    }
}

/// Failure of an order command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Rejected(#[from] TransitionError),
}
