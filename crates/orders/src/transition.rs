//! Transition validation: the only gate through which an order's status moves.

use crate::classify::OrderType;
use crate::details::OrderDetails;
use crate::error::TransitionError;
use crate::status::OrderStatus;
use crate::workflow::{StatusWorkflows, Workflow};

/// The parts of an order a transition decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot<'a> {
    pub order_type: OrderType,
    pub details: &'a OrderDetails,
    pub status: OrderStatus,
}

impl StatusSnapshot<'_> {
    pub fn workflow(&self) -> Workflow {
        Workflow::select(self.order_type, self.details)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Decide whether `requested` is a legal next status.
///
/// Checks, in order:
/// - a target was supplied (blank counts as missing)
/// - `returned` / `deposit_refunded` only for rentals, whatever the table says
/// - the target is an outgoing edge of the current status
///
/// Unknown status names are reported as invalid transitions.
pub fn validate_transition(
    workflows: &StatusWorkflows,
    order: StatusSnapshot<'_>,
    requested: Option<&str>,
) -> Result<AcceptedTransition, TransitionError> {
    let requested = match requested.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Err(TransitionError::MissingStatus),
    };

    let allowed = workflows.next_statuses(order.workflow(), order.status);

    let invalid = || TransitionError::InvalidTransition {
        from: order.status,
        requested: requested.to_string(),
        order_type: order.order_type,
        allowed: allowed.to_vec(),
    };

    let target: OrderStatus = requested.parse().map_err(|_| invalid())?;

    if target.is_rental_only() && !order.details.is_rental() {
        return Err(TransitionError::NotAllowedForOrderType {
            requested: target,
            order_type: order.order_type,
            allowed: allowed.to_vec(),
        });
    }

    if !allowed.contains(&target) {
        return Err(invalid());
    }

    Ok(AcceptedTransition {
        from: order.status,
        to: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::details::{Meters, StitchType};
    use crate::workflow::WorkflowPolicy;

    fn snapshot(details: &OrderDetails, status: OrderStatus) -> StatusSnapshot<'_> {
        StatusSnapshot {
            order_type: classify(details),
            details,
            status,
        }
    }

    fn custom() -> OrderDetails {
        OrderDetails {
            stitch_type: Some(StitchType::Shirt),
            meters: Meters::from_centimeters(250),
            ..OrderDetails::default()
        }
    }

    #[test]
    fn accepts_next_edge() {
        let wf = StatusWorkflows::default();
        let details = custom();
        let accepted =
            validate_transition(&wf, snapshot(&details, OrderStatus::Processing), Some("stitching"))
                .unwrap();
        assert_eq!(
            accepted,
            AcceptedTransition {
                from: OrderStatus::Processing,
                to: OrderStatus::Stitching,
            }
        );
    }

    #[test]
    fn missing_or_blank_target() {
        let wf = StatusWorkflows::default();
        let details = custom();
        for requested in [None, Some(""), Some("   ")] {
            let err = validate_transition(&wf, snapshot(&details, OrderStatus::Placed), requested)
                .unwrap_err();
            assert_eq!(err, TransitionError::MissingStatus);
        }
    }

    #[test]
    fn skipping_is_rejected_with_allowed_set() {
        let wf = StatusWorkflows::default();
        let details = custom();
        let err = validate_transition(&wf, snapshot(&details, OrderStatus::Placed), Some("ironing"))
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: OrderStatus::Placed,
                requested: "ironing".to_string(),
                order_type: OrderType::Custom,
                allowed: vec![OrderStatus::Processing],
            }
        );
    }

    #[test]
    fn regressing_is_rejected() {
        let wf = StatusWorkflows::default();
        let details = custom();
        let err =
            validate_transition(&wf, snapshot(&details, OrderStatus::Ironing), Some("stitching"))
                .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[test]
    fn unknown_name_is_invalid_transition() {
        let wf = StatusWorkflows::default();
        let details = custom();
        let err = validate_transition(&wf, snapshot(&details, OrderStatus::Placed), Some("shipped"))
            .unwrap_err();
        match err {
            TransitionError::InvalidTransition { requested, allowed, .. } => {
                assert_eq!(requested, "shipped");
                assert_eq!(allowed, vec![OrderStatus::Processing]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rental_guard_applies_from_every_status() {
        let wf = StatusWorkflows::new(WorkflowPolicy {
            allow_cancellation: true,
        });
        let details = custom();
        for status in OrderStatus::ALL {
            for requested in ["returned", "deposit_refunded"] {
                let err = validate_transition(&wf, snapshot(&details, status), Some(requested))
                    .unwrap_err();
                assert_eq!(err.code(), "not_allowed_for_order_type", "{status} -> {requested}");
            }
        }
    }

    #[test]
    fn rental_by_days_may_return() {
        let wf = StatusWorkflows::default();
        let details = OrderDetails {
            rental_days: 3,
            ..OrderDetails::default()
        };
        let accepted =
            validate_transition(&wf, snapshot(&details, OrderStatus::PickedUp), Some("returned"))
                .unwrap();
        assert_eq!(accepted.to, OrderStatus::Returned);
    }

    #[test]
    fn terminal_status_rejects_everything() {
        let wf = StatusWorkflows::default();
        let details = custom();
        for status in OrderStatus::ALL {
            let result = validate_transition(
                &wf,
                snapshot(&details, OrderStatus::PickedUp),
                Some(status.as_str()),
            );
            assert!(result.is_err(), "picked_up -> {status} should be refused");
        }
    }

    #[test]
    fn cancellation_only_with_policy() {
        let details = custom();
        let strict = StatusWorkflows::default();
        let lenient = StatusWorkflows::new(WorkflowPolicy {
            allow_cancellation: true,
        });

        assert!(
            validate_transition(&strict, snapshot(&details, OrderStatus::Stitching), Some("cancelled"))
                .is_err()
        );
        assert_eq!(
            validate_transition(&lenient, snapshot(&details, OrderStatus::Stitching), Some("cancelled"))
                .unwrap()
                .to,
            OrderStatus::Cancelled
        );
    }
}
