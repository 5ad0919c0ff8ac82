//! Status graphs per order type.
//!
//! Built once from a [`WorkflowPolicy`] at startup and shared read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::OrderType;
use crate::details::OrderDetails;
use crate::status::OrderStatus;

/// Named status graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Cutting-room flow for garments stitched in-house.
    Tailoring,
    /// Off-the-shelf goods: prepare, hand over.
    Simple,
    /// Simple flow plus return and deposit refund.
    Rental,
}

impl Workflow {
    /// Pick the workflow for an order type.
    ///
    /// Traditional and fabric orders only go through the cutting room when a
    /// stitch type was chosen.
    pub fn select(order_type: OrderType, details: &OrderDetails) -> Workflow {
        match order_type {
            OrderType::Rental => Workflow::Rental,
            OrderType::Custom => Workflow::Tailoring,
            OrderType::Traditional | OrderType::Fabric if details.has_stitching() => {
                Workflow::Tailoring
            }
            _ => Workflow::Simple,
        }
    }

    /// Happy path from the initial status to the terminal one.
    pub fn path(self) -> &'static [OrderStatus] {
        use crate::status::OrderStatus::*;
        match self {
            Workflow::Tailoring => &[
                Placed,
                Processing,
                Stitching,
                Buttoning,
                Ironing,
                ReadyForPickup,
                PickedUp,
            ],
            Workflow::Simple => &[Placed, Processing, ReadyForPickup, PickedUp],
            Workflow::Rental => &[
                Placed,
                Processing,
                ReadyForPickup,
                PickedUp,
                Returned,
                DepositRefunded,
            ],
        }
    }

    pub fn terminal(self) -> OrderStatus {
        match self {
            Workflow::Tailoring | Workflow::Simple => OrderStatus::PickedUp,
            Workflow::Rental => OrderStatus::DepositRefunded,
        }
    }
}

/// Deployment-level knobs for the status graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowPolicy {
    /// Allow `cancelled` from every non-terminal status.
    pub allow_cancellation: bool,
}

type TransitionMap = BTreeMap<OrderStatus, Vec<OrderStatus>>;

/// The transition tables for every workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWorkflows {
    policy: WorkflowPolicy,
    tailoring: TransitionMap,
    simple: TransitionMap,
    rental: TransitionMap,
}

impl StatusWorkflows {
    pub fn new(policy: WorkflowPolicy) -> Self {
        Self {
            policy,
            tailoring: build(Workflow::Tailoring, policy),
            simple: build(Workflow::Simple, policy),
            rental: build(Workflow::Rental, policy),
        }
    }

    pub fn policy(&self) -> WorkflowPolicy {
        self.policy
    }

    pub fn table(&self, workflow: Workflow) -> &BTreeMap<OrderStatus, Vec<OrderStatus>> {
        match workflow {
            Workflow::Tailoring => &self.tailoring,
            Workflow::Simple => &self.simple,
            Workflow::Rental => &self.rental,
        }
    }

    /// Whether `status` is a state of `workflow` at all.
    pub fn contains(&self, workflow: Workflow, status: OrderStatus) -> bool {
        self.table(workflow).contains_key(&status)
    }

    /// Statuses directly reachable from `status`; empty when terminal or unknown.
    pub fn next_statuses(&self, workflow: Workflow, status: OrderStatus) -> &[OrderStatus] {
        self.table(workflow)
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for StatusWorkflows {
    fn default() -> Self {
        Self::new(WorkflowPolicy::default())
    }
}

fn build(workflow: Workflow, policy: WorkflowPolicy) -> TransitionMap {
    let path = workflow.path();
    let mut table: TransitionMap = path
        .windows(2)
        .map(|pair| (pair[0], vec![pair[1]]))
        .collect();
    table.insert(workflow.terminal(), Vec::new());

    if policy.allow_cancellation {
        for (status, next) in table.iter_mut() {
            if *status != workflow.terminal() {
                next.push(OrderStatus::Cancelled);
            }
        }
        table.insert(OrderStatus::Cancelled, Vec::new());
    }

    table
}
