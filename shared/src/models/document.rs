//! Movement document kinds, status lifecycles, and document numbering
//!
//! Each document variant carries a strictly ordered status lifecycle. A
//! document may only advance one step at a time; terminal states have no
//! successor. The variant prefix namespaces document numbers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a stored status or reason string does not parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The four movement document variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Receipt,
    Delivery,
    Transfer,
    Adjustment,
}

impl DocumentKind {
    /// Variant prefix used in document numbers
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Receipt => "RCP",
            DocumentKind::Delivery => "DEL",
            DocumentKind::Transfer => "TRF",
            DocumentKind::Adjustment => "ADJ",
        }
    }
}

/// Format a document number from a variant prefix, year, and sequence value.
///
/// Distinct sequence values for the same (prefix, year) yield distinct
/// numbers, so uniqueness reduces to the atomicity of the sequence.
pub fn format_document_number(kind: DocumentKind, year: i32, sequence: i64) -> String {
    format!("{}-{}-{:06}", kind.prefix(), year, sequence)
}

/// Receipt lifecycle: draft -> processing -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Draft,
    Processing,
    Completed,
}

impl ReceiptStatus {
    /// Statuses counted as pending on the dashboard (before stock is applied)
    pub const PENDING: &'static [&'static str] = &["draft", "processing"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Draft => "draft",
            ReceiptStatus::Processing => "processing",
            ReceiptStatus::Completed => "completed",
        }
    }

    /// The only status this one may advance to, if any
    pub fn next(&self) -> Option<ReceiptStatus> {
        match self {
            ReceiptStatus::Draft => Some(ReceiptStatus::Processing),
            ReceiptStatus::Processing => Some(ReceiptStatus::Completed),
            ReceiptStatus::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn can_advance_to(&self, target: ReceiptStatus) -> bool {
        self.next() == Some(target)
    }
}

impl FromStr for ReceiptStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ReceiptStatus::Draft),
            "processing" => Ok(ReceiptStatus::Processing),
            "completed" => Ok(ReceiptStatus::Completed),
            other => Err(ParseEnumError::new("receipt status", other)),
        }
    }
}

/// Delivery lifecycle: draft -> picking -> packing -> shipped -> delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Draft,
    Picking,
    Packing,
    Shipped,
    Delivered,
}

impl DeliveryStatus {
    /// Statuses counted as pending on the dashboard (before stock is applied)
    pub const PENDING: &'static [&'static str] = &["draft", "picking", "packing"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Draft => "draft",
            DeliveryStatus::Picking => "picking",
            DeliveryStatus::Packing => "packing",
            DeliveryStatus::Shipped => "shipped",
            DeliveryStatus::Delivered => "delivered",
        }
    }

    pub fn next(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Draft => Some(DeliveryStatus::Picking),
            DeliveryStatus::Picking => Some(DeliveryStatus::Packing),
            DeliveryStatus::Packing => Some(DeliveryStatus::Shipped),
            DeliveryStatus::Shipped => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn can_advance_to(&self, target: DeliveryStatus) -> bool {
        self.next() == Some(target)
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DeliveryStatus::Draft),
            "picking" => Ok(DeliveryStatus::Picking),
            "packing" => Ok(DeliveryStatus::Packing),
            "shipped" => Ok(DeliveryStatus::Shipped),
            "delivered" => Ok(DeliveryStatus::Delivered),
            other => Err(ParseEnumError::new("delivery status", other)),
        }
    }
}

/// Transfer lifecycle: draft -> in_transit -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Draft,
    InTransit,
    Completed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Draft => "draft",
            TransferStatus::InTransit => "in_transit",
            TransferStatus::Completed => "completed",
        }
    }

    pub fn next(&self) -> Option<TransferStatus> {
        match self {
            TransferStatus::Draft => Some(TransferStatus::InTransit),
            TransferStatus::InTransit => Some(TransferStatus::Completed),
            TransferStatus::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn can_advance_to(&self, target: TransferStatus) -> bool {
        self.next() == Some(target)
    }
}

impl FromStr for TransferStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TransferStatus::Draft),
            "in_transit" => Ok(TransferStatus::InTransit),
            "completed" => Ok(TransferStatus::Completed),
            other => Err(ParseEnumError::new("transfer status", other)),
        }
    }
}

/// Adjustment lifecycle: draft -> review -> approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStatus {
    Draft,
    Review,
    Approved,
}

impl AdjustmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentStatus::Draft => "draft",
            AdjustmentStatus::Review => "review",
            AdjustmentStatus::Approved => "approved",
        }
    }

    pub fn next(&self) -> Option<AdjustmentStatus> {
        match self {
            AdjustmentStatus::Draft => Some(AdjustmentStatus::Review),
            AdjustmentStatus::Review => Some(AdjustmentStatus::Approved),
            AdjustmentStatus::Approved => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn can_advance_to(&self, target: AdjustmentStatus) -> bool {
        self.next() == Some(target)
    }
}

impl FromStr for AdjustmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AdjustmentStatus::Draft),
            "review" => Ok(AdjustmentStatus::Review),
            "approved" => Ok(AdjustmentStatus::Approved),
            other => Err(ParseEnumError::new("adjustment status", other)),
        }
    }
}

/// Fixed vocabulary of stock adjustment reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentReason {
    CycleCount,
    PhysicalCount,
    Damage,
    Theft,
    Expiry,
    QualityIssue,
    SystemError,
    Other,
}

impl AdjustmentReason {
    pub const ALL: &'static [AdjustmentReason] = &[
        AdjustmentReason::CycleCount,
        AdjustmentReason::PhysicalCount,
        AdjustmentReason::Damage,
        AdjustmentReason::Theft,
        AdjustmentReason::Expiry,
        AdjustmentReason::QualityIssue,
        AdjustmentReason::SystemError,
        AdjustmentReason::Other,
    ];

    /// Human-readable label, as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::CycleCount => "Cycle Count",
            AdjustmentReason::PhysicalCount => "Physical Count",
            AdjustmentReason::Damage => "Damage",
            AdjustmentReason::Theft => "Theft",
            AdjustmentReason::Expiry => "Expiry",
            AdjustmentReason::QualityIssue => "Quality Issue",
            AdjustmentReason::SystemError => "System Error",
            AdjustmentReason::Other => "Other",
        }
    }
}

impl FromStr for AdjustmentReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdjustmentReason::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("adjustment reason", s))
    }
}
