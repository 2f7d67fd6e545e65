//! Service request model
//! Requests move through an approval workflow before IT fulfils them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Being written by the requester
    Draft,
    /// Handed to the service desk
    Submitted,
    /// Waiting for an approver
    PendingApproval,
    /// Approved, waiting to be worked on
    Approved,
    /// Being fulfilled
    InProgress,
    Completed,
    Rejected,
    Cancelled,
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Allowed successors of every status
const TRANSITIONS: &[(RequestStatus, &[RequestStatus])] = &[
    (
        RequestStatus::Draft,
        &[RequestStatus::Submitted, RequestStatus::Cancelled],
    ),
    (
        RequestStatus::Submitted,
        &[
            RequestStatus::PendingApproval,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ],
    ),
    (
        RequestStatus::PendingApproval,
        &[
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ],
    ),
    (
        RequestStatus::Approved,
        &[RequestStatus::InProgress, RequestStatus::Cancelled],
    ),
    (
        RequestStatus::InProgress,
        &[RequestStatus::Completed, RequestStatus::Cancelled],
    ),
    (RequestStatus::Completed, &[]),
    (RequestStatus::Rejected, &[]),
    (RequestStatus::Cancelled, &[]),
];

impl RequestStatus {
    pub const ALL: [RequestStatus; 8] = [
        Self::Draft,
        Self::Submitted,
        Self::PendingApproval,
        Self::Approved,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Statuses reachable in one step from `self`
    pub fn next_states(self) -> &'static [RequestStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, next)| *next)
            .unwrap_or(&[])
    }

    pub fn can_transition_to(self, to: RequestStatus) -> bool {
        self.next_states().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| format!("Invalid request status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Hardware,
    Software,
    Access,
    Provisioning,
    Network,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// Recorded approver decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: String,
    pub approver: String,
    pub decision: ApprovalDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl Approval {
    pub fn new(approver: String, decision: ApprovalDecision, comment: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            approver,
            decision,
            comment,
            decided_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestComment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Service request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: RequestCategory,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub requester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub comments: Vec<RequestComment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Create a new draft request
    pub fn new(title: String, description: String, category: RequestCategory, requester: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            category,
            priority: RequestPriority::default(),
            status: RequestStatus::Draft,
            requester,
            assignee: None,
            approvals: Vec::new(),
            comments: Vec::new(),
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_priority(mut self, priority: RequestPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Request to open a service request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: RequestCategory,
    #[serde(default)]
    pub priority: RequestPriority,
    pub requester: String,
    /// Submit right away instead of leaving a draft
    #[serde(default)]
    pub submit: bool,
}

/// Request list query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub priority: Option<RequestPriority>,
    #[serde(default)]
    pub q: Option<String>,
}
