//! Service request workflow
//!
//! Transition legality comes from the table behind
//! [`RequestStatus::next_states`]; the service never changes a status
//! without consulting it.

use chrono::Utc;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::notification::Notifier;
use crate::error::{OpsError, OpsResult};
use crate::models::{
    Approval, ApprovalDecision, Attachment, CreateServiceRequest, ListRequestsQuery,
    RequestComment, RequestStatus, ServiceRequest,
};
use crate::security::validate_item_name;

/// Statuses reachable from `status` in one step
pub fn next_states(status: RequestStatus) -> &'static [RequestStatus] {
    status.next_states()
}

/// Move `request` to `to`, enforcing the transition table
pub fn transition(request: &mut ServiceRequest, to: RequestStatus) -> OpsResult<()> {
    let from = request.status;
    if !from.can_transition_to(to) {
        return Err(OpsError::InvalidTransition { from, to });
    }
    request.status = to;
    request.updated_at = Utc::now();
    Ok(())
}

#[derive(Clone)]
pub struct RequestService {
    requests: Arc<RwLock<IndexMap<String, ServiceRequest>>>,
    notifier: Notifier,
}

impl RequestService {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            requests: Arc::new(RwLock::new(IndexMap::new())),
            notifier,
        }
    }

    /// Open a request; `submit` skips the draft stage
    pub async fn create(&self, req: CreateServiceRequest) -> OpsResult<ServiceRequest> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(OpsError::Validation("Title is required".to_string()));
        }
        if req.requester.trim().is_empty() {
            return Err(OpsError::Validation("Requester is required".to_string()));
        }

        let mut request = ServiceRequest::new(
            title.to_string(),
            req.description,
            req.category,
            req.requester,
        )
        .with_priority(req.priority);
        if req.submit {
            transition(&mut request, RequestStatus::Submitted)?;
        }
        Ok(self.insert(request).await)
    }

    /// Store a fully built request
    pub async fn insert(&self, request: ServiceRequest) -> ServiceRequest {
        tracing::info!("Service request {} opened ({})", request.id, request.status);
        self.requests
            .write()
            .await
            .insert(request.id.clone(), request.clone());
        request
    }

    pub async fn get(&self, id: &str) -> OpsResult<ServiceRequest> {
        self.requests
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| OpsError::RequestNotFound(id.to_string()))
    }

    /// Newest first, filtered by status, priority and title/description text
    pub async fn list(&self, query: &ListRequestsQuery) -> Vec<ServiceRequest> {
        let needle = query
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let requests = self.requests.read().await;
        let mut items: Vec<ServiceRequest> = requests
            .values()
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .filter(|r| query.priority.map_or(true, |p| r.priority == p))
            .filter(|r| {
                needle.as_deref().map_or(true, |n| {
                    r.title.to_lowercase().contains(n) || r.description.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub async fn all(&self) -> Vec<ServiceRequest> {
        self.requests.read().await.values().cloned().collect()
    }

    async fn update<F>(&self, id: &str, f: F) -> OpsResult<ServiceRequest>
    where
        F: FnOnce(&mut ServiceRequest) -> OpsResult<()>,
    {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(id)
            .ok_or_else(|| OpsError::RequestNotFound(id.to_string()))?;
        f(request)?;
        Ok(request.clone())
    }

    /// Generic status change, checked against the transition table
    pub async fn transition(&self, id: &str, to: RequestStatus, actor: &str) -> OpsResult<ServiceRequest> {
        // Decisions must carry an approval record
        if matches!(to, RequestStatus::Approved | RequestStatus::Rejected) {
            return Err(OpsError::Validation(format!(
                "Use approve or reject to move a request to {}",
                to
            )));
        }
        let updated = self
            .update(id, |r| transition(r, to))
            .await
            .inspect_err(|e| tracing::warn!("Refused transition on {}: {}", id, e))?;
        tracing::info!("Request {} moved to {} by {}", id, to, actor);
        self.notifier.success(
            "Request updated",
            format!("{} is now {}", updated.title, updated.status),
        );
        Ok(updated)
    }

    /// Record an approval and move to `approved`
    pub async fn approve(&self, id: &str, approver: &str, comment: Option<String>) -> OpsResult<ServiceRequest> {
        let updated = self
            .update(id, |r| {
                transition(r, RequestStatus::Approved)?;
                r.approvals
                    .push(Approval::new(approver.to_string(), ApprovalDecision::Approved, comment));
                Ok(())
            })
            .await?;
        tracing::info!("Request {} approved by {}", id, approver);
        self.notifier
            .success("Request approved", format!("{} was approved", updated.title));
        Ok(updated)
    }

    /// Record a rejection with its reason
    pub async fn reject(&self, id: &str, approver: &str, reason: &str) -> OpsResult<ServiceRequest> {
        if reason.trim().is_empty() {
            return Err(OpsError::Validation("A rejection reason is required".to_string()));
        }
        let updated = self
            .update(id, |r| {
                transition(r, RequestStatus::Rejected)?;
                r.approvals.push(Approval::new(
                    approver.to_string(),
                    ApprovalDecision::Rejected,
                    Some(reason.trim().to_string()),
                ));
                Ok(())
            })
            .await?;
        tracing::info!("Request {} rejected by {}", id, approver);
        self.notifier
            .destructive("Request rejected", format!("{} was rejected", updated.title));
        Ok(updated)
    }

    pub async fn assign(&self, id: &str, assignee: &str) -> OpsResult<ServiceRequest> {
        self.update(id, |r| {
            if r.status.is_terminal() {
                return Err(OpsError::Validation(format!(
                    "Cannot assign a {} request",
                    r.status
                )));
            }
            r.assignee = Some(assignee.to_string());
            r.updated_at = Utc::now();
            Ok(())
        })
        .await
    }

    pub async fn add_comment(&self, id: &str, author: &str, content: &str) -> OpsResult<RequestComment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(OpsError::Validation("Comment cannot be empty".to_string()));
        }
        let comment = RequestComment {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let stored = comment.clone();
        self.update(id, move |r| {
            r.comments.push(stored);
            r.updated_at = Utc::now();
            Ok(())
        })
        .await?;
        Ok(comment)
    }

    pub async fn add_attachment(&self, id: &str, name: &str, size: u64, uploaded_by: &str) -> OpsResult<Attachment> {
        validate_item_name(name)?;
        let attachment = Attachment {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            size,
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: Utc::now(),
        };
        let stored = attachment.clone();
        self.update(id, move |r| {
            if r.status.is_terminal() {
                return Err(OpsError::Validation(format!(
                    "Cannot attach files to a {} request",
                    r.status
                )));
            }
            r.attachments.push(stored);
            r.updated_at = Utc::now();
            Ok(())
        })
        .await?;
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequestCategory, RequestPriority};

    fn create_req(title: &str, submit: bool) -> CreateServiceRequest {
        CreateServiceRequest {
            title: title.to_string(),
            description: "Need a new laptop".to_string(),
            category: RequestCategory::Hardware,
            priority: RequestPriority::High,
            requester: "dana".to_string(),
            submit,
        }
    }

    #[tokio::test]
    async fn test_happy_path_to_completion() {
        let svc = RequestService::new(Notifier::default());
        let req = svc.create(create_req("Laptop", true)).await.unwrap();
        assert_eq!(req.status, RequestStatus::Submitted);

        svc.transition(&req.id, RequestStatus::PendingApproval, "desk").await.unwrap();
        let approved = svc.approve(&req.id, "manager", Some("ok".into())).await.unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.approvals.len(), 1);

        svc.transition(&req.id, RequestStatus::InProgress, "tech").await.unwrap();
        let done = svc.transition(&req.id, RequestStatus::Completed, "tech").await.unwrap();
        assert!(done.status.is_terminal());
    }

    #[tokio::test]
    async fn test_decisions_only_through_approve_and_reject() {
        let svc = RequestService::new(Notifier::default());
        let req = svc.create(create_req("Monitor", true)).await.unwrap();

        for to in [RequestStatus::Rejected, RequestStatus::Approved] {
            let err = svc.transition(&req.id, to, "desk").await.unwrap_err();
            assert!(matches!(err, OpsError::Validation(_)));
        }
        let unchanged = svc.get(&req.id).await.unwrap();
        assert_eq!(unchanged.status, RequestStatus::Submitted);
        assert!(unchanged.approvals.is_empty());

        let rejected = svc.reject(&req.id, "manager", "Out of budget").await.unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(rejected.approvals.len(), 1);
    }

    #[tokio::test]
    async fn test_illegal_transition_refused() {
        let svc = RequestService::new(Notifier::default());
        let req = svc.create(create_req("VPN access", false)).await.unwrap();
        assert_eq!(req.status, RequestStatus::Draft);

        let err = svc.approve(&req.id, "manager", None).await.unwrap_err();
        assert!(matches!(
            err,
            OpsError::InvalidTransition {
                from: RequestStatus::Draft,
                to: RequestStatus::Approved
            }
        ));
        assert!(svc.get(&req.id).await.unwrap().approvals.is_empty());
    }

    #[tokio::test]
    async fn test_reject_requires_reason_and_records_decision() {
        let svc = RequestService::new(Notifier::default());
        let req = svc.create(create_req("Admin rights", true)).await.unwrap();
        assert!(svc.reject(&req.id, "sec", "  ").await.is_err());

        let rejected = svc.reject(&req.id, "sec", "Policy").await.unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(rejected.approvals[0].decision, ApprovalDecision::Rejected);
        assert!(svc.transition(&req.id, RequestStatus::Cancelled, "dana").await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_search() {
        let svc = RequestService::new(Notifier::default());
        svc.create(create_req("Laptop refresh", true)).await.unwrap();
        svc.create(create_req("Printer", false)).await.unwrap();

        let submitted = svc
            .list(&ListRequestsQuery {
                status: Some(RequestStatus::Submitted),
                ..Default::default()
            })
            .await;
        assert_eq!(submitted.len(), 1);

        let found = svc
            .list(&ListRequestsQuery {
                q: Some("PRINT".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(found[0].title, "Printer");
    }

    #[tokio::test]
    async fn test_comments_and_attachments() {
        let svc = RequestService::new(Notifier::default());
        let req = svc.create(create_req("Monitor", false)).await.unwrap();
        svc.add_comment(&req.id, "dana", "27 inch please").await.unwrap();
        svc.add_attachment(&req.id, "quote.pdf", 1200, "dana").await.unwrap();
        assert!(svc.add_attachment(&req.id, "../quote.pdf", 1, "dana").await.is_err());
        svc.assign(&req.id, "tech").await.unwrap();

        let stored = svc.get(&req.id).await.unwrap();
        assert_eq!(stored.comments.len(), 1);
        assert_eq!(stored.attachments.len(), 1);
        assert_eq!(stored.assignee.as_deref(), Some("tech"));

        svc.transition(&req.id, RequestStatus::Cancelled, "dana").await.unwrap();
        assert!(svc.assign(&req.id, "tech").await.is_err());
    }

    #[test]
    fn test_free_transition_function() {
        let mut req = ServiceRequest::new("t".into(), "".into(), RequestCategory::Other, "u".into());
        assert!(transition(&mut req, RequestStatus::Completed).is_err());
        assert_eq!(req.status, RequestStatus::Draft);
        transition(&mut req, RequestStatus::Submitted).unwrap();
        assert_eq!(next_states(req.status).len(), 3);
    }
}
