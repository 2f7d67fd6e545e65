//! VM provisioning form
//!
//! Form problems are returned as per-field messages so the client can show
//! them inline. A valid form becomes a draft service request in the
//! provisioning category.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::{Validate, ValidationErrors};

use super::request_service::RequestService;
use crate::models::{RequestCategory, RequestPriority, ServiceRequest};

static VM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").expect("static regex"));

pub const OS_IMAGES: &[&str] = &[
    "ubuntu-22.04",
    "ubuntu-24.04",
    "debian-12",
    "rhel-9",
    "windows-server-2022",
];

const MIN_PRODUCTION_JUSTIFICATION: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VmProvisionRequest {
    #[validate(length(min = 3, max = 63, message = "Name must be 3-63 characters"))]
    pub name: String,
    pub environment: Environment,
    #[validate(range(min = 1, max = 64, message = "CPU cores must be between 1 and 64"))]
    pub cpu_cores: u32,
    #[validate(range(min = 1, max = 512, message = "Memory must be between 1 and 512 GB"))]
    pub memory_gb: u32,
    #[validate(range(min = 20, max = 4096, message = "Disk must be between 20 and 4096 GB"))]
    pub disk_gb: u32,
    pub os_image: String,
    #[validate(length(min = 1, message = "Network is required"))]
    pub network: String,
    #[validate(email(message = "Owner must be a valid email address"))]
    pub owner_email: String,
    #[serde(default)]
    pub justification: String,
}

/// Messages keyed by form field (camelCase, as the client names them)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, list) in errors.field_errors() {
            let field = camel_case(&field.to_string());
            for e in list.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                out.add(&field, message);
            }
        }
        out
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl VmProvisionRequest {
    /// Run declarative and cross-field checks; empty means acceptable
    pub fn check(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };

        if !self.name.is_empty() && !VM_NAME.is_match(&self.name) {
            errors.add(
                "name",
                "Use lowercase letters, digits and hyphens, starting with a letter",
            );
        }
        if !OS_IMAGES.contains(&self.os_image.as_str()) {
            errors.add("osImage", format!("Unsupported image '{}'", self.os_image));
        }
        if self.environment == Environment::Production
            && self.justification.trim().chars().count() < MIN_PRODUCTION_JUSTIFICATION
        {
            errors.add(
                "justification",
                format!(
                    "Production VMs need a justification of at least {} characters",
                    MIN_PRODUCTION_JUSTIFICATION
                ),
            );
        }
        if self.environment != Environment::Production && self.memory_gb > 64 {
            errors.add("memoryGb", "More than 64 GB is reserved for production");
        }
        errors
    }

    /// Draft request carrying the form contents
    pub fn to_service_request(&self) -> ServiceRequest {
        let priority = match self.environment {
            Environment::Production => RequestPriority::High,
            _ => RequestPriority::Medium,
        };
        let mut description = format!(
            "Environment: {}\nImage: {}\nCPU: {} cores\nMemory: {} GB\nDisk: {} GB\nNetwork: {}",
            self.environment,
            self.os_image,
            self.cpu_cores,
            self.memory_gb,
            self.disk_gb,
            self.network
        );
        if !self.justification.trim().is_empty() {
            description.push_str("\n\n");
            description.push_str(self.justification.trim());
        }
        ServiceRequest::new(
            format!("Provision VM {}", self.name),
            description,
            RequestCategory::Provisioning,
            self.owner_email.clone(),
        )
        .with_priority(priority)
    }
}

/// Validate the form and, when clean, open a draft request for it
pub async fn submit_provisioning(
    requests: &RequestService,
    form: &VmProvisionRequest,
) -> Result<ServiceRequest, FieldErrors> {
    let errors = form.check();
    if !errors.is_empty() {
        tracing::debug!(
            "Provisioning form for {} rejected: {:?}",
            form.name,
            errors.fields().collect::<Vec<_>>()
        );
        return Err(errors);
    }
    Ok(requests.insert(form.to_service_request()).await)
}
