//! Demo content loaded at startup when `seed_demo_data` is set

use crate::error::OpsResult;
use crate::models::{
    CreateServiceRequest, Permission, RequestCategory, RequestPriority, RequestStatus,
};
use crate::services::{FileService, NewFile, RequestService};

const SEED_OWNER: &str = "it-admin";

/// (folder, parent, color)
const FOLDERS: &[(&str, Option<&str>, &str)] = &[
    ("Infrastructure", None, "#3b82f6"),
    ("Runbooks", Some("Infrastructure"), "#10b981"),
    ("Network Diagrams", Some("Infrastructure"), "#6366f1"),
    ("Security", None, "#ef4444"),
    ("Policies", Some("Security"), "#f59e0b"),
    ("Projects", None, "#8b5cf6"),
];

/// (file, folder, size, tags)
const FILES: &[(&str, Option<&str>, u64, &[&str])] = &[
    ("Onboarding Checklist.docx", None, 48_213, &["hr", "onboarding"]),
    ("Datacenter Inventory.xlsx", Some("Infrastructure"), 1_204_331, &["inventory"]),
    ("Backup Restore.md", Some("Runbooks"), 9_876, &["backup", "dr"]),
    ("Incident Response.pdf", Some("Runbooks"), 2_310_000, &["incident"]),
    ("core-switch-topology.png", Some("Network Diagrams"), 845_120, &["network"]),
    ("Acceptable Use Policy.pdf", Some("Policies"), 412_004, &["policy"]),
    ("firewall-rules.yaml", Some("Security"), 6_502, &["network", "firewall"]),
    ("migration-plan.pptx", Some("Projects"), 5_802_117, &["q3", "migration"]),
    ("vm-images.tar.gz", Some("Projects"), 734_003_200, &[]),
];

/// Populate the file repository and request queue with demo content
pub async fn seed_demo_data(files: &FileService, requests: &RequestService) -> OpsResult<()> {
    {
        let mut store = files.store().write().await;
        let mut ids: Vec<(&str, String)> = Vec::new();
        let id_of = |ids: &[(&str, String)], name: &str| {
            ids.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, id)| id.clone())
        };

        for (name, parent, color) in FOLDERS {
            let parent_id = parent.and_then(|p| id_of(&ids, p));
            let folder = store.create_folder(
                name,
                parent_id.as_deref(),
                SEED_OWNER,
                Permission::Organization,
                Some(color.to_string()),
            )?;
            ids.push((*name, folder.id));
        }

        for (name, folder, size, tags) in FILES {
            store.add_file(NewFile {
                name: name.to_string(),
                size: *size,
                folder_id: folder.and_then(|f| id_of(&ids, f)),
                owner: SEED_OWNER.to_string(),
                permissions: Permission::Team,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })?;
        }
    }

    let laptop = requests
        .create(CreateServiceRequest {
            title: "Replacement laptop for field engineer".to_string(),
            description: "Screen cracked during site visit".to_string(),
            category: RequestCategory::Hardware,
            priority: RequestPriority::High,
            requester: "j.morgan".to_string(),
            submit: true,
        })
        .await?;
    requests
        .transition(&laptop.id, RequestStatus::PendingApproval, SEED_OWNER)
        .await?;

    let vpn = requests
        .create(CreateServiceRequest {
            title: "VPN access for contractor".to_string(),
            description: "Two week engagement with the network team".to_string(),
            category: RequestCategory::Access,
            priority: RequestPriority::Medium,
            requester: "a.chen".to_string(),
            submit: true,
        })
        .await?;
    requests
        .transition(&vpn.id, RequestStatus::PendingApproval, SEED_OWNER)
        .await?;
    requests
        .approve(&vpn.id, SEED_OWNER, Some("Time boxed to two weeks".to_string()))
        .await?;
    requests.assign(&vpn.id, "netops").await?;
    requests
        .transition(&vpn.id, RequestStatus::InProgress, "netops")
        .await?;

    requests
        .create(CreateServiceRequest {
            title: "Install diagramming tool".to_string(),
            description: String::new(),
            category: RequestCategory::Software,
            priority: RequestPriority::Low,
            requester: "r.patel".to_string(),
            submit: false,
        })
        .await?;

    tracing::info!(
        "Seeded {} folders, {} files and 3 service requests",
        FOLDERS.len(),
        FILES.len()
    );
    Ok(())
}
