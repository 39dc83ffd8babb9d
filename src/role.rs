use crate::view::View;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SystemOwner,
    StandardAdmin,
    ProfessionalTailor,
    EndClient,
}

/// A sidebar entry: the view it opens and the label shown for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub view: &'static str,
    pub label: &'static str,
}

const fn entry(view: &'static str, label: &'static str) -> NavEntry {
    NavEntry { view, label }
}

const OWNER_NAV: &[NavEntry] = &[
    entry("overview", "Overview"),
    entry("admins", "Operators"),
    entry("security", "Security"),
    entry("ai-oversight", "AI Oversight"),
    entry("infrastructure", "Infrastructure"),
    entry("metrics", "System Metrics"),
    entry("cms", "Landing CMS"),
    entry("activity", "Activity Log"),
    entry("ai-studio", "AI Studio"),
    entry("settings", "Settings"),
    entry("help", "Help"),
];

const ADMIN_NAV: &[NavEntry] = &[
    entry("overview", "Overview"),
    entry("cms", "Landing CMS"),
    entry("tailors", "Tailors"),
    entry("clients", "Clients"),
    entry("storage", "Storage"),
    entry("ai-logs", "AI Logs"),
    entry("reports", "Reports"),
    entry("ai-studio", "AI Studio"),
    entry("settings", "Settings"),
    entry("help", "Help"),
];

const TAILOR_NAV: &[NavEntry] = &[
    entry("overview", "Overview"),
    entry("clients", "Clients"),
    entry("measurements", "Measurements"),
    entry("upload", "Upload Scan"),
    entry("preview", "3D Preview"),
    entry("estimator", "Fabric Estimator"),
    entry("advice", "Style Advice"),
    entry("ai-studio", "AI Studio"),
    entry("settings", "Settings"),
    entry("help", "Help"),
];

const CLIENT_NAV: &[NavEntry] = &[
    entry("overview", "Overview"),
    entry("measurements", "My Measurements"),
    entry("history", "History"),
    entry("orders", "Orders"),
    entry("preview", "3D Preview"),
    entry("style", "Style Advice"),
    entry("fabric", "Fabric"),
    entry("ai-studio", "AI Studio"),
    entry("settings", "Settings"),
    entry("help", "Help"),
];

impl Role {
    pub const ALL: [Role; 4] = [
        Role::SystemOwner,
        Role::StandardAdmin,
        Role::ProfessionalTailor,
        Role::EndClient,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::SystemOwner => "System Owner",
            Self::StandardAdmin => "Standard Admin",
            Self::ProfessionalTailor => "Professional Tailor",
            Self::EndClient => "End Client",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Self::SystemOwner => "Full platform administration",
            Self::StandardAdmin => "Operations & Monitoring",
            Self::ProfessionalTailor => "Design & Measurement Tools",
            Self::EndClient => "View Measurements & Orders",
        }
    }

    /// Letter shown in the header avatar.
    pub fn initial(self) -> char {
        match self {
            Self::SystemOwner => 'S',
            Self::StandardAdmin => 'A',
            Self::ProfessionalTailor => 'T',
            Self::EndClient => 'C',
        }
    }

    pub fn navigation(self) -> &'static [NavEntry] {
        match self {
            Self::SystemOwner => OWNER_NAV,
            Self::StandardAdmin => ADMIN_NAV,
            Self::ProfessionalTailor => TAILOR_NAV,
            Self::EndClient => CLIENT_NAV,
        }
    }

    /// Whether a view belongs to this role's scope. Unknown views are never
    /// permitted; the registry renders them as calibrating regardless.
    pub fn permits(self, view: &View) -> bool {
        use View::*;

        if view.is_shared() {
            return true;
        }
        match self {
            Self::SystemOwner => !matches!(view, Unknown(_)),
            Self::StandardAdmin => matches!(
                view,
                Cms | CmsAdd
                    | CmsEdit
                    | Clients
                    | ClientRegister
                    | Tailors
                    | TailorFeed
                    | Storage
                    | AiLogs
                    | Reports
                    | Metrics
                    | Activity
            ),
            Self::ProfessionalTailor => matches!(
                view,
                Clients
                    | ClientRegister
                    | Measurements
                    | History
                    | PdfViewer
                    | Upload
                    | Preview
                    | Estimator
                    | Advice
                    | Style
                    | Fabric
            ),
            Self::EndClient => matches!(
                view,
                Measurements | History | PdfViewer | Orders | Preview | Advice | Style | Fabric
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_navigation_entry_is_permitted_for_its_role() {
        for role in Role::ALL {
            for entry in role.navigation() {
                let view = View::parse(entry.view);
                assert!(
                    role.permits(&view),
                    "{role} should permit its own nav entry {}",
                    entry.view
                );
            }
        }
    }

    #[test]
    fn shared_views_are_open_to_every_role() {
        for role in Role::ALL {
            assert!(role.permits(&View::Overview));
            assert!(role.permits(&View::AiStudio));
            assert!(role.permits(&View::NotificationDetail));
        }
    }

    #[test]
    fn end_client_cannot_reach_operator_views() {
        assert!(!Role::EndClient.permits(&View::Admins));
        assert!(!Role::EndClient.permits(&View::Cms));
        assert!(!Role::EndClient.permits(&View::WeightInspector));
        assert!(Role::EndClient.permits(&View::Orders));
    }

    #[test]
    fn system_owner_reaches_all_known_views_but_not_unknown_ones() {
        assert!(Role::SystemOwner.permits(&View::DeploymentManager));
        assert!(Role::SystemOwner.permits(&View::Orders));
        assert!(!Role::SystemOwner.permits(&View::Unknown("ghost".to_string())));
    }
}
