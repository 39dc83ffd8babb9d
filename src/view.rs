use serde::{Deserialize, Serialize};
use std::fmt;

/// A dashboard screen. Parsing is total: identifiers that name no known
/// screen are kept verbatim in [`View::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum View {
    #[default]
    Overview,
    Settings,
    Profile,
    Notifications,
    NotificationDetail,
    Help,
    LiveBridge,
    Documentation,
    AiStudio,
    Cms,
    CmsAdd,
    CmsEdit,
    Clients,
    ClientRegister,
    Measurements,
    History,
    PdfViewer,
    Upload,
    Preview,
    Estimator,
    Advice,
    Style,
    Fabric,
    Orders,
    Storage,
    AiLogs,
    Reports,
    Metrics,
    Admins,
    InviteAdmin,
    AdminSettings,
    RevokeConfirm,
    Tailors,
    TailorFeed,
    Activity,
    Security,
    AiOversight,
    WeightInspector,
    DeploymentManager,
    Infrastructure,
    Unknown(String),
}

/// Placeholder arrangement shown while a view is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonLayout {
    Overview,
    Table,
    Preview,
    Studio,
    Default,
}

#[cfg(test)]
pub(crate) const KNOWN_IDENTIFIERS: &[&str] = &[
    "overview",
    "settings",
    "profile",
    "notifications",
    "notification-detail",
    "help",
    "live-bridge",
    "documentation",
    "ai-studio",
    "cms",
    "cms-add",
    "cms-edit",
    "clients",
    "client-register",
    "measurements",
    "history",
    "pdf-viewer",
    "upload",
    "preview",
    "estimator",
    "advice",
    "style",
    "fabric",
    "orders",
    "storage",
    "ai-logs",
    "reports",
    "metrics",
    "admins",
    "invite-admin",
    "admin-settings",
    "revoke-confirm",
    "tailors",
    "tailor-feed",
    "activity",
    "security",
    "ai-oversight",
    "weight-inspector",
    "deployment-manager",
    "infrastructure",
];

impl View {
    pub fn parse(identifier: &str) -> Self {
        match identifier {
            "overview" => Self::Overview,
            "settings" => Self::Settings,
            "profile" => Self::Profile,
            "notifications" => Self::Notifications,
            "notification-detail" => Self::NotificationDetail,
            "help" => Self::Help,
            "live-bridge" => Self::LiveBridge,
            "documentation" => Self::Documentation,
            "ai-studio" => Self::AiStudio,
            "cms" => Self::Cms,
            "cms-add" => Self::CmsAdd,
            "cms-edit" => Self::CmsEdit,
            "clients" => Self::Clients,
            "client-register" => Self::ClientRegister,
            "measurements" => Self::Measurements,
            "history" => Self::History,
            "pdf-viewer" => Self::PdfViewer,
            "upload" => Self::Upload,
            "preview" => Self::Preview,
            "estimator" => Self::Estimator,
            "advice" => Self::Advice,
            "style" => Self::Style,
            "fabric" => Self::Fabric,
            "orders" => Self::Orders,
            "storage" => Self::Storage,
            "ai-logs" => Self::AiLogs,
            "reports" => Self::Reports,
            "metrics" => Self::Metrics,
            "admins" => Self::Admins,
            "invite-admin" => Self::InviteAdmin,
            "admin-settings" => Self::AdminSettings,
            "revoke-confirm" => Self::RevokeConfirm,
            "tailors" => Self::Tailors,
            "tailor-feed" => Self::TailorFeed,
            "activity" => Self::Activity,
            "security" => Self::Security,
            "ai-oversight" => Self::AiOversight,
            "weight-inspector" => Self::WeightInspector,
            "deployment-manager" => Self::DeploymentManager,
            "infrastructure" => Self::Infrastructure,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Overview => "overview",
            Self::Settings => "settings",
            Self::Profile => "profile",
            Self::Notifications => "notifications",
            Self::NotificationDetail => "notification-detail",
            Self::Help => "help",
            Self::LiveBridge => "live-bridge",
            Self::Documentation => "documentation",
            Self::AiStudio => "ai-studio",
            Self::Cms => "cms",
            Self::CmsAdd => "cms-add",
            Self::CmsEdit => "cms-edit",
            Self::Clients => "clients",
            Self::ClientRegister => "client-register",
            Self::Measurements => "measurements",
            Self::History => "history",
            Self::PdfViewer => "pdf-viewer",
            Self::Upload => "upload",
            Self::Preview => "preview",
            Self::Estimator => "estimator",
            Self::Advice => "advice",
            Self::Style => "style",
            Self::Fabric => "fabric",
            Self::Orders => "orders",
            Self::Storage => "storage",
            Self::AiLogs => "ai-logs",
            Self::Reports => "reports",
            Self::Metrics => "metrics",
            Self::Admins => "admins",
            Self::InviteAdmin => "invite-admin",
            Self::AdminSettings => "admin-settings",
            Self::RevokeConfirm => "revoke-confirm",
            Self::Tailors => "tailors",
            Self::TailorFeed => "tailor-feed",
            Self::Activity => "activity",
            Self::Security => "security",
            Self::AiOversight => "ai-oversight",
            Self::WeightInspector => "weight-inspector",
            Self::DeploymentManager => "deployment-manager",
            Self::Infrastructure => "infrastructure",
            Self::Unknown(identifier) => identifier.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Views every role may open.
    pub fn is_shared(&self) -> bool {
        matches!(
            self,
            Self::Overview
                | Self::Settings
                | Self::Profile
                | Self::Notifications
                | Self::NotificationDetail
                | Self::Help
                | Self::LiveBridge
                | Self::Documentation
                | Self::AiStudio
        )
    }

    /// Where the back affordance of a sub-view leads.
    pub fn parent(&self) -> Option<View> {
        let parent = match self {
            Self::CmsAdd | Self::CmsEdit => Self::Cms,
            Self::ClientRegister => Self::Clients,
            Self::PdfViewer => Self::Measurements,
            Self::InviteAdmin | Self::AdminSettings | Self::RevokeConfirm => Self::Admins,
            Self::TailorFeed => Self::Tailors,
            Self::WeightInspector | Self::DeploymentManager => Self::AiOversight,
            Self::LiveBridge | Self::Documentation => Self::Help,
            Self::NotificationDetail => Self::Notifications,
            _ => return None,
        };
        Some(parent)
    }

    pub fn skeleton(&self) -> SkeletonLayout {
        match self {
            Self::Overview => SkeletonLayout::Overview,
            Self::Measurements | Self::History => SkeletonLayout::Table,
            Self::Preview => SkeletonLayout::Preview,
            Self::AiStudio => SkeletonLayout::Studio,
            _ => SkeletonLayout::Default,
        }
    }

    /// Page title: words of the identifier, capitalised.
    pub fn headline(&self) -> String {
        self.as_str()
            .split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&str> for View {
    fn from(identifier: &str) -> Self {
        Self::parse(identifier)
    }
}

impl From<String> for View {
    fn from(identifier: String) -> Self {
        Self::parse(&identifier)
    }
}

impl From<View> for String {
    fn from(view: View) -> Self {
        view.as_str().to_string()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
