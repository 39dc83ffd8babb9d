//! Fixed copy and demo data for the dashboard panels.

use crate::gateway::GenerationResult;
use crate::role::Role;
use crate::session::ContentSection;
use crate::studio::Studio;
use crate::ui::event::UiAction;
use crate::view::View;

/// What a panel shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContent {
    pub title: String,
    pub lines: Vec<String>,
    pub actions: Vec<ContentAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAction {
    pub label: &'static str,
    pub action: UiAction,
}

impl ViewContent {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    fn action(mut self, label: &'static str, action: UiAction) -> Self {
        self.actions.push(ContentAction { label, action });
        self
    }

    fn go(self, label: &'static str, view: &str) -> Self {
        self.action(label, UiAction::navigate(view))
    }

    fn back(self, label: &'static str) -> Self {
        self.action(label, UiAction::Back)
    }
}

pub const OVERVIEW_STATS: [(&str, &str, &str); 4] = [
    ("Inference Velocity", "42ms", "Optimal"),
    ("Active Patterns", "1,024", "+12%"),
    ("Neural Accuracy", "99.8%", "Target"),
    ("Storage State", "Healthy", "92%"),
];

pub const STYLE_RECOMMENDATION: &str = "Based on your vertical torso alignment, we recommend \
structured peak lapels and a 2.5cm trouser taper.";

/// Measurement summary handed to the stylist when a consultation is asked
/// for from the advice panel.
pub const DEMO_MEASUREMENTS: &str =
    "chest 98.2cm, waist 84.2cm, hips 99.2cm, inseam 81.2cm, shoulder 46.2cm, sleeve 64.2cm";

pub fn overview(role: Role) -> ViewContent {
    ViewContent::new("Anatomical Feed")
        .line(format!("{} · {}", role.label(), role.tagline()))
        .lines(
            OVERVIEW_STATS
                .iter()
                .map(|(label, value, change)| format!("{label}: {value} ({change})")),
        )
        .lines((1..=4).map(|i| format!("Session Calibration #{i}20x · Reconstructed · Oct 15, 2024")))
        .line("Pro Extension: unlock volumetric fabric simulation for high-fidelity custom gowns.")
}

pub fn calibrating(identifier: &str) -> ViewContent {
    ViewContent::new("Module Calibrating")
        .line(format!(
            "The \"{identifier}\" neural link is being established for your current role authority."
        ))
        .go("Return to Overview", "overview")
}

pub fn restricted(view: &View, role: Role) -> ViewContent {
    ViewContent::new("Authority Boundary")
        .line(format!(
            "\"{}\" is outside the {} authority.",
            view.headline(),
            role.label()
        ))
        .line("Request elevated clearance from a System Owner to open this module.")
        .go("Return to Overview", "overview")
}

pub fn content_manager(sections: &[ContentSection]) -> ViewContent {
    let active = sections.iter().filter(|section| section.is_active).count();
    ViewContent::new("Landing Page Architecture")
        .line(format!("{} sections, {active} visible", sections.len()))
        .lines(sections.iter().map(|section| {
            let state = if section.is_active { "visible" } else { "hidden" };
            format!("#{} {} ({state}): {}", section.id, section.title, section.description)
        }))
        .go("Create New Section", "cms-add")
}

pub fn new_section() -> ViewContent {
    ViewContent::new("New Section")
        .line("Name the block and describe what it communicates.")
        .action("Deploy Section", UiAction::SubmitNewSection)
        .back("Discard")
}

pub fn edit_section(editing: Option<&ContentSection>) -> ViewContent {
    let content = ViewContent::new("Edit Section");
    let content = match editing {
        Some(section) => content.line(format!("Editing #{}: {}", section.id, section.title)),
        None => content.line("No section is open for editing."),
    };
    content
        .action("Commit Changes", UiAction::SaveEdit)
        .action("Cancel", UiAction::CancelEdit)
}

pub fn studio(studio: &Studio) -> ViewContent {
    let content = ViewContent::new("AI Studio").line(format!("Tool: {}", studio.tool.label()));
    let content = if studio.is_generating() {
        content.line("Processing Neural Request...")
    } else if let Some(error) = studio.last_error() {
        content.line(format!("Generation halted: {error}"))
    } else {
        match studio.last_result() {
            Some(result) => content.line(result_line(result)),
            None => content.line("Awaiting Inference"),
        }
    };
    content.action("Execute Generation", UiAction::Generate)
}

pub fn style_advice(studio: &Studio) -> ViewContent {
    let content = ViewContent::new("Neural Stylist").line(STYLE_RECOMMENDATION);
    let content = match studio.last_result() {
        Some(GenerationResult::Text { text }) if !studio.is_generating() => content.line(text.clone()),
        _ if studio.is_generating() => content.line("Consulting the stylist..."),
        _ => content,
    };
    content.action("Request Consultation", UiAction::RequestStyleAdvice)
}

fn result_line(result: &GenerationResult) -> String {
    match result {
        GenerationResult::Image { .. } => format!("Rendered design, {}", result.summary()),
        GenerationResult::Video { .. } => "Motion sequence ready".to_string(),
        GenerationResult::Text { text } => text.clone(),
    }
}

/// Static demo panels. Views with their own strategy fall through to the
/// calibrating notice.
pub fn panel(view: &View) -> ViewContent {
    match view {
        View::Settings | View::Profile => ViewContent::new("Neural Parameters")
            .line("Biometric obfuscation: on. Protect client data with quantum-ready hashing.")
            .line("Automatic Mesh Backup: off. Sync reconstruction logs to private S3 cluster."),
        View::Notifications => ViewContent::new("System Alerts")
            .lines((1..=3).map(|i| format!("Calibration Confirmed Session #{i}x · Oct 15, 2024")))
            .go("Open Latest Alert", "notification-detail"),
        View::NotificationDetail => ViewContent::new("System Calibration V3.2")
            .line("Calibration successful on all nodes.")
            .back("Back"),
        View::Help => ViewContent::new("Support Matrix")
            .line("Reach a bridge technician or search the knowledge base.")
            .go("Bridge Technician", "live-bridge")
            .go("Knowledge Base", "documentation")
            .action("Request Feature", UiAction::OpenFeatureRequest),
        View::LiveBridge => ViewContent::new("Live Bridge")
            .line("ESTABLISHING NEURAL LINK...")
            .back("Terminate"),
        View::Documentation => ViewContent::new("Archives")
            .line("Search technical specs here...")
            .back("Exit"),
        View::Clients => ViewContent::new("Identity Directory")
            .lines((1..=3).map(|i| format!("Client ID: #TX-90{i}")))
            .go("Register Identity", "client-register"),
        View::ClientRegister => ViewContent::new("Register Client")
            .line("Full name, contact and consent are captured at the atelier.")
            .back("Discard"),
        View::Measurements => ViewContent::new("Extracted Biometrics")
            .lines((0..6).map(|i| format!("Metric #{}: 9{i}.2cm", i + 1)))
            .go("View History", "history")
            .go("Export PDF", "pdf-viewer"),
        View::History => ViewContent::new("Historical Matrix")
            .lines((1..=2).map(|i| format!("Scan Oct {}, 2024", i + 10))),
        View::PdfViewer => ViewContent::new("Biometric Matrix")
            .line("PREVIEWING BIOMETRIC MATRIX PDF...")
            .back("Close"),
        View::Upload => ViewContent::new("Initialize Reconstruction")
            .line("Drop front and side photometry here."),
        View::Preview => ViewContent::new("Garment Closet")
            .lines(["Bespoke Jacket", "Silk Gown", "Top Coat"])
            .line("View modes: orbit, skeletal, heatmap. Awaiting Model."),
        View::Estimator => ViewContent::new("Material Estimator")
            .line("3.85 m required for Standard Tuxedo"),
        View::Fabric => ViewContent::new("Suggested Bolt Yields")
            .lines(["Luxe Merino Silk", "Italian Heavy Linen"]),
        View::Orders => ViewContent::new("Active Projects")
            .line("Bespoke Collection #99x · CALIBRATED"),
        View::Storage => ViewContent::new("Storage Fabric").line("Allocation: 33% of cluster capacity"),
        View::AiLogs => ViewContent::new("AI Inference Logs").lines(
            [212, 388, 97, 455, 143, 301, 260, 178, 512, 89]
                .iter()
                .map(|ms| format!("[PROMPT_TOKEN_SYNC] GEMINI-3-PRO: SUCCESS ({ms}ms)")),
        ),
        View::Reports => {
            ViewContent::new("Quarterly Reports").lines((1..=3).map(|q| format!("Download Q{q}")))
        }
        View::Metrics => ViewContent::new("System Metrics").line("System Load: 12% | All Nodes Healthy"),
        View::Admins => ViewContent::new("Operators")
            .line("Standard Operator (L1)")
            .go("Invite", "invite-admin")
            .go("Operator Settings", "admin-settings")
            .go("Revoke", "revoke-confirm"),
        View::InviteAdmin => ViewContent::new("Invite Operator")
            .line("An invitation is sent to the operator's email address.")
            .back("Cancel"),
        View::AdminSettings => ViewContent::new("Operator Control")
            .line("Toggle H100 GPU Burst")
            .back("Cancel"),
        View::RevokeConfirm => ViewContent::new("Revoke Access?")
            .line("This will immediately terminate all neural session tokens.")
            .back("Abort"),
        View::Tailors => ViewContent::new("Tailor Activity")
            .lines((1..=3).map(|i| format!("Tailor Node #{i}: Active")))
            .go("Live Feed", "tailor-feed"),
        View::TailorFeed => ViewContent::new("Atelier Telemetry")
            .line("MONITORING ATELIER TELEMETRY...")
            .back("Disconnect"),
        View::Activity => ViewContent::new("Activity Log").lines(
            (0..20).map(|i| format!("[2024-10-15 14:22:{i:02}] ADMIN_ACCESS: SUCCESS | Session: #90{i}")),
        ),
        View::Security => ViewContent::new("Security Portal").line("Active Shield: High Strength"),
        View::AiOversight => ViewContent::new("AI Oversight")
            .line("Inspect tensor weights or stage a model rollout.")
            .go("Tensor Inspector", "weight-inspector")
            .go("Rollout Hub", "deployment-manager"),
        View::WeightInspector => ViewContent::new("Weight Distribution")
            .line("Layer saturation within tolerance across 10 probes.")
            .back("Back"),
        View::DeploymentManager => ViewContent::new("Neural Rollout")
            .line("Ready for Deployment: Stable v3.4.1")
            .back("Back"),
        View::Infrastructure => ViewContent::new("Infrastructure").line("All Clusters Sync: 100%"),
        other => calibrating(other.as_str()),
    }
}
