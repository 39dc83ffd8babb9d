use crate::gateway::GenerationTool;
use crate::view::View;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const LOG_CAPACITY: usize = 200;

/// Something the user asked the dashboard to do. Rendering code only emits
/// actions; the app applies them to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    Navigate { view: View },
    Back,
    StartEdit { id: u64 },
    ToggleActive { id: u64 },
    RequestDelete { id: u64 },
    SubmitNewSection,
    SaveEdit,
    CancelEdit,
    SelectTool { tool: GenerationTool },
    Generate,
    RequestStyleAdvice,
    OpenFeatureRequest,
    Logout,
}

impl UiAction {
    pub fn navigate(view: impl Into<View>) -> Self {
        Self::Navigate { view: view.into() }
    }

    pub fn to_log_line(&self) -> String {
        match self {
            Self::Navigate { view } => format!("navigate view={view}"),
            Self::Back => "back".to_string(),
            Self::StartEdit { id } => format!("start_edit section_id={id}"),
            Self::ToggleActive { id } => format!("toggle_active section_id={id}"),
            Self::RequestDelete { id } => format!("request_delete section_id={id}"),
            Self::SubmitNewSection => "submit_new_section".to_string(),
            Self::SaveEdit => "save_edit".to_string(),
            Self::CancelEdit => "cancel_edit".to_string(),
            Self::SelectTool { tool } => format!("select_tool tool={tool}"),
            Self::Generate => "generate".to_string(),
            Self::RequestStyleAdvice => "request_style_advice".to_string(),
            Self::OpenFeatureRequest => "open_feature_request".to_string(),
            Self::Logout => "logout".to_string(),
        }
    }
}

/// Most recent actions, oldest first.
#[derive(Debug, Default, Clone)]
pub struct UiActionLog {
    entries: VecDeque<UiAction>,
}

impl UiActionLog {
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &UiAction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, action: UiAction) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
