use crate::event::AppEvent;
use crate::gateway::credentials::CredentialStore;
use crate::gateway::GenerationGateway;
use crate::navigation::NavigationController;
use crate::role::Role;
use crate::theme::Theme;
use crate::ui::content::DEMO_MEASUREMENTS;
use crate::ui::event::{UiAction, UiActionLog};
use crate::ui::loading::LoadingTimer;
use crate::ui::registry::{FormState, ViewRegistry};
use crate::ui::worker::GenerationWorker;
use crate::view::View;
use eframe::egui::{self, RichText, ScrollArea};
use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::runtime::Handle;
use tracing::{info, warn};

const REPAINT_INTERVAL: Duration = Duration::from_millis(50);
const DIAGNOSTICS_CAPACITY: usize = 200;

/// Everything that lives exactly as long as a role session.
struct ActiveSession {
    controller: NavigationController,
    forms: FormState,
    timer: LoadingTimer,
    worker: GenerationWorker,
    actions: UiActionLog,
    pending_delete: Option<u64>,
}

#[derive(Default)]
struct FeatureRequest {
    subject: String,
    description: String,
}

pub struct TailorApp {
    rx: Receiver<AppEvent>,
    tx: Sender<AppEvent>,
    runtime_handle: Handle,
    credentials: Arc<CredentialStore>,
    gateway: GenerationGateway,
    loading_duration: Duration,
    theme: Theme,
    theme_applied: bool,
    session: Option<ActiveSession>,
    credential_prompt: Option<String>,
    feature_request: Option<FeatureRequest>,
    diagnostics_log: VecDeque<String>,
}

impl TailorApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        tx: Sender<AppEvent>,
        runtime_handle: Handle,
        credentials: Arc<CredentialStore>,
        gateway: GenerationGateway,
        loading_duration: Duration,
    ) -> Self {
        Self {
            rx,
            tx,
            runtime_handle,
            credentials,
            gateway,
            loading_duration,
            theme: Theme::default(),
            theme_applied: false,
            session: None,
            credential_prompt: None,
            feature_request: None,
            diagnostics_log: VecDeque::new(),
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        if self.diagnostics_log.len() == DIAGNOSTICS_CAPACITY {
            self.diagnostics_log.pop_front();
        }
        self.diagnostics_log
            .push_back(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn start_session(&mut self, role: Role) {
        let controller = NavigationController::select_role(role);
        let mut timer = LoadingTimer::new(
            self.runtime_handle.clone(),
            self.tx.clone(),
            self.loading_duration,
        );
        timer.schedule(controller.loading_ticket());
        let worker = GenerationWorker::new(
            self.gateway.clone(),
            self.runtime_handle.clone(),
            self.tx.clone(),
        );

        self.session = Some(ActiveSession {
            controller,
            forms: FormState::default(),
            timer,
            worker,
            actions: UiActionLog::default(),
            pending_delete: None,
        });
        self.log_diagnostic(format!("session started as {role}"));
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            let ActiveSession {
                controller,
                mut worker,
                mut timer,
                ..
            } = session;
            worker.abort();
            timer.cancel();
            controller.end_session();
        }
        if self.credential_prompt.take().is_some() {
            self.credentials.dismiss();
        }
        self.feature_request = None;
        self.log_diagnostic("session ended");
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoadingElapsed { ticket } => {
                if let Some(session) = self.session.as_mut() {
                    session.controller.finish_loading(ticket);
                }
            }
            AppEvent::GenerationSettled { ticket, outcome } => {
                if let Err(message) = &outcome {
                    self.log_diagnostic(format!("generation error: {message}"));
                }
                match self.session.as_mut() {
                    Some(session) => {
                        let studio = session.controller.studio_mut();
                        let current = studio.in_flight_ticket();
                        if !studio.settle(ticket, outcome) {
                            warn!(ticket, ?current, "dropping outcome for a stale generation ticket");
                        }
                    }
                    None => warn!(ticket, "generation settled after the session ended"),
                }
            }
            AppEvent::CredentialRequested => {
                self.log_diagnostic("API key requested");
                self.credential_prompt = Some(String::new());
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            info!(action = %action.to_log_line(), "ui action");
            if action == UiAction::Logout {
                self.end_session();
                continue;
            }
            if action == UiAction::OpenFeatureRequest {
                self.feature_request = Some(FeatureRequest::default());
            }
            if let Some(session) = self.session.as_mut() {
                session.apply(action);
            }
        }
    }

    fn render_portal(&self, ctx: &egui::Context) -> Option<Role> {
        let theme = &self.theme;
        let mut selected = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface_0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24 * 3.0);
                    ui.label(
                        RichText::new("TAILORAI")
                            .size(44.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    ui.label(
                        RichText::new("SELECT YOUR AUTHORITY TO ESTABLISH A NEURAL LINK")
                            .size(12.0)
                            .color(theme.text_muted),
                    );
                    ui.add_space(theme.spacing_24 * 2.0);
                });

                ui.columns(Role::ALL.len(), |columns| {
                    for (column, role) in columns.iter_mut().zip(Role::ALL) {
                        theme.card_frame().show(column, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(
                                RichText::new(role.initial().to_string())
                                    .size(32.0)
                                    .strong()
                                    .color(theme.accent_primary),
                            );
                            ui.label(
                                RichText::new(role.label())
                                    .size(18.0)
                                    .strong()
                                    .color(theme.text_primary),
                            );
                            ui.label(RichText::new(role.tagline()).color(theme.text_muted));
                            ui.add_space(theme.spacing_12);
                            if ui.add(theme.primary_button("Enter")).clicked() {
                                selected = Some(role);
                            }
                        });
                    }
                });
            });
        selected
    }

    fn render_credential_prompt(&mut self, ctx: &egui::Context) {
        let Some(buffer) = self.credential_prompt.as_mut() else {
            return;
        };
        let theme = &self.theme;
        let mut provided = None;
        let mut dismissed = false;

        egui::Window::new("Select API Key")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(
                        "Image and video generation need a Gemini API key from a billed project.",
                    )
                    .color(theme.text_muted),
                );
                ui.add(
                    egui::TextEdit::singleline(buffer)
                        .password(true)
                        .desired_width(360.0)
                        .hint_text("Paste API key"),
                );
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!buffer.trim().is_empty(), theme.primary_button("Use Key"))
                        .clicked()
                    {
                        provided = Some(buffer.trim().to_string());
                    }
                    if ui.add(theme.subtle_button("Dismiss")).clicked() {
                        dismissed = true;
                    }
                });
            });

        if let Some(key) = provided {
            self.credentials.provide(SecretString::from(key));
            self.credential_prompt = None;
            self.log_diagnostic("API key provided");
        } else if dismissed {
            self.credentials.dismiss();
            self.credential_prompt = None;
            self.log_diagnostic("API key prompt dismissed");
        }
    }

    fn render_feature_request(&mut self, ctx: &egui::Context) {
        let Some(request) = self.feature_request.as_mut() else {
            return;
        };
        let theme = &self.theme;
        let mut close = false;
        let mut submitted = false;

        egui::Window::new("Request New Feature")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new("SUBJECT").size(11.0).color(theme.text_muted));
                ui.add(
                    egui::TextEdit::singleline(&mut request.subject)
                        .desired_width(360.0)
                        .hint_text("e.g. AR Virtual Fitting"),
                );
                ui.label(RichText::new("DESCRIPTION").size(11.0).color(theme.text_muted));
                ui.add(
                    egui::TextEdit::multiline(&mut request.description)
                        .desired_width(360.0)
                        .desired_rows(5)
                        .hint_text("Tell us what you need..."),
                );
                ui.horizontal(|ui| {
                    if ui.add(theme.primary_button("Submit Feedback")).clicked() {
                        submitted = true;
                    }
                    if ui.add(theme.subtle_button("Close")).clicked() {
                        close = true;
                    }
                });
            });

        if submitted {
            info!(subject = %request.subject, "feature request submitted");
            let subject = request.subject.clone();
            self.log_diagnostic(format!("feature request: {subject}"));
        }
        if submitted || close {
            self.feature_request = None;
        }
    }
}

impl ActiveSession {
    fn apply(&mut self, action: UiAction) {
        let ticket = self.controller.loading_ticket();
        self.actions.push(action.clone());

        match action {
            UiAction::Navigate { view } => self.controller.go_to(view),
            UiAction::Back => self.controller.back(),
            UiAction::StartEdit { id } => {
                self.controller.start_edit(id);
            }
            UiAction::ToggleActive { id } => {
                self.controller.toggle_active(id);
            }
            UiAction::RequestDelete { id } => self.pending_delete = Some(id),
            UiAction::SubmitNewSection => {
                let draft = std::mem::take(&mut self.forms.new_section);
                if self.controller.add_section(draft.clone()).is_none() {
                    self.forms.new_section = draft;
                }
            }
            UiAction::SaveEdit => {
                self.controller.commit_edit(self.forms.edit_section.clone());
            }
            UiAction::CancelEdit => self.controller.cancel_edit(),
            UiAction::SelectTool { tool } => self.controller.studio_mut().select_tool(tool),
            UiAction::Generate => {
                if let Some((ticket, request)) = self.controller.studio_mut().submit() {
                    self.worker.dispatch(ticket, request);
                }
            }
            UiAction::RequestStyleAdvice => {
                if let Some((ticket, request)) =
                    self.controller.studio_mut().submit_style_advice(DEMO_MEASUREMENTS)
                {
                    self.worker.dispatch(ticket, request);
                }
            }
            UiAction::OpenFeatureRequest | UiAction::Logout => {}
        }

        if self.controller.loading_ticket() != ticket {
            self.timer.schedule(self.controller.loading_ticket());
        }
    }

    fn render_sidebar(&self, ctx: &egui::Context, theme: &Theme, emit: &mut dyn FnMut(UiAction)) {
        let role = self.controller.role();
        let current = self.controller.current_view();

        egui::SidePanel::left("navigation")
            .resizable(false)
            .exact_width(240.0)
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_0)
                    .inner_margin(egui::Margin::same(theme.spacing_16 as i8)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("TAILORAI")
                        .size(22.0)
                        .strong()
                        .color(theme.text_primary),
                );
                ui.label(
                    RichText::new(role.label().to_uppercase())
                        .size(11.0)
                        .color(theme.accent_primary),
                );
                ui.add_space(theme.spacing_16);

                for entry in role.navigation() {
                    let active = current.as_str() == entry.view
                        || current.parent().is_some_and(|parent| parent.as_str() == entry.view);
                    let text = RichText::new(entry.label).size(14.0);
                    let text = if active {
                        text.color(theme.text_on_accent).strong()
                    } else {
                        text.color(theme.text_muted)
                    };
                    if ui
                        .add_sized(
                            [ui.available_width(), theme.button_height],
                            egui::SelectableLabel::new(active, text),
                        )
                        .clicked()
                    {
                        emit(UiAction::navigate(entry.view));
                    }
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    if ui.add(theme.danger_button("Terminate Session")).clicked() {
                        emit(UiAction::Logout);
                    }
                });
            });
    }

    fn render_main(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        diagnostics: &VecDeque<String>,
        emit: &mut dyn FnMut(UiAction),
    ) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_1)
                    .inner_margin(egui::Margin::same(theme.spacing_24 as i8)),
            )
            .show(ctx, |ui| {
                self.render_header(ui, theme, emit);
                ui.add_space(theme.spacing_24);

                let view = self.controller.current_view().clone();
                ScrollArea::vertical()
                    .id_salt("dashboard_content")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if self.controller.is_loading() {
                            ViewRegistry::render_skeleton(view.skeleton(), ui, theme);
                        } else {
                            let strategy = ViewRegistry::resolve_for(self.controller.role(), &view);
                            ViewRegistry::render(
                                &strategy,
                                ui,
                                theme,
                                &mut self.controller,
                                &mut self.forms,
                                emit,
                            );
                        }

                        ui.add_space(theme.spacing_24);
                        egui::CollapsingHeader::new(format!("Diagnostics ({} actions)", self.actions.len()))
                            .id_salt("diagnostics")
                            .default_open(false)
                            .show(ui, |ui| {
                                if ui.add(theme.subtle_button("Clear action log")).clicked() {
                                    self.actions.clear();
                                }
                                for entry in diagnostics {
                                    ui.label(RichText::new(entry).monospace().color(theme.text_muted));
                                }
                                for action in self.actions.entries().rev().take(20) {
                                    ui.label(
                                        RichText::new(action.to_log_line())
                                            .monospace()
                                            .color(theme.text_muted),
                                    );
                                }
                            });
                    });
            });
    }

    fn render_header(&self, ui: &mut egui::Ui, theme: &Theme, emit: &mut dyn FnMut(UiAction)) {
        let role = self.controller.role();
        let view = self.controller.current_view();

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new("NEURAL LINK ACTIVE")
                        .size(10.0)
                        .strong()
                        .color(theme.success),
                );
                let headline = match view {
                    View::Unknown(identifier) if identifier.trim().is_empty() => "Untitled".to_string(),
                    _ => view.headline(),
                };
                ui.label(
                    RichText::new(headline)
                        .size(34.0)
                        .strong()
                        .color(theme.text_primary),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let avatar = egui::Button::new(
                    RichText::new(role.initial().to_string())
                        .size(18.0)
                        .strong()
                        .color(theme.text_on_accent),
                )
                .fill(theme.accent_deep)
                .corner_radius(egui::CornerRadius::same(theme.radius_12))
                .min_size(egui::vec2(48.0, 48.0));
                if ui.add(avatar).on_hover_text("Profile").clicked() {
                    emit(UiAction::navigate("profile"));
                }
                if ui.add(theme.subtle_button("Alerts")).clicked() {
                    emit(UiAction::navigate("notifications"));
                }
                if view.parent().is_some() && ui.add(theme.subtle_button("Back")).clicked() {
                    emit(UiAction::Back);
                }
            });
        });
    }

    fn render_delete_confirmation(&mut self, ctx: &egui::Context, theme: &Theme) {
        let Some(id) = self.pending_delete else {
            return;
        };
        let Some(section) = self.controller.section(id) else {
            self.pending_delete = None;
            return;
        };
        let title = section.title.clone();
        let mut answer = None;

        egui::Window::new("Delete Section")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to delete \"{title}\"? This cannot be undone."
                ));
                ui.horizontal(|ui| {
                    if ui.add(theme.danger_button("Delete")).clicked() {
                        answer = Some(true);
                    }
                    if ui.add(theme.subtle_button("Keep")).clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(confirmed) = answer {
            let ticket = self.controller.loading_ticket();
            self.controller.delete_section(id, |_| confirmed);
            self.pending_delete = None;
            if self.controller.loading_ticket() != ticket {
                self.timer.schedule(self.controller.loading_ticket());
            }
        }
    }
}

impl eframe::App for TailorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.theme.apply_visuals(ctx);
            self.theme_applied = true;
        }
        self.drain_events();

        let mut actions = Vec::new();
        match self.session.as_mut() {
            None => {
                if let Some(role) = self.render_portal(ctx) {
                    self.start_session(role);
                }
            }
            Some(session) => {
                let mut emit = |action: UiAction| actions.push(action);
                session.render_sidebar(ctx, &self.theme, &mut emit);
                session.render_main(ctx, &self.theme, &self.diagnostics_log, &mut emit);
                session.render_delete_confirmation(ctx, &self.theme);

                if session.controller.is_loading() || session.controller.studio().is_generating() {
                    ctx.request_repaint_after(REPAINT_INTERVAL);
                }
            }
        }
        self.apply_actions(actions);

        self.render_feature_request(ctx);
        self.render_credential_prompt(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::gateway::gemini::GeminiService;
    use std::sync::mpsc;

    fn app() -> TailorApp {
        let (tx, rx) = mpsc::channel();
        let credentials = Arc::new(CredentialStore::with_env_lookup(None, tx.clone(), || None));
        let service = GeminiService::new(ModelConfig::default(), Arc::clone(&credentials))
            .expect("http client");
        let gateway = GenerationGateway::new(Arc::new(service), credentials.clone());
        TailorApp::new(
            rx,
            tx,
            Handle::current(),
            credentials,
            gateway,
            Duration::from_millis(10),
        )
    }

    #[tokio::test]
    async fn logout_closes_an_open_credential_prompt() {
        let mut app = app();
        app.start_session(Role::ProfessionalTailor);
        app.apply_event(AppEvent::CredentialRequested);
        assert!(app.credential_prompt.is_some());

        app.apply_actions(vec![UiAction::Logout]);

        assert!(app.session.is_none());
        assert!(app.credential_prompt.is_none());
    }

    #[tokio::test]
    async fn diagnostics_keep_only_recent_entries() {
        let mut app = app();
        for index in 0..(DIAGNOSTICS_CAPACITY + 10) {
            app.log_diagnostic(format!("entry {index}"));
        }

        assert_eq!(app.diagnostics_log.len(), DIAGNOSTICS_CAPACITY);
        let oldest = app.diagnostics_log.front().expect("entries");
        assert!(oldest.ends_with("entry 10"));
    }
}
