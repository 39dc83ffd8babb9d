use crate::gateway::{AspectRatio, Attachment, GenerationResult, GenerationTool, ImageSize};
use crate::navigation::NavigationController;
use crate::role::Role;
use crate::session::SectionDraft;
use crate::theme::Theme;
use crate::ui::content::{self, ViewContent};
use crate::ui::event::UiAction;
use crate::view::{SkeletonLayout, View};
use eframe::egui::{self, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit,
}

/// How a view is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStrategy {
    Overview,
    ContentManager,
    SectionEditor(EditorMode),
    Studio,
    StyleAdvice,
    /// Fixed demo panel.
    Panel(View),
    /// No module answers to this identifier yet.
    Calibrating { identifier: String },
    /// The module exists but lies outside the role's scope.
    Restricted { view: View, role: Role },
}

impl RenderStrategy {
    /// Pure description of the panel for the given session.
    pub fn describe(&self, session: &NavigationController) -> ViewContent {
        match self {
            Self::Overview => content::overview(session.role()),
            Self::ContentManager => content::content_manager(session.sections()),
            Self::SectionEditor(EditorMode::Add) => content::new_section(),
            Self::SectionEditor(EditorMode::Edit) => content::edit_section(session.editing()),
            Self::Studio => content::studio(session.studio()),
            Self::StyleAdvice => content::style_advice(session.studio()),
            Self::Panel(view) => content::panel(view),
            Self::Calibrating { identifier } => content::calibrating(identifier),
            Self::Restricted { view, role } => content::restricted(view, *role),
        }
    }
}

/// Drafts behind the forms the registry draws. They live across frames in
/// the app, not in the session.
#[derive(Debug, Default)]
pub struct FormState {
    pub new_section: SectionDraft,
    pub edit_section: SectionDraft,
    /// Section id and loading ticket of the edit entry the draft belongs to.
    edit_for: Option<(u64, u64)>,
    pub attachment_uri: String,
}

impl FormState {
    /// Draft for the section under edit, reseeded from the section on every
    /// fresh entry into the editor.
    pub fn edit_draft(&mut self, session: &NavigationController) -> &mut SectionDraft {
        let editing = session.editing();
        let entry = editing.map(|section| (section.id, session.loading_ticket()));
        if self.edit_for != entry {
            self.edit_for = entry;
            self.edit_section = editing.map(SectionDraft::from_section).unwrap_or_default();
        }
        &mut self.edit_section
    }
}

pub struct ViewRegistry;

impl ViewRegistry {
    /// Total over every view, including unknown identifiers.
    pub fn resolve(view: &View) -> RenderStrategy {
        match view {
            View::Overview => RenderStrategy::Overview,
            View::Cms => RenderStrategy::ContentManager,
            View::CmsAdd => RenderStrategy::SectionEditor(EditorMode::Add),
            View::CmsEdit => RenderStrategy::SectionEditor(EditorMode::Edit),
            View::AiStudio => RenderStrategy::Studio,
            View::Advice | View::Style => RenderStrategy::StyleAdvice,
            View::Unknown(identifier) => RenderStrategy::Calibrating {
                identifier: identifier.clone(),
            },
            known => RenderStrategy::Panel(known.clone()),
        }
    }

    /// Like [`ViewRegistry::resolve`], but known views outside the role's
    /// scope become a restriction notice.
    pub fn resolve_for(role: Role, view: &View) -> RenderStrategy {
        if view.is_known() && !role.permits(view) {
            return RenderStrategy::Restricted {
                view: view.clone(),
                role,
            };
        }
        Self::resolve(view)
    }

    pub fn render(
        strategy: &RenderStrategy,
        ui: &mut egui::Ui,
        theme: &Theme,
        session: &mut NavigationController,
        forms: &mut FormState,
        emit: &mut dyn FnMut(UiAction),
    ) {
        match strategy {
            RenderStrategy::ContentManager => Self::render_content_manager(ui, theme, session, emit),
            RenderStrategy::SectionEditor(mode) => {
                Self::render_section_editor(*mode, ui, theme, session, forms, emit)
            }
            RenderStrategy::Studio => Self::render_studio(ui, theme, session, forms, emit),
            RenderStrategy::StyleAdvice => {
                let content = strategy.describe(session);
                let busy = session.studio().is_generating();
                theme.hero_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    Self::render_lines(ui, theme, &content, theme.text_on_accent);
                    ui.add_space(theme.spacing_12);
                    for action in &content.actions {
                        if ui
                            .add_enabled(!busy, theme.subtle_button(action.label))
                            .clicked()
                        {
                            emit(action.action.clone());
                        }
                    }
                    if busy {
                        ui.spinner();
                    }
                });
            }
            RenderStrategy::Calibrating { .. } | RenderStrategy::Restricted { .. } => {
                let content = strategy.describe(session);
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24 * 2.0);
                    ui.label(RichText::new("⚠").size(48.0).color(theme.text_muted));
                    ui.add_space(theme.spacing_12);
                    Self::render_card(ui, theme, &content, emit);
                });
            }
            RenderStrategy::Overview | RenderStrategy::Panel(_) => {
                let content = strategy.describe(session);
                if matches!(strategy, RenderStrategy::Overview) {
                    Self::render_stats(ui, theme);
                    ui.add_space(theme.spacing_16);
                }
                Self::render_card(ui, theme, &content, emit);
            }
        }
    }

    fn render_stats(ui: &mut egui::Ui, theme: &Theme) {
        ui.columns(content::OVERVIEW_STATS.len(), |columns| {
            for (column, (label, value, change)) in columns.iter_mut().zip(content::OVERVIEW_STATS) {
                theme.card_frame().show(column, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(change).color(theme.text_muted).size(11.0));
                    ui.label(
                        RichText::new(label.to_uppercase())
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                    ui.label(
                        RichText::new(value)
                            .color(theme.text_primary)
                            .size(28.0)
                            .strong(),
                    );
                });
            }
        });
    }

    fn render_card(
        ui: &mut egui::Ui,
        theme: &Theme,
        content: &ViewContent,
        emit: &mut dyn FnMut(UiAction),
    ) {
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            Self::render_lines(ui, theme, content, theme.text_primary);
            if !content.actions.is_empty() {
                ui.add_space(theme.spacing_12);
                ui.horizontal_wrapped(|ui| {
                    for (index, action) in content.actions.iter().enumerate() {
                        let button = if index == 0 {
                            theme.primary_button(action.label)
                        } else {
                            theme.subtle_button(action.label)
                        };
                        if ui.add(button).clicked() {
                            emit(action.action.clone());
                        }
                    }
                });
            }
        });
    }

    fn render_lines(ui: &mut egui::Ui, theme: &Theme, content: &ViewContent, color: egui::Color32) {
        ui.label(
            RichText::new(content.title.to_uppercase())
                .color(color)
                .size(20.0)
                .strong(),
        );
        ui.add_space(theme.spacing_8);
        for line in &content.lines {
            ui.label(RichText::new(line).color(color).size(14.0));
        }
    }

    fn render_content_manager(
        ui: &mut egui::Ui,
        theme: &Theme,
        session: &NavigationController,
        emit: &mut dyn FnMut(UiAction),
    ) {
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("LANDING PAGE ARCHITECTURE")
                        .color(theme.text_primary)
                        .size(20.0)
                        .strong(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(theme.primary_button("+ Create New Section")).clicked() {
                        emit(UiAction::navigate("cms-add"));
                    }
                });
            });
            ui.add_space(theme.spacing_12);

            for section in session.sections() {
                egui::Frame::new()
                    .fill(theme.surface_3)
                    .corner_radius(egui::CornerRadius::same(theme.radius_12))
                    .inner_margin(egui::Margin::same(theme.spacing_16 as i8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    RichText::new(&section.title)
                                        .color(theme.text_primary)
                                        .size(16.0)
                                        .strong(),
                                );
                                ui.label(
                                    RichText::new(&section.description)
                                        .color(theme.text_muted)
                                        .size(13.0),
                                );
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let (label, fill) = if section.is_active {
                                    ("Visible", theme.accent_primary)
                                } else {
                                    ("Hidden", theme.surface_2)
                                };
                                let toggle = egui::Button::new(
                                    RichText::new(label).color(theme.text_on_accent).size(12.0),
                                )
                                .fill(fill)
                                .corner_radius(egui::CornerRadius::same(theme.radius_12));
                                if ui.add(toggle).clicked() {
                                    emit(UiAction::ToggleActive { id: section.id });
                                }
                                if ui.add(theme.danger_button("Delete")).clicked() {
                                    emit(UiAction::RequestDelete { id: section.id });
                                }
                                if ui.add(theme.subtle_button("Edit")).clicked() {
                                    emit(UiAction::StartEdit { id: section.id });
                                }
                            });
                        });
                    });
                ui.add_space(theme.spacing_8);
            }
        });
    }

    fn render_section_editor(
        mode: EditorMode,
        ui: &mut egui::Ui,
        theme: &Theme,
        session: &NavigationController,
        forms: &mut FormState,
        emit: &mut dyn FnMut(UiAction),
    ) {
        let content = RenderStrategy::SectionEditor(mode).describe(session);
        let draft = match mode {
            EditorMode::Add => &mut forms.new_section,
            EditorMode::Edit => forms.edit_draft(session),
        };

        theme.card_frame().show(ui, |ui| {
            ui.set_max_width(640.0);
            Self::render_lines(ui, theme, &content, theme.text_primary);
            ui.add_space(theme.spacing_12);

            ui.label(RichText::new("SECTION TITLE").color(theme.text_muted).size(11.0));
            ui.add(
                egui::TextEdit::singleline(&mut draft.title)
                    .desired_width(f32::INFINITY)
                    .hint_text("e.g. Testimonials Cloud"),
            );
            ui.label(RichText::new("DESCRIPTION").color(theme.text_muted).size(11.0));
            ui.add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_width(f32::INFINITY)
                    .desired_rows(4)
                    .hint_text("What does this block communicate?"),
            );
            ui.add_space(theme.spacing_12);

            let submittable = draft.is_submittable();
            ui.horizontal(|ui| {
                for (index, action) in content.actions.iter().enumerate() {
                    let clicked = if index == 0 {
                        ui.add_enabled(submittable, theme.primary_button(action.label))
                            .clicked()
                    } else {
                        ui.add(theme.subtle_button(action.label)).clicked()
                    };
                    if clicked {
                        emit(action.action.clone());
                    }
                }
            });
        });
    }

    fn render_studio(
        ui: &mut egui::Ui,
        theme: &Theme,
        session: &mut NavigationController,
        forms: &mut FormState,
        emit: &mut dyn FnMut(UiAction),
    ) {
        let studio = session.studio_mut();
        let busy = studio.is_generating();

        ui.horizontal(|ui| {
            for tool in GenerationTool::ALL {
                let selected = studio.tool == tool;
                let button = if selected {
                    theme.primary_button(tool.label())
                } else {
                    theme.subtle_button(tool.label())
                };
                if ui.add(button).clicked() && !selected {
                    emit(UiAction::SelectTool { tool });
                }
            }
        });
        ui.add_space(theme.spacing_16);

        ui.columns(2, |columns| {
            theme.card_frame().show(&mut columns[0], |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("NEURAL PROMPT").color(theme.text_muted).size(11.0));
                ui.add(
                    egui::TextEdit::multiline(&mut studio.prompt)
                        .desired_width(f32::INFINITY)
                        .desired_rows(6)
                        .hint_text("Describe the pattern or aesthetic..."),
                );

                match studio.tool {
                    GenerationTool::Image => {
                        egui::ComboBox::from_id_salt("studio_image_size")
                            .selected_text(studio.image_size.as_str())
                            .show_ui(ui, |ui| {
                                for size in ImageSize::ALL {
                                    ui.selectable_value(&mut studio.image_size, size, size.as_str());
                                }
                            });
                    }
                    GenerationTool::Video => {
                        egui::ComboBox::from_id_salt("studio_aspect_ratio")
                            .selected_text(studio.aspect_ratio.as_str())
                            .show_ui(ui, |ui| {
                                for ratio in AspectRatio::ALL {
                                    ui.selectable_value(&mut studio.aspect_ratio, ratio, ratio.as_str());
                                }
                            });
                    }
                    GenerationTool::Analysis => {
                        ui.label(
                            RichText::new("REFERENCE IMAGE (DATA URI)")
                                .color(theme.text_muted)
                                .size(11.0),
                        );
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut forms.attachment_uri)
                                .desired_width(f32::INFINITY)
                                .hint_text("data:image/png;base64,..."),
                        );
                        if response.changed() {
                            studio.attachment = Attachment::from_data_uri(forms.attachment_uri.trim());
                        }
                        if !forms.attachment_uri.trim().is_empty() && studio.attachment.is_none() {
                            ui.label(
                                RichText::new("Not a base64 data URI; it will not be sent.")
                                    .color(theme.warning)
                                    .size(12.0),
                            );
                        }
                    }
                }

                ui.add_space(theme.spacing_12);
                let ready = !busy && studio.draft_request().is_submittable();
                if ui
                    .add_enabled(ready, theme.primary_button("Execute Generation"))
                    .clicked()
                {
                    emit(UiAction::Generate);
                }

                if studio.tool.requires_credential() {
                    ui.add_space(theme.spacing_8);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            RichText::new(
                                "This tool uses high-quality Gemini models and requires a paid API key.",
                            )
                            .color(theme.accent_primary)
                            .size(11.0),
                        );
                        ui.hyperlink_to("Billing Doc", "https://ai.google.dev/gemini-api/docs/billing");
                    });
                }
            });

            theme.panel_frame(theme.surface_0, theme.spacing_16 as i8).show(&mut columns[1], |ui| {
                ui.set_width(ui.available_width());
                ui.set_min_height(320.0);
                Self::render_studio_output(ui, theme, studio);
            });
        });
    }

    fn render_studio_output(ui: &mut egui::Ui, theme: &Theme, studio: &crate::studio::Studio) {
        if studio.is_generating() {
            ui.vertical_centered(|ui| {
                ui.add_space(theme.spacing_24 * 4.0);
                ui.spinner();
                ui.label(
                    RichText::new("PROCESSING NEURAL REQUEST...")
                        .color(theme.text_muted)
                        .size(12.0),
                );
            });
            return;
        }

        if let Some(error) = studio.last_error() {
            ui.label(RichText::new(error).color(theme.danger).size(13.0));
            ui.add_space(theme.spacing_8);
        }

        match studio.last_result() {
            Some(GenerationResult::Image { data_uri }) => {
                ui.label(RichText::new("RENDERED DESIGN").color(theme.text_muted).size(11.0));
                ui.label(
                    RichText::new(format!("Inline PNG, {} KiB encoded", data_uri.len() / 1024))
                        .color(theme.text_primary),
                );
                if ui.add(theme.subtle_button("Copy data URI")).clicked() {
                    ui.ctx().copy_text(data_uri.clone());
                }
            }
            Some(GenerationResult::Video { uri }) => {
                ui.label(RichText::new("MOTION SEQUENCE").color(theme.text_muted).size(11.0));
                ui.hyperlink_to("Open rendered clip", uri);
            }
            Some(GenerationResult::Text { text }) => {
                egui::ScrollArea::vertical()
                    .id_salt("studio_analysis")
                    .max_height(400.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(text).color(theme.text_primary).size(14.0));
                    });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24 * 4.0);
                    ui.label(
                        RichText::new("AWAITING INFERENCE")
                            .color(theme.text_muted)
                            .size(12.0),
                    );
                });
            }
        }

        if studio.history().len() > 1 {
            ui.add_space(theme.spacing_16);
            ui.label(RichText::new("EARLIER OUTPUT").color(theme.text_muted).size(11.0));
            for result in studio.history().iter().rev().skip(1).take(5) {
                ui.label(RichText::new(result.summary()).color(theme.text_muted).size(12.0));
            }
        }
    }

    /// Placeholder blocks shown while a view is loading.
    pub fn render_skeleton(layout: SkeletonLayout, ui: &mut egui::Ui, theme: &Theme) {
        let pulse = ((ui.input(|input| input.time) * 3.0).sin() as f32) * 0.5 + 0.5;
        let fill = theme.skeleton_fill.gamma_multiply(0.6 + 0.4 * pulse);
        let block = |ui: &mut egui::Ui, height: f32| {
            let size = egui::vec2(ui.available_width(), height);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, egui::CornerRadius::same(theme.radius_12), fill);
        };

        match layout {
            SkeletonLayout::Overview | SkeletonLayout::Default => {
                let tall = if layout == SkeletonLayout::Overview { 400.0 } else { 500.0 };
                ui.columns(4, |columns| {
                    for column in columns.iter_mut() {
                        block(column, 190.0);
                    }
                });
                ui.add_space(theme.spacing_24);
                ui.columns(3, |columns| {
                    block(&mut columns[0], tall);
                    block(&mut columns[1], tall);
                    block(&mut columns[2], tall);
                });
            }
            SkeletonLayout::Table => {
                ui.scope(|ui| {
                    ui.set_max_width(ui.available_width() / 3.0);
                    block(ui, 80.0);
                });
                ui.add_space(theme.spacing_16);
                for _ in 0..6 {
                    block(ui, 64.0);
                }
            }
            SkeletonLayout::Preview => {
                ui.columns(4, |columns| {
                    block(&mut columns[0], 600.0);
                    block(&mut columns[1], 600.0);
                    block(&mut columns[2], 600.0);
                    block(&mut columns[3], 600.0);
                });
            }
            SkeletonLayout::Studio => {
                ui.horizontal(|ui| {
                    for _ in 0..3 {
                        ui.scope(|ui| {
                            ui.set_max_width(160.0);
                            block(ui, 64.0);
                        });
                    }
                });
                ui.add_space(theme.spacing_24);
                ui.columns(2, |columns| {
                    block(&mut columns[0], 500.0);
                    block(&mut columns[1], 500.0);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_identifier_resolves() {
        let identifiers = [
            "",
            " ",
            "overview",
            "cms-edit",
            "CMS",
            "nonexistent-view",
            "../../etc/passwd",
            "ai-studio\n",
            "ünïcödé",
        ];
        for identifier in identifiers {
            let view = View::parse(identifier);
            let strategy = ViewRegistry::resolve(&view);
            for role in Role::ALL {
                let _ = ViewRegistry::resolve_for(role, &view);
            }
            if !view.is_known() {
                assert_eq!(
                    strategy,
                    RenderStrategy::Calibrating {
                        identifier: identifier.to_string()
                    }
                );
            }
        }
    }

    #[test]
    fn known_views_never_calibrate() {
        for identifier in crate::view::KNOWN_IDENTIFIERS {
            let strategy = ViewRegistry::resolve(&View::parse(identifier));
            assert!(
                !matches!(strategy, RenderStrategy::Calibrating { .. }),
                "{identifier} fell back to calibrating"
            );
        }
    }

    #[test]
    fn sidebar_entries_are_within_each_role_scope() {
        for role in Role::ALL {
            for entry in role.navigation() {
                let strategy = ViewRegistry::resolve_for(role, &View::parse(entry.view));
                assert!(
                    !matches!(
                        strategy,
                        RenderStrategy::Restricted { .. } | RenderStrategy::Calibrating { .. }
                    ),
                    "{role} sidebar entry {} is not reachable",
                    entry.view
                );
            }
        }
    }

    #[test]
    fn out_of_scope_view_is_restricted_not_calibrating() {
        let strategy = ViewRegistry::resolve_for(Role::EndClient, &View::Admins);
        assert_eq!(
            strategy,
            RenderStrategy::Restricted {
                view: View::Admins,
                role: Role::EndClient
            }
        );

        let unknown = View::parse("admin-panel");
        assert_eq!(
            ViewRegistry::resolve_for(Role::EndClient, &unknown),
            RenderStrategy::Calibrating {
                identifier: "admin-panel".to_string()
            }
        );
    }

    #[test]
    fn abandoned_edit_text_does_not_return_on_the_next_edit() {
        let mut session = NavigationController::select_role(Role::StandardAdmin);
        let mut forms = FormState::default();

        session.start_edit(2);
        forms.edit_draft(&session).title = "ABANDONED".to_string();
        session.cancel_edit();

        session.start_edit(2);
        assert_eq!(forms.edit_draft(&session).title, "Problem Awareness");
    }

    #[test]
    fn edit_draft_survives_frames_within_one_edit() {
        let mut session = NavigationController::select_role(Role::StandardAdmin);
        let mut forms = FormState::default();

        session.start_edit(3);
        forms.edit_draft(&session).title = "Solution Pitch v2".to_string();
        session.finish_loading(session.loading_ticket());

        assert_eq!(forms.edit_draft(&session).title, "Solution Pitch v2");
    }

    #[test]
    fn descriptions_follow_session_state() {
        let mut session = NavigationController::select_role(Role::StandardAdmin);
        session.start_edit(2);
        let content = RenderStrategy::SectionEditor(EditorMode::Edit).describe(&session);
        assert!(content.lines[0].contains("Problem Awareness"));

        session.toggle_active(1);
        let content = ViewRegistry::resolve(&View::Cms).describe(&session);
        assert!(content.lines[0].contains("5 visible"));

        let restricted = ViewRegistry::resolve_for(Role::EndClient, &View::Security).describe(&session);
        assert!(restricted.lines[0].contains("Security"));
        assert!(restricted.lines[0].contains("End Client"));
    }
}
