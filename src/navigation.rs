//! Session state and its transition function.
//!
//! A [`NavigationController`] exists exactly as long as a role session: the
//! portal creates one with [`NavigationController::select_role`] and logout
//! hands it back to [`NavigationController::end_session`]. Every transition
//! is synchronous and total, and after each one the controller holds
//! `editing().is_some() == (current_view() == &View::CmsEdit)`.

use crate::role::Role;
use crate::session::{seed_sections, ContentSection, SectionDraft};
use crate::studio::Studio;
use crate::view::View;
use std::time::Duration;
use tracing::{debug, info};

/// How long the skeleton stays up after entering a view.
pub const LOADING_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug)]
pub struct NavigationController {
    role: Role,
    current_view: View,
    editing: Option<ContentSection>,
    sections: Vec<ContentSection>,
    last_issued_id: u64,
    loading_ticket: u64,
    loading: bool,
    studio: Studio,
}

impl NavigationController {
    /// Starts a session for `role` on the overview, with the seed sections
    /// and the overview skeleton pending.
    pub fn select_role(role: Role) -> Self {
        info!(%role, "session started");
        let sections = seed_sections();
        let last_issued_id = sections.iter().map(|section| section.id).max().unwrap_or(0);
        let mut controller = Self {
            role,
            current_view: View::Overview,
            editing: None,
            sections,
            last_issued_id,
            loading_ticket: 0,
            loading: false,
            studio: Studio::default(),
        };
        controller.enter(View::Overview);
        controller
    }

    /// Discards the session. Pending timers and generation tasks are owned by
    /// the host and must be torn down alongside.
    pub fn end_session(self) {
        info!(
            role = %self.role,
            view = %self.current_view,
            sections = self.sections.len(),
            generating = self.studio.is_generating(),
            "session ended"
        );
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn current_view(&self) -> &View {
        &self.current_view
    }

    pub fn sections(&self) -> &[ContentSection] {
        &self.sections
    }

    pub fn section(&self, id: u64) -> Option<&ContentSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn editing(&self) -> Option<&ContentSection> {
        self.editing.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Ticket of the most recent view entry. The host's timer hands it back
    /// to [`NavigationController::finish_loading`].
    pub fn loading_ticket(&self) -> u64 {
        self.loading_ticket
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn studio_mut(&mut self) -> &mut Studio {
        &mut self.studio
    }

    /// Every view entry, including re-entering the current view, restarts
    /// the loading gate.
    fn enter(&mut self, view: View) {
        if view != View::CmsEdit {
            self.editing = None;
        }
        debug!(from = %self.current_view, to = %view, "view entered");
        self.current_view = view;
        self.loading_ticket += 1;
        self.loading = true;
    }

    /// Navigates to `view`. Leaving the edit sub-view drops the editing
    /// context; asking for the edit sub-view without one lands on the CMS.
    pub fn go_to(&mut self, view: impl Into<View>) {
        let view = view.into();
        let view = if view == View::CmsEdit && self.editing.is_none() {
            View::Cms
        } else {
            view
        };
        self.enter(view);
    }

    /// Opens section `id` in the edit sub-view. Unknown ids are ignored.
    pub fn start_edit(&mut self, id: u64) -> bool {
        let Some(section) = self.section(id).cloned() else {
            debug!(id, "edit requested for unknown section");
            return false;
        };
        self.editing = Some(section);
        self.enter(View::CmsEdit);
        true
    }

    /// Writes `draft` into the section under edit and returns to the CMS.
    /// A section removed meanwhile is appended again.
    pub fn commit_edit(&mut self, draft: SectionDraft) -> bool {
        let Some(mut edited) = self.editing.take() else {
            return false;
        };
        edited.apply(draft);

        match self.sections.iter_mut().find(|section| section.id == edited.id) {
            Some(slot) => *slot = edited,
            None => self.sections.push(edited),
        }
        self.enter(View::Cms);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.enter(View::Cms);
    }

    /// Flips `is_active` on section `id`; the view is unchanged.
    pub fn toggle_active(&mut self, id: u64) -> bool {
        match self.sections.iter_mut().find(|section| section.id == id) {
            Some(section) => {
                section.is_active = !section.is_active;
                true
            }
            None => false,
        }
    }

    /// Removes section `id` if `confirm` agrees. Declining changes nothing.
    pub fn delete_section(
        &mut self,
        id: u64,
        confirm: impl FnOnce(&ContentSection) -> bool,
    ) -> bool {
        let Some(index) = self.sections.iter().position(|section| section.id == id) else {
            return false;
        };
        if !confirm(&self.sections[index]) {
            debug!(id, "section deletion declined");
            return false;
        }

        self.sections.remove(index);
        if self.editing.as_ref().is_some_and(|section| section.id == id) {
            self.cancel_edit();
        }
        info!(id, "section deleted");
        true
    }

    /// Appends an active section built from `draft` and returns its id.
    /// Drafts without a title are rejected.
    pub fn add_section(&mut self, draft: SectionDraft) -> Option<u64> {
        if !draft.is_submittable() {
            return None;
        }

        let highest = self.sections.iter().map(|section| section.id).max().unwrap_or(0);
        let id = highest.max(self.last_issued_id) + 1;
        self.last_issued_id = id;
        self.sections.push(ContentSection {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            is_active: true,
        });
        info!(id, "section added");
        self.enter(View::Cms);
        Some(id)
    }

    /// Returns to the parent of the current sub-view, or the overview.
    pub fn back(&mut self) {
        let target = self.current_view.parent().unwrap_or_default();
        if self.current_view == View::CmsEdit {
            self.editing = None;
        }
        self.go_to(target);
    }

    /// Ends the loading gate if `ticket` belongs to the latest view entry.
    pub fn finish_loading(&mut self, ticket: u64) -> bool {
        if ticket != self.loading_ticket || !self.loading {
            return false;
        }
        self.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GenerationResult;
    use crate::ui::registry::{RenderStrategy, ViewRegistry};

    fn holds_edit_invariant(controller: &NavigationController) -> bool {
        controller.editing().is_some() == (controller.current_view() == &View::CmsEdit)
    }

    #[test]
    fn session_starts_on_overview_with_loading_pending() {
        let controller = NavigationController::select_role(Role::StandardAdmin);
        assert_eq!(controller.current_view(), &View::Overview);
        assert!(controller.editing().is_none());
        assert!(controller.is_loading());
        assert_eq!(controller.sections().len(), 6);
    }

    fn step(controller: &mut NavigationController, action: impl FnOnce(&mut NavigationController)) {
        action(controller);
        assert!(
            holds_edit_invariant(controller),
            "invariant broken at view {}",
            controller.current_view()
        );
    }

    #[test]
    fn edit_invariant_holds_across_transition_sequence() {
        let mut controller = NavigationController::select_role(Role::SystemOwner);
        assert!(holds_edit_invariant(&controller));

        step(&mut controller, |c| c.go_to("cms"));
        step(&mut controller, |c| {
            c.start_edit(3);
        });
        step(&mut controller, |c| c.go_to("cms-edit"));
        step(&mut controller, |c| {
            c.toggle_active(3);
        });
        step(&mut controller, |c| c.go_to("metrics"));
        step(&mut controller, |c| c.go_to("cms-edit"));
        step(&mut controller, |c| {
            c.start_edit(2);
        });
        step(&mut controller, |c| {
            c.commit_edit(SectionDraft::new("Problem Awareness v2", "Sharper copy"));
        });
        step(&mut controller, |c| {
            c.start_edit(4);
        });
        step(&mut controller, |c| c.back());
        step(&mut controller, |c| {
            c.start_edit(1);
        });
        step(&mut controller, |c| {
            c.delete_section(1, |_| true);
        });
        step(&mut controller, |c| {
            c.add_section(SectionDraft::new("Testimonials", "Social proof"));
        });
        step(&mut controller, |c| {
            c.start_edit(999);
        });
        step(&mut controller, |c| c.cancel_edit());
        step(&mut controller, |c| {
            c.commit_edit(SectionDraft::new("ignored", ""));
        });
        step(&mut controller, |c| c.go_to(""));
        assert_eq!(controller.current_view(), &View::Unknown(String::new()));
    }

    #[test]
    fn go_to_cms_edit_without_context_lands_on_cms() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.go_to("cms-edit");
        assert_eq!(controller.current_view(), &View::Cms);
        assert!(controller.editing().is_none());
    }

    #[test]
    fn leaving_edit_view_clears_context() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        assert!(controller.start_edit(2));
        controller.go_to("cms-edit");
        assert_eq!(controller.editing().map(|section| section.id), Some(2));

        controller.go_to("reports");
        assert!(controller.editing().is_none());
    }

    #[test]
    fn add_section_yields_one_active_section_with_fresh_id() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.go_to("cms-add");
        let before: Vec<u64> = controller.sections().iter().map(|section| section.id).collect();

        let id = controller
            .add_section(SectionDraft::new("T", "D"))
            .expect("titled draft is accepted");

        assert!(!before.contains(&id));
        assert_eq!(controller.sections().len(), before.len() + 1);
        let added: Vec<&ContentSection> = controller
            .sections()
            .iter()
            .filter(|section| section.id == id)
            .collect();
        assert_eq!(added.len(), 1);
        assert!(added[0].is_active);
        assert_eq!(added[0].title, "T");
        assert_eq!(added[0].description, "D");
        assert_eq!(controller.current_view(), &View::Cms);
    }

    #[test]
    fn ids_are_never_reissued_after_delete() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        let first = controller
            .add_section(SectionDraft::new("Testimonials", ""))
            .expect("add");
        assert!(controller.delete_section(first, |_| true));
        let second = controller
            .add_section(SectionDraft::new("FAQ", ""))
            .expect("add");
        assert_ne!(first, second);
    }

    #[test]
    fn untitled_draft_is_rejected() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.go_to("cms-add");
        assert!(controller.add_section(SectionDraft::new("  ", "body")).is_none());
        assert_eq!(controller.sections().len(), 6);
        assert_eq!(controller.current_view(), &View::CmsAdd);
    }

    #[test]
    fn toggle_active_is_an_involution() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.go_to("cms");
        let original = controller.sections().to_vec();

        assert!(controller.toggle_active(4));
        assert_ne!(controller.sections(), original.as_slice());
        assert!(controller.toggle_active(4));

        assert_eq!(controller.sections(), original.as_slice());
        assert_eq!(controller.current_view(), &View::Cms);
    }

    #[test]
    fn declined_delete_leaves_collection_unchanged() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        let original = controller.sections().to_vec();
        let mut asked = None;

        let deleted = controller.delete_section(3, |section| {
            asked = Some(section.title.clone());
            false
        });

        assert!(!deleted);
        assert_eq!(asked.as_deref(), Some("Solution Pitch"));
        assert_eq!(controller.sections(), original.as_slice());
    }

    #[test]
    fn accepted_delete_removes_exactly_that_section() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        let mut expected = controller.sections().to_vec();
        expected.retain(|section| section.id != 3);

        assert!(controller.delete_section(3, |_| true));
        assert_eq!(controller.sections(), expected.as_slice());
        assert!(!controller.delete_section(3, |_| true));
    }

    #[test]
    fn deleting_the_section_under_edit_cancels_the_edit() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.start_edit(5);
        assert!(controller.delete_section(5, |_| true));
        assert!(controller.editing().is_none());
        assert_eq!(controller.current_view(), &View::Cms);
    }

    #[test]
    fn start_edit_then_cancel_keeps_section_intact() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        let original = controller.section(5).cloned().expect("seed section 5");

        assert!(controller.start_edit(5));
        assert_eq!(controller.current_view(), &View::CmsEdit);
        controller.cancel_edit();

        assert!(controller.editing().is_none());
        assert_eq!(controller.current_view(), &View::Cms);
        assert_eq!(controller.section(5), Some(&original));
    }

    #[test]
    fn commit_edit_replaces_in_place() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.start_edit(2);
        assert!(controller.commit_edit(SectionDraft::new("Pain Points", "Why tape measures fail")));

        let ids: Vec<u64> = controller.sections().iter().map(|section| section.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        let edited = controller.section(2).expect("still present");
        assert_eq!(edited.title, "Pain Points");
        assert!(edited.is_active);
        assert!(controller.editing().is_none());
        assert_eq!(controller.current_view(), &View::Cms);
    }

    #[test]
    fn commit_without_context_is_a_no_op() {
        let mut controller = NavigationController::select_role(Role::StandardAdmin);
        controller.go_to("clients");
        assert!(!controller.commit_edit(SectionDraft::new("Orphan", "")));
        assert_eq!(controller.current_view(), &View::Clients);
        assert_eq!(controller.sections().len(), 6);
    }

    #[test]
    fn unknown_view_degrades_to_calibrating_for_end_client() {
        let mut controller = NavigationController::select_role(Role::EndClient);
        assert_eq!(controller.current_view(), &View::Overview);

        controller.go_to("nonexistent-view");

        assert_eq!(controller.current_view().as_str(), "nonexistent-view");
        let strategy = ViewRegistry::resolve_for(controller.role(), controller.current_view());
        assert_eq!(
            strategy,
            RenderStrategy::Calibrating {
                identifier: "nonexistent-view".to_string()
            }
        );
        let content = strategy.describe(&controller);
        assert!(content.lines.iter().any(|line| line.contains("nonexistent-view")));
    }

    #[test]
    fn back_follows_parent_or_falls_back_to_overview() {
        let mut controller = NavigationController::select_role(Role::ProfessionalTailor);
        controller.go_to("pdf-viewer");
        controller.back();
        assert_eq!(controller.current_view(), &View::Measurements);
        controller.back();
        assert_eq!(controller.current_view(), &View::Overview);
    }

    #[test]
    fn only_the_latest_loading_ticket_finishes_loading() {
        let mut controller = NavigationController::select_role(Role::EndClient);
        let stale = controller.loading_ticket();
        controller.go_to("orders");
        let current = controller.loading_ticket();
        assert_ne!(stale, current);

        assert!(!controller.finish_loading(stale));
        assert!(controller.is_loading());
        assert!(controller.finish_loading(current));
        assert!(!controller.is_loading());

        controller.go_to("orders");
        assert!(controller.is_loading());
        assert!(controller.loading_ticket() > current);
    }

    #[test]
    fn generation_survives_navigation() {
        let mut controller = NavigationController::select_role(Role::ProfessionalTailor);
        controller.go_to("ai-studio");
        controller.studio_mut().prompt = "double-breasted blazer".to_string();
        let (ticket, _) = controller.studio_mut().submit().expect("submit");

        controller.go_to("clients");
        assert!(controller.studio().is_generating());

        let result = GenerationResult::Image {
            data_uri: "data:image/png;base64,AAAA".to_string(),
        };
        assert!(controller.studio_mut().settle(ticket, Ok(Some(result.clone()))));
        assert_eq!(controller.studio().last_result(), Some(&result));
    }
}
