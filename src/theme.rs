use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, RichText, Stroke, TextStyle};

/// Slate surfaces with a blue accent.
#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_deep: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub danger_tint: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub skeleton_fill: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub radius_24: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x02, 0x06, 0x17),
            surface_1: Color32::from_rgb(0x0B, 0x11, 0x22),
            surface_2: Color32::from_rgb(0x0F, 0x17, 0x2A),
            surface_3: Color32::from_rgb(0x1E, 0x29, 0x3B),
            accent_primary: Color32::from_rgb(0x25, 0x63, 0xEB),
            accent_deep: Color32::from_rgb(0x1E, 0x40, 0xAF),
            success: Color32::from_rgb(0x34, 0xD3, 0x99),
            warning: Color32::from_rgb(0xF5, 0x9E, 0x0B),
            danger: Color32::from_rgb(0xEF, 0x44, 0x44),
            danger_tint: Color32::from_rgba_premultiplied(0x3B, 0x11, 0x11, 90),
            text_primary: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            text_muted: Color32::from_rgb(0x64, 0x74, 0x8B),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            skeleton_fill: Color32::from_rgb(0x1E, 0x29, 0x3B),
            spacing_4: 4.0,
            spacing_8: Self::P8,
            spacing_12: 12.0,
            spacing_16: Self::P16,
            spacing_24: Self::P24,
            radius_8: 8,
            radius_12: Self::R12,
            radius_24: Self::R24,
            button_height: 36.0,
        }
    }
}

impl Theme {
    pub const R12: u8 = 12;
    pub const R24: u8 = 24;
    pub const P8: f32 = 8.0;
    pub const P16: f32 = 16.0;
    pub const P24: f32 = 24.0;

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_1;
        visuals.extreme_bg_color = self.surface_3;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        visuals.widgets.noninteractive.bg_fill = self.surface_2;
        visuals.widgets.noninteractive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.bg_fill = self.surface_3;
        visuals.widgets.inactive.weak_bg_fill = self.surface_3;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.accent_deep;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent_primary);
        visuals.widgets.active.bg_fill = self.accent_primary;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_deep;
        visuals.selection.stroke = Stroke::new(1.0, self.accent_primary);
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_2;
        visuals.window_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.window_corner_radius = CornerRadius::same(self.radius_24);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: [0, 12],
            blur: 32,
            spread: 0,
            color: Color32::from_rgba_premultiplied(0, 0, 0, 110),
        };

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(14.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(30.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(12.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_24))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_2, self.spacing_24 as i8)
    }

    /// Accent-filled card used for promotional panels.
    pub fn hero_frame(&self) -> Frame {
        self.panel_frame(self.accent_primary, self.spacing_24 as i8)
            .stroke(Stroke::NONE)
    }

    pub fn primary_button(&self, label: &str) -> egui::Button<'static> {
        self.button(label, self.accent_primary, Stroke::NONE, self.text_on_accent)
    }

    pub fn subtle_button(&self, label: &str) -> egui::Button<'static> {
        self.button(
            label,
            self.surface_3,
            Stroke::new(1.0, self.border_subtle),
            self.text_primary,
        )
    }

    pub fn danger_button(&self, label: &str) -> egui::Button<'static> {
        self.button(label, self.danger_tint, Stroke::NONE, self.danger)
    }

    fn button(&self, label: &str, fill: Color32, stroke: Stroke, text: Color32) -> egui::Button<'static> {
        egui::Button::new(RichText::new(label.to_uppercase()).color(text).size(12.0).strong())
            .fill(fill)
            .stroke(stroke)
            .corner_radius(CornerRadius::same(self.radius_12))
            .min_size(egui::vec2(0.0, self.button_height))
    }
}
