use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

/// Zinc surfaces with violet accents.
#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_hover: Color32,
    pub accent_soft: Color32,
    pub text_primary: Color32,
    pub text_body: Color32,
    pub text_muted: Color32,
    pub border_subtle: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub radius_16: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x09, 0x09, 0x0B),
            surface_1: Color32::from_rgb(0x18, 0x18, 0x1B),
            surface_2: Color32::from_rgb(0x27, 0x27, 0x2A),
            surface_3: Color32::from_rgb(0x3F, 0x3F, 0x46),
            accent_primary: Color32::from_rgb(0x7C, 0x3A, 0xED),
            accent_hover: Color32::from_rgb(0x8B, 0x5C, 0xF6),
            accent_soft: Color32::from_rgb(0xC4, 0xB5, 0xFD),
            text_primary: Color32::from_rgb(0xFA, 0xFA, 0xFA),
            text_body: Color32::from_rgb(0xD4, 0xD4, 0xD8),
            text_muted: Color32::from_rgb(0xA1, 0xA1, 0xAA),
            border_subtle: Color32::from_rgb(0x27, 0x27, 0x2A),
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            spacing_24: 24.0,
            radius_8: 8,
            radius_12: 12,
            radius_16: 16,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_1;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_1;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.surface_3);
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.weak_bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent_soft);
        visuals.widgets.active.bg_fill = self.accent_primary;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_primary;
        visuals.selection.stroke = Stroke::new(1.0, self.accent_soft);
        visuals.hyperlink_color = self.accent_soft;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.window_corner_radius = CornerRadius::same(self.radius_16);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: [0, 16],
            blur: 48,
            spread: 0,
            color: Color32::from_rgba_premultiplied(0, 0, 0, 150),
        };
        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(16.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(18.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Button, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self, highlighted: bool) -> Frame {
        let stroke = if highlighted {
            Stroke::new(1.0, self.accent_hover.gamma_multiply(0.5))
        } else {
            Stroke::new(1.0, self.border_subtle)
        };
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(self.spacing_16 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(stroke)
    }

    pub fn detail_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(self.spacing_24 as i8))
            .corner_radius(CornerRadius::same(self.radius_16))
            .stroke(Stroke::new(1.0, self.border_subtle))
            .shadow(egui::epaint::Shadow {
                offset: [0, 8],
                blur: 36,
                spread: 0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 96),
            })
    }

    pub fn bubble_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn bar_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_0)
            .inner_margin(Margin::symmetric(self.spacing_16 as i8, self.spacing_12 as i8))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn page_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_0)
            .inner_margin(Margin::same(self.spacing_24 as i8))
    }

    pub fn primary_button(&self, label: &str) -> egui::Button<'static> {
        egui::Button::new(
            egui::RichText::new(label.to_string())
                .color(self.text_primary)
                .strong(),
        )
        .fill(self.accent_primary)
        .corner_radius(CornerRadius::same(self.radius_8))
    }
}
