use crate::catalog::{Module, ModuleCatalog, ResourceKind, VideoKind};
use crate::chat::{ChatWidget, ReplyTexts, Sender};
use crate::config::RelaySettings;
use crate::navigation::NavigationState;
use crate::relay::RelayRequest;
use crate::theme::Theme;
use eframe::egui::{self, Align, Align2, CornerRadius, Layout, RichText, ScrollArea};
use std::sync::Arc;

const SUGGESTION: &str = "Guardá una nota rápida al terminar cada video: qué salió fácil, qué costó y cuántas repeticiones efectivas hiciste.";
const CHAT_GREETING: &str =
    "¡Hola! Soy tu asistente de Valka. Preguntame algo sobre el módulo actual.";

enum DetailAction {
    Previous,
    Next,
}

/// Course viewer session: module navigation plus its chat widget.
///
/// Created when the course route mounts and dropped when it unmounts, which
/// discards the conversation.
pub struct CourseView {
    navigation: NavigationState,
    chat: ChatWidget,
}

impl CourseView {
    pub fn mount(catalog: Arc<ModuleCatalog>, relay: &RelaySettings) -> Self {
        Self {
            navigation: NavigationState::new(catalog),
            chat: ChatWidget::new(relay.user_id.clone(), ReplyTexts::from(relay)),
        }
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn chat(&self) -> &ChatWidget {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatWidget {
        &mut self.chat
    }

    /// Draws the viewer. Returns a relay request when a chat message was sent
    /// this frame.
    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RelayRequest> {
        self.render_module_list(ctx, theme);
        self.render_detail(ctx, theme);
        self.render_chat_launcher(ctx, theme);
        let request = self.render_chat_window(ctx, theme);

        if self.chat.is_awaiting() {
            // Keeps the typing spinner animating while the reply is pending.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
        request
    }

    fn render_module_list(&mut self, ctx: &egui::Context, theme: &Theme) {
        let mut clicked: Option<String> = None;

        egui::SidePanel::left("module_list")
            .resizable(true)
            .default_width(360.0)
            .frame(theme.page_frame())
            .show(ctx, |ui| {
                ui.label(RichText::new("Módulos").size(18.0).strong());
                ScrollArea::vertical().id_salt("module_rows").show(ui, |ui| {
                    let active = self.navigation.active_index();
                    for (index, module) in self.navigation.catalog().modules().iter().enumerate() {
                        let is_active = active == Some(index);
                        theme.card_frame(is_active).show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            let title = RichText::new(format!("{}  {}", index + 1, module.title))
                                .color(if is_active {
                                    theme.accent_soft
                                } else {
                                    theme.text_primary
                                });
                            if ui.selectable_label(is_active, title).clicked() {
                                clicked = Some(module.id.clone());
                            }
                            if let Some(minutes) = module.duration_minutes {
                                ui.label(
                                    RichText::new(format!("{minutes} min"))
                                        .small()
                                        .color(theme.text_muted),
                                );
                            }
                        });
                    }
                });
            });

        if let Some(id) = clicked {
            self.navigation.select(&id);
        }
    }

    fn render_detail(&mut self, ctx: &egui::Context, theme: &Theme) {
        let mut action = None;

        egui::CentralPanel::default()
            .frame(theme.page_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("module_detail").show(ui, |ui| {
                    let Some(module) = self.navigation.active() else {
                        theme.card_frame(false).show(ui, |ui| {
                            ui.label(
                                RichText::new("Selecciona un módulo para ver el contenido.")
                                    .color(theme.text_muted),
                            );
                        });
                        return;
                    };

                    theme.detail_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        render_module_body(ui, theme, module);

                        ui.add_space(theme.spacing_16);
                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!self.navigation.is_first(), egui::Button::new("Anterior"))
                                .clicked()
                            {
                                action = Some(DetailAction::Previous);
                            }
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui
                                    .add_enabled(
                                        !self.navigation.is_last(),
                                        theme.primary_button("Siguiente"),
                                    )
                                    .clicked()
                                {
                                    action = Some(DetailAction::Next);
                                }
                            });
                        });

                        ui.add_space(theme.spacing_24);
                        ui.columns(2, |columns| {
                            let percent = self.navigation.percent_complete();
                            columns[0].label(RichText::new("PROGRESO").small().color(theme.text_muted));
                            columns[0].add_space(theme.spacing_8);
                            columns[0].add(
                                egui::ProgressBar::new(f32::from(percent) / 100.0)
                                    .fill(theme.accent_primary)
                                    .desired_height(8.0),
                            );
                            columns[0].label(
                                RichText::new(format!("{percent}% completado"))
                                    .small()
                                    .color(theme.text_muted),
                            );

                            columns[1].label(RichText::new("SUGERENCIA").small().color(theme.text_muted));
                            theme.card_frame(false).show(&mut columns[1], |ui| {
                                ui.label(RichText::new(SUGGESTION).color(theme.text_body));
                            });
                        });
                    });
                });
            });

        match action {
            Some(DetailAction::Previous) => self.navigation.previous(),
            Some(DetailAction::Next) => self.navigation.next(),
            None => {}
        }
    }

    fn render_chat_launcher(&mut self, ctx: &egui::Context, theme: &Theme) {
        egui::Area::new(egui::Id::new("chat_launcher"))
            .anchor(Align2::RIGHT_BOTTOM, [-24.0, -24.0])
            .show(ctx, |ui| {
                let button = egui::Button::new(RichText::new("🤖").size(24.0).color(theme.accent_soft))
                    .min_size(egui::vec2(56.0, 56.0))
                    .corner_radius(CornerRadius::same(28));
                if ui.add(button).on_hover_text("Abrir asistente").clicked() {
                    self.chat.set_open(true);
                }
            });
    }

    fn render_chat_window(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<RelayRequest> {
        if !self.chat.is_open() {
            return None;
        }

        let mut open = true;
        let mut send_now = false;

        egui::Window::new("Asistente Valka")
            .open(&mut open)
            .anchor(Align2::RIGHT_BOTTOM, [-24.0, -96.0])
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("chat_log")
                    .max_height(256.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        if self.chat.log().is_empty() {
                            ui.vertical_centered(|ui| {
                                ui.add_space(theme.spacing_24);
                                ui.label(RichText::new(CHAT_GREETING).color(theme.text_muted));
                            });
                        }

                        for message in self.chat.log().messages() {
                            let (align, fill, color) = match message.sender {
                                Sender::User => (Align::Max, theme.accent_primary, theme.text_primary),
                                Sender::Assistant => (Align::Min, theme.surface_2, theme.text_body),
                            };
                            ui.with_layout(Layout::top_down(align), |ui| {
                                theme.bubble_frame(fill).show(ui, |ui| {
                                    ui.set_max_width(260.0);
                                    ui.label(RichText::new(&message.text).color(color));
                                });
                            });
                        }

                        if self.chat.is_awaiting() {
                            theme.bubble_frame(theme.surface_2).show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.spinner();
                                    ui.label(RichText::new("Escribiendo...").color(theme.text_body));
                                });
                            });
                        }
                    });

                ui.separator();
                let input_enabled = !self.chat.is_awaiting();
                ui.horizontal(|ui| {
                    let input_width = (ui.available_width() - 90.0).max(120.0);
                    let response = ui.add_enabled(
                        input_enabled,
                        egui::TextEdit::singleline(self.chat.input_mut())
                            .desired_width(input_width)
                            .hint_text("Escribe tu pregunta..."),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }

                    let clicked = ui
                        .add_enabled(self.chat.can_submit(), theme.primary_button("Enviar"))
                        .clicked();
                    send_now |= clicked;
                });
            });

        if !open {
            self.chat.set_open(false);
        }

        if send_now {
            self.chat.submit(self.navigation.active())
        } else {
            None
        }
    }
}

fn render_module_body(ui: &mut egui::Ui, theme: &Theme, module: &Module) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("✔").color(theme.accent_soft));
        ui.label(RichText::new(&module.title).size(18.0).strong());
        if let Some(minutes) = module.duration_minutes {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(format!("{minutes} min")).small().color(theme.text_muted));
            });
        }
    });

    ui.add_space(theme.spacing_12);
    theme.card_frame(false).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let kind = match module.video.kind() {
            VideoKind::EmbeddedStream => "Video en streaming",
            VideoKind::File => "Archivo de video",
        };
        ui.label(RichText::new(kind).small().color(theme.text_muted));
        ui.hyperlink_to(RichText::new("▶ Ver video").size(16.0), module.video.url());
    });

    if module.summary.is_some() || module.body.is_some() {
        ui.add_space(theme.spacing_12);
        if let Some(summary) = &module.summary {
            ui.label(RichText::new(summary).strong().color(theme.text_primary));
        }
        if let Some(body) = &module.body {
            ui.label(RichText::new(body).color(theme.text_body));
        }
    }

    if !module.resources.is_empty() {
        ui.add_space(theme.spacing_12);
        ui.label(RichText::new("RECURSOS").small().color(theme.text_muted));
        ui.horizontal_wrapped(|ui| {
            for resource in &module.resources {
                let icon = match resource.kind {
                    ResourceKind::Document => "📄",
                    ResourceKind::Spreadsheet => "📊",
                };
                ui.hyperlink_to(format!("{icon} {}", resource.label), &resource.href);
            }
        });
    }
}
