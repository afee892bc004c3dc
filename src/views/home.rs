use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};

const FEATURES: [(&str, &str); 3] = [
    (
        "TÉCNICA PERFECTA",
        "Aprende la forma correcta desde el primer día. Evita lesiones y maximiza resultados.",
    ),
    (
        "PROGRESO REAL",
        "Sistema probado de progresión gradual. Ve resultados desde la primera semana.",
    ),
    (
        "SIN EQUIPOS",
        "Solo necesitas tu cuerpo. Entrena en casa, en el parque, donde quieras.",
    ),
];

/// Renders the landing page. Returns true when the course call to action was
/// clicked.
pub fn show(ctx: &egui::Context, theme: &Theme) -> bool {
    let mut open_courses = false;

    egui::CentralPanel::default()
        .frame(theme.page_frame())
        .show(ctx, |ui| {
            ScrollArea::vertical().id_salt("home_page").show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24 * 3.0);
                    ui.label(RichText::new("APRENDE A").size(56.0).strong());
                    ui.label(
                        RichText::new("ENTRENAR")
                            .size(56.0)
                            .strong()
                            .color(theme.accent_hover),
                    );
                    ui.add_space(theme.spacing_16);
                    ui.label(
                        RichText::new(
                            "Domina los fundamentos del entrenamiento de calistenia y desarrollo personal",
                        )
                        .size(18.0)
                        .color(theme.text_body),
                    );
                    ui.add_space(theme.spacing_24);
                    if ui.add(theme.primary_button("CURSOS")).clicked() {
                        open_courses = true;
                    }
                    ui.add_space(theme.spacing_24 * 4.0);
                    ui.label(RichText::new("¿POR QUÉ VALKA?").size(28.0).strong());
                    ui.add_space(theme.spacing_16);
                });

                ui.columns(FEATURES.len(), |columns| {
                    for (column, (title, text)) in columns.iter_mut().zip(FEATURES) {
                        theme.card_frame(false).show(column, |ui| {
                            ui.set_min_height(120.0);
                            ui.label(RichText::new(title).size(20.0).strong());
                            ui.label(RichText::new(text).color(theme.text_muted));
                        });
                    }
                });
            });
        });

    open_courses
}
