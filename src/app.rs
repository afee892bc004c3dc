use crate::catalog::ModuleCatalog;
use crate::config::Settings;
use crate::event::AppEvent;
use crate::relay::RelayClient;
use crate::route::{NavigationTokens, Route, RouteSelector};
use crate::theme::Theme;
use crate::views::{self, CourseView};
use eframe::egui::{self, Align, Layout, RichText};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ValkaApp {
    rx: Receiver<AppEvent>,
    relay: RelayClient,
    shell: Shell,
    theme: Theme,
}

impl ValkaApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        relay: RelayClient,
        catalog: Arc<ModuleCatalog>,
        settings: Settings,
        initial_token: &str,
    ) -> Self {
        Self {
            rx,
            relay,
            shell: Shell::new(catalog, settings, initial_token),
            theme: Theme::default(),
        }
    }

    /// Hooks the app to the window's egui context once it exists.
    pub fn attach_context(&mut self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
        self.relay.attach_repaint(ctx.clone());
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.shell.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, route: Route) {
        let theme = &self.theme;
        let shell = &self.shell;
        egui::TopBottomPanel::top("top_bar")
            .frame(theme.bar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .link(RichText::new("VALKA").size(22.0).strong().color(theme.text_primary))
                        .clicked()
                    {
                        shell.navigate_home();
                    }
                    ui.label(
                        RichText::new("APRENDE A ENTRENAR")
                            .small()
                            .color(theme.text_muted),
                    );

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| match route {
                        Route::Home => {
                            if ui.link(RichText::new("CURSOS").size(16.0)).clicked() {
                                shell.navigate_courses();
                            }
                        }
                        Route::CourseList => {
                            ui.label(RichText::new("CURSOS (ACTUAL)").color(theme.text_muted));
                            if ui.link(RichText::new("HOME").size(16.0)).clicked() {
                                shell.navigate_home();
                            }
                        }
                    });
                });
            });
    }
}

impl eframe::App for ValkaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        let route = self.shell.sync_route();
        self.render_top_bar(ctx, route);

        match self.shell.course.as_mut() {
            Some(course) => {
                if let Some(request) = course.show(ctx, &self.theme) {
                    self.relay.dispatch(request);
                }
            }
            None => {
                if views::home::show(ctx, &self.theme) {
                    self.shell.navigate_courses();
                }
            }
        }
    }
}

/// Route-driven view state, independent of egui and the runtime.
struct Shell {
    catalog: Arc<ModuleCatalog>,
    settings: Settings,
    tokens: NavigationTokens,
    route: RouteSelector,
    course: Option<CourseView>,
}

impl Shell {
    fn new(catalog: Arc<ModuleCatalog>, settings: Settings, initial_token: &str) -> Self {
        let tokens = NavigationTokens::new(initial_token);
        let route = tokens.subscribe(settings.navigation.course_token.clone());
        let mut shell = Self {
            catalog,
            settings,
            tokens,
            route,
            course: None,
        };
        shell.sync_route();
        shell
    }

    fn navigate_home(&self) {
        self.tokens.navigate("");
    }

    fn navigate_courses(&self) {
        self.tokens.navigate(&self.settings.navigation.course_token);
    }

    /// Mounts or unmounts the course view to match the latest token.
    fn sync_route(&mut self) -> Route {
        let route = self.route.current();
        match (route, self.course.is_some()) {
            (Route::CourseList, false) => {
                let course = CourseView::mount(Arc::clone(&self.catalog), &self.settings.relay);
                info!(
                    modules = self.catalog.len(),
                    active = ?course.navigation().active_id(),
                    "Mounting course view"
                );
                self.course = Some(course);
            }
            (Route::Home, true) => {
                if let Some(course) = self.course.take() {
                    info!(
                        widget_id = %course.chat().id(),
                        messages = course.chat().log().len(),
                        pending = course.chat().is_awaiting(),
                        "Unmounting course view"
                    );
                }
            }
            _ => {}
        }
        route
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RelayCompleted {
                widget_id,
                request_id,
                outcome,
            } => {
                let Some(course) = self.course.as_mut() else {
                    debug!(%widget_id, %request_id, "discarding relay outcome after teardown");
                    return;
                };
                if course.chat().id() != widget_id {
                    debug!(%widget_id, %request_id, "discarding relay outcome for a previous chat");
                    return;
                }
                course.chat_mut().resolve(request_id, outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use crate::relay::RelayError;

    fn shell(initial_token: &str) -> Shell {
        let catalog = Arc::new(ModuleCatalog::builtin().expect("builtin catalog should load"));
        Shell::new(catalog, Settings::default(), initial_token)
    }

    fn send_from_course(shell: &mut Shell, text: &str) -> (uuid::Uuid, uuid::Uuid) {
        let course = shell.course.as_mut().expect("course view should be mounted");
        *course.chat_mut().input_mut() = text.to_string();
        let active = course.navigation().active().cloned();
        let request = course
            .chat_mut()
            .submit(active.as_ref())
            .expect("submission should be accepted");
        (request.widget_id, request.request_id)
    }

    #[test]
    fn starts_on_home_without_course_view() {
        let mut shell = shell("");
        assert_eq!(shell.sync_route(), Route::Home);
        assert!(shell.course.is_none());
    }

    #[test]
    fn initial_course_token_mounts_course_view() {
        let shell = shell("#cursos");
        let course = shell.course.as_ref().expect("course view should be mounted");
        assert_eq!(course.navigation().active_id(), Some("mod-1"));
    }

    #[test]
    fn navigation_mounts_and_unmounts_course_view() {
        let mut shell = shell("");
        shell.navigate_courses();
        assert_eq!(shell.sync_route(), Route::CourseList);
        assert!(shell.course.is_some());

        shell.navigate_home();
        assert_eq!(shell.sync_route(), Route::Home);
        assert!(shell.course.is_none());
    }

    #[test]
    fn unknown_token_stays_home() {
        let mut shell = shell("");
        shell.tokens.navigate("precios");
        assert_eq!(shell.sync_route(), Route::Home);
        assert!(shell.course.is_none());
    }

    #[test]
    fn relay_outcome_reaches_live_chat() {
        let mut shell = shell("cursos");
        let (widget_id, request_id) = send_from_course(&mut shell, "Hola");

        shell.apply_event(AppEvent::RelayCompleted {
            widget_id,
            request_id,
            outcome: Ok(Some("¡Hola!".to_string())),
        });

        let course = shell.course.as_ref().expect("course view should be mounted");
        let log: Vec<_> = course
            .chat()
            .log()
            .messages()
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect();
        assert_eq!(
            log,
            vec![
                (Sender::User, "Hola".to_string()),
                (Sender::Assistant, "¡Hola!".to_string())
            ]
        );
        assert!(!course.chat().is_awaiting());
    }

    #[test]
    fn late_outcome_after_teardown_is_discarded() {
        let mut shell = shell("cursos");
        let (widget_id, request_id) = send_from_course(&mut shell, "Hola");

        shell.navigate_home();
        shell.sync_route();
        shell.apply_event(AppEvent::RelayCompleted {
            widget_id,
            request_id,
            outcome: Err(RelayError::Status { status: 502 }),
        });
        assert!(shell.course.is_none());

        shell.navigate_courses();
        shell.sync_route();
        shell.apply_event(AppEvent::RelayCompleted {
            widget_id,
            request_id,
            outcome: Ok(Some("tarde".to_string())),
        });

        let course = shell.course.as_ref().expect("course view should be remounted");
        assert!(course.chat().log().is_empty());
        assert_ne!(course.chat().id(), widget_id);
    }
}
