use std::fmt;
use tokio::sync::watch;

pub const DEFAULT_COURSE_TOKEN: &str = "cursos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    CourseList,
}

impl Route {
    /// Any token other than the course token, including the empty one, is Home.
    pub fn from_token(token: &str, course_token: &str) -> Self {
        if normalize(token) == normalize(course_token) {
            Self::CourseList
        } else {
            Self::Home
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::CourseList => "course_list",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn normalize(token: &str) -> &str {
    token.strip_prefix('#').unwrap_or(token)
}

/// Single source of truth for the current navigation token.
///
/// Writers call [`NavigationTokens::navigate`]; every [`RouteSelector`]
/// subscribed to it sees the change on its next read.
#[derive(Debug)]
pub struct NavigationTokens {
    tx: watch::Sender<String>,
}

impl NavigationTokens {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(normalize(&initial.into()).to_string());
        Self { tx }
    }

    pub fn navigate(&self, token: &str) {
        let token = normalize(token).to_string();
        self.tx.send_if_modified(|current| {
            if *current == token {
                return false;
            }
            *current = token;
            true
        });
    }

    #[cfg(test)]
    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self, course_token: impl Into<String>) -> RouteSelector {
        let rx = self.tx.subscribe();
        let course_token = course_token.into();
        let route = Route::from_token(&rx.borrow(), &course_token);
        RouteSelector {
            rx,
            course_token,
            route,
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Subscription that maps the latest token to a [`Route`].
///
/// Dropping the selector removes the subscription.
#[derive(Debug)]
pub struct RouteSelector {
    rx: watch::Receiver<String>,
    course_token: String,
    route: Route,
}

impl RouteSelector {
    /// Recomputes the route if the token changed since the last call.
    pub fn current(&mut self) -> Route {
        if self.rx.has_changed().unwrap_or(false) {
            let route = Route::from_token(&self.rx.borrow_and_update(), &self.course_token);
            if route != self.route {
                tracing::info!("Route changed: {} -> {}", self.route, route);
            }
            self.route = route;
        }
        self.route
    }
}
