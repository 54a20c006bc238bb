//! Screen routes and back-stack navigation.

use std::fmt;

use anyhow::{Result, bail};
use url::form_urlencoded;

const HOME: &str = "home";
const PLAYER: &str = "player";
const CHANNEL_URL_PARAM: &str = "channelUrl";

/// A navigation destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Channel list.
    Home,
    /// Playback of one channel stream.
    Player {
        /// Stream URL.
        url: String,
    },
}

impl Route {
    /// Parses `home` or `player/?channelUrl=<percent-encoded url>`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown destinations or a player route
    /// without a `channelUrl` argument.
    pub fn parse(route: &str) -> Result<Self> {
        if route == HOME {
            return Ok(Self::Home);
        }
        let Some(rest) = route.strip_prefix(PLAYER) else {
            bail!("unknown route: {route}");
        };
        let query = rest
            .strip_prefix("/?")
            .or_else(|| rest.strip_prefix('?'))
            .unwrap_or_default();
        let url = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == CHANNEL_URL_PARAM)
            .map(|(_, value)| value.into_owned());
        match url {
            Some(url) if !url.is_empty() => Ok(Self::Player { url }),
            _ => bail!("player route is missing {CHANNEL_URL_PARAM}: {route}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str(HOME),
            Self::Player { url } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(CHANNEL_URL_PARAM, url)
                    .finish();
                write!(f, "{PLAYER}/?{query}")
            }
        }
    }
}

/// Back stack of routes rooted at [`Route::Home`].
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::Home],
        }
    }
}

impl Navigator {
    /// Pushes `route`.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.stack.push(route);
    }

    /// Pops the top route. Home is never popped.
    ///
    /// Returns the route that was left, if any.
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() <= 1 {
            return None;
        }
        let left = self.stack.pop();
        tracing::debug!(route = %self.current(), "back");
        left
    }

    /// Route on top of the stack.
    #[must_use]
    pub fn current(&self) -> &Route {
        self.stack.last().unwrap_or(&Route::Home)
    }
}
