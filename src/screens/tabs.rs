use crate::auth::gate::AuthGate;
use crate::auth::session::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Today,
    Journal,
    Calendar,
    Insights,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Today,
        Tab::Journal,
        Tab::Calendar,
        Tab::Insights,
        Tab::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::Journal => "Journal",
            Tab::Calendar => "Calendar",
            Tab::Insights => "Insights",
            Tab::Profile => "Profile",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Tab::Today => "index",
            Tab::Journal => "journal",
            Tab::Calendar => "calendar",
            Tab::Insights => "insights",
            Tab::Profile => "profile",
        }
    }
}

/// What the root of the app shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Auth state not known yet: render nothing.
    Loading,
    SignIn,
    Tabs,
}

impl Surface {
    pub fn resolve(loading: bool, user: Option<&AuthUser>) -> Self {
        match (loading, user) {
            (true, _) => Surface::Loading,
            (false, None) => Surface::SignIn,
            (false, Some(_)) => Surface::Tabs,
        }
    }

    pub fn for_gate(gate: &AuthGate) -> Self {
        Self::resolve(gate.loading(), gate.user())
    }
}
