//! Keybinding registry: maps keys to actions per context, with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavUp,
    NavDown,
    NavLeft,
    NavRight,
    Select,
    Back,
    ShowNew,
    ShowPopular,
    Reload,
    SortMenu,
    FilterMenu,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    OpenPoster,
    OpenHomepage,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavUp => "Move up",
            Self::NavDown => "Move down",
            Self::NavLeft => "Move left",
            Self::NavRight => "Move right",
            Self::Select => "Open details / choose option",
            Self::Back => "Go back / dismiss",
            Self::ShowNew => "Show new releases",
            Self::ShowPopular => "Show popular movies",
            Self::Reload => "Reload listing",
            Self::SortMenu => "Sort options",
            Self::FilterMenu => "Filter options",
            Self::EnterSearch => "Search movies",
            Self::ExitSearch => "Clear search",
            Self::CommitSearch => "Search now",
            Self::OpenPoster => "Open poster in browser",
            Self::OpenHomepage => "Open homepage in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::CycleTheme => "Toggle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context, determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// The movie grid. Other contexts fall back to it.
    Global,
    Detail,
    Menu,
    Help,
    Search,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Context::Global => "Browse",
            Context::Detail => "Detail",
            Context::Menu => "Sort / Filter menu",
            Context::Help => "Help",
            Context::Search => "Search",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right", "Backspace", "Space"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix('F')
        .or_else(|| s.strip_prefix('f'))
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12)
            .contains(&n)
            .then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// in a specific context fall back to `Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        let defaults: [(Context, KeySpec, Action); 41] = [
            // === Browse ===
            (Global, KeySpec::ch('q'), Quit),
            (Global, KeySpec::ch('k'), NavUp),
            (Global, KeySpec::plain(KeyCode::Up), NavUp),
            (Global, KeySpec::ch('j'), NavDown),
            (Global, KeySpec::plain(KeyCode::Down), NavDown),
            (Global, KeySpec::ch('h'), NavLeft),
            (Global, KeySpec::plain(KeyCode::Left), NavLeft),
            (Global, KeySpec::ch('l'), NavRight),
            (Global, KeySpec::plain(KeyCode::Right), NavRight),
            (Global, KeySpec::plain(KeyCode::Enter), Select),
            (Global, KeySpec::plain(KeyCode::Esc), Back),
            (Global, KeySpec::ch('n'), ShowNew),
            (Global, KeySpec::ch('p'), ShowPopular),
            (Global, KeySpec::ch('r'), Reload),
            (Global, KeySpec::ch('s'), SortMenu),
            (Global, KeySpec::ch('f'), FilterMenu),
            (Global, KeySpec::ch('/'), EnterSearch),
            (Global, KeySpec::ch('o'), OpenPoster),
            (Global, KeySpec::ch('T'), CycleTheme),
            (Global, KeySpec::ch('?'), ShowHelp),
            // === Detail view ===
            (Detail, KeySpec::ch('b'), Back),
            (Detail, KeySpec::plain(KeyCode::Esc), Back),
            (Detail, KeySpec::ch('j'), ScrollDown),
            (Detail, KeySpec::plain(KeyCode::Down), ScrollDown),
            (Detail, KeySpec::ch('k'), ScrollUp),
            (Detail, KeySpec::plain(KeyCode::Up), ScrollUp),
            (Detail, KeySpec::ctrl('d'), PageDown),
            (Detail, KeySpec::ctrl('u'), PageUp),
            (Detail, KeySpec::ch('w'), OpenHomepage),
            // === Sort / filter menus ===
            (Menu, KeySpec::ch('b'), Back),
            (Menu, KeySpec::ch(' '), Select),
            // === Help overlay ===
            (Help, KeySpec::ch('?'), Back),
            (Help, KeySpec::ch('b'), Back),
            (Help, KeySpec::ch('j'), ScrollDown),
            (Help, KeySpec::plain(KeyCode::Down), ScrollDown),
            (Help, KeySpec::ch('k'), ScrollUp),
            (Help, KeySpec::plain(KeyCode::Up), ScrollUp),
            (Help, KeySpec::ctrl('d'), PageDown),
            (Help, KeySpec::ctrl('u'), PageUp),
            // === Search input ===
            (Search, KeySpec::plain(KeyCode::Esc), ExitSearch),
            (Search, KeySpec::plain(KeyCode::Enter), CommitSearch),
        ];

        for (context, key, action) in defaults {
            self.bind(context, key, action);
        }
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "reload").
    /// Values are key strings (e.g., "q", "Ctrl+r", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts_for_action: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts_for_action.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts_for_action {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// First key bound to `action` in `context` (or Global), for status hints.
    pub fn key_hint(&self, action: Action, context: Context) -> Option<String> {
        let find = |ctx: Context| {
            self.bindings
                .iter()
                .find(|(c, _, a)| *c == ctx && *a == action)
                .map(|(_, key, _)| format_key(key))
        };
        find(context).or_else(|| find(Context::Global))
    }

    /// All bindings for the help screen as
    /// (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_left" | "navleft" | "left" => Some(Action::NavLeft),
        "nav_right" | "navright" | "right" => Some(Action::NavRight),
        "select" | "enter" => Some(Action::Select),
        "back" => Some(Action::Back),
        "show_new" | "shownew" | "new" => Some(Action::ShowNew),
        "show_popular" | "showpopular" | "popular" => Some(Action::ShowPopular),
        "reload" | "refresh" => Some(Action::Reload),
        "sort_menu" | "sortmenu" | "sort" => Some(Action::SortMenu),
        "filter_menu" | "filtermenu" | "filter" => Some(Action::FilterMenu),
        "enter_search" | "entersearch" | "search" => Some(Action::EnterSearch),
        "exit_search" | "exitsearch" => Some(Action::ExitSearch),
        "commit_search" | "commitsearch" => Some(Action::CommitSearch),
        "open_poster" | "openposter" | "open" => Some(Action::OpenPoster),
        "open_homepage" | "openhomepage" | "homepage" => Some(Action::OpenHomepage),
        "scroll_down" | "scrolldown" => Some(Action::ScrollDown),
        "scroll_up" | "scrollup" => Some(Action::ScrollUp),
        "page_down" | "pagedown" => Some(Action::PageDown),
        "page_up" | "pageup" => Some(Action::PageUp),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_grid_navigation_keys() {
        let reg = KeybindingRegistry::new();
        let none = KeyModifiers::NONE;
        assert_eq!(
            reg.action_for_key(KeyCode::Char('h'), none, Context::Global),
            Some(Action::NavLeft)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Right, none, Context::Global),
            Some(Action::NavRight)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), none, Context::Global),
            Some(Action::NavDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Up, none, Context::Global),
            Some(Action::NavUp)
        );
    }

    #[test]
    fn test_listing_mode_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::Global),
            Some(Action::ShowNew)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('p'), KeyModifiers::NONE, Context::Global),
            Some(Action::ShowPopular)
        );
    }

    #[test]
    fn test_detail_context_overrides_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::NONE, Context::Detail),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('b'), KeyModifiers::NONE, Context::Detail),
            Some(Action::Back)
        );
        // Falls back to Global
        assert_eq!(
            reg.action_for_key(KeyCode::Char('o'), KeyModifiers::NONE, Context::Detail),
            Some(Action::OpenPoster)
        );
    }

    #[test]
    fn test_ctrl_modifiers() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::CONTROL, Context::Detail),
            Some(Action::PageDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('u'), KeyModifiers::CONTROL, Context::Help),
            Some(Action::PageUp)
        );
    }

    #[test]
    fn test_search_context() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Search),
            Some(Action::ExitSearch)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::CommitSearch)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::F(12), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("reload".to_string(), "F5".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('r'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::F(5), KeyModifiers::NONE, Context::Global),
            Some(Action::Reload)
        );
        assert_eq!(reg.key_hint(Action::Reload, Context::Global).as_deref(), Some("F5"));
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("mark_all_read".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_override_preserves_contexts() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("scroll_down".to_string(), "Ctrl+n".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::CONTROL, Context::Detail),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::CONTROL, Context::Help),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::Detail),
            Some(Action::NavDown)
        );
    }

    #[test]
    fn test_parse_key_string_formats() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("space"), Some(KeySpec::ch(' ')));
        assert_eq!(parse_key_string("F1"), Some(KeySpec::plain(KeyCode::F(1))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("/"), Some(KeySpec::ch('/')));
        assert_eq!(parse_key_string("f"), Some(KeySpec::ch('f')));
        assert_eq!(parse_key_string("nonsense"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::ch('q')), "q");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::ch(' ')), "Space");
    }

    #[test]
    fn test_all_bindings_cover_every_context() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        for ctx in [
            Context::Global,
            Context::Detail,
            Context::Menu,
            Context::Help,
            Context::Search,
        ] {
            assert!(bindings.iter().any(|(c, _, _, _)| *c == ctx), "{:?}", ctx);
        }
    }
}
