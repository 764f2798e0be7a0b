//! User configuration — keybindings, deck tuning, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/swipe-deck/config.toml` (default
//! `~/.config/swipe-deck/config.toml`).  The front card index survives
//! restarts in `$XDG_STATE_HOME/swipe-deck/state`.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use swipe_deck::core::{SavedState, SwipeConfig};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SwipeLeft,
    SwipeRight,
    Undo,
    Restart,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when writing the config file).
    pub const ALL: &[Action] = &[
        Action::SwipeLeft,
        Action::SwipeRight,
        Action::Undo,
        Action::Restart,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::SwipeLeft => "swipe_left",
            Action::SwipeRight => "swipe_right",
            Action::Undo => "undo",
            Action::Restart => "restart",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "swipe_left" => Some(Action::SwipeLeft),
            "swipe_right" => Some(Action::SwipeRight),
            "undo" => Some(Action::Undo),
            "restart" => Some(Action::Restart),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"←"`, `"Ctrl+z"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            _ => key_name(self.code),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Left"`, `"Ctrl+z"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+z"`, `"Left"`, `"q"`, `"Backspace"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── deck ──────────────

/// Deck tuning exposed to the user.  Values read from disk are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckSettings {
    pub swipe_threshold: f32,
    pub min_ratio_bound: f32,
    pub visible_items: usize,
    pub rotate_degree: f32,
    pub endless: bool,
    /// Animation frame interval.
    pub frame_ms: u64,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: 0.5,
            min_ratio_bound: 1.0,
            visible_items: 3,
            rotate_degree: 14.0,
            endless: false,
            frame_ms: 16,
        }
    }
}

impl DeckSettings {
    /// Library configuration for these settings.
    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig::default()
            .swipe_threshold(self.swipe_threshold)
            .min_ratio_bound(self.min_ratio_bound)
            .visible_item_count(self.visible_items)
            .rotate_degree(self.rotate_degree)
            .endless(self.endless)
    }

    /// Apply one `key = value` pair.  Returns `false` for unknown keys.
    fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "swipe_threshold" => {
                if let Ok(v) = value.parse::<f32>() {
                    self.swipe_threshold = v.clamp(0.05, 1.0);
                }
            }
            "min_ratio_bound" => {
                if let Ok(v) = value.parse::<f32>() {
                    self.min_ratio_bound = v.clamp(0.0, 1.0);
                }
            }
            "visible_items" => {
                if let Ok(v) = value.parse::<usize>() {
                    self.visible_items = v.clamp(1, 6);
                }
            }
            "rotate_degree" => {
                if let Ok(v) = value.parse::<f32>() {
                    self.rotate_degree = v.clamp(-45.0, 45.0);
                }
            }
            "endless" => self.endless = value == "true",
            "frame_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    // Keep this bounded for predictable animation.
                    self.frame_ms = v.clamp(8, 100);
                }
            }
            _ => return false,
        }
        true
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and deck settings.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub deck: DeckSettings,
}

impl AppConfig {
    /// Hard-coded default keybindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(SwipeLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(SwipeRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(
            Undo,
            vec![
                KeyBind::new(Char('u'), n),
                KeyBind::new(Backspace, n),
                KeyBind::new(Char('z'), ctrl),
            ],
        );
        m.insert(Restart, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "drag or {}/{}: swipe | {}: undo | {}: restart | {}: quit",
            self.short_binding(Action::SwipeLeft),
            self.short_binding(Action::SwipeRight),
            self.short_binding(Action::Undo),
            self.short_binding(Action::Restart),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self {
            bindings: Self::default_bindings(),
            deck: DeckSettings::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    /// Whether a config file exists yet.
    pub fn exists_on_disk() -> bool {
        config_path().exists()
    }

    fn parse_config(s: &str) -> Self {
        let mut bindings = Self::default_bindings();
        let mut deck = DeckSettings::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if deck.apply(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self { bindings, deck }
    }

    fn serialise(&self) -> String {
        let d = &self.deck;
        let mut lines = vec![
            "# swipe-deck configuration".to_string(),
            String::new(),
            "# Deck settings".to_string(),
            format!("swipe_threshold = {}", d.swipe_threshold),
            format!("min_ratio_bound = {}", d.min_ratio_bound),
            format!("visible_items = {}", d.visible_items),
            format!("rotate_degree = {}", d.rotate_degree),
            format!("endless = {}", d.endless),
            format!("frame_ms = {}", d.frame_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/swipe-deck/config.toml`).
fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("swipe-deck")
        .join("config.toml")
}

// ───────────────────────────────────────── session ───────────

/// Return the saved-state path (`$XDG_STATE_HOME/swipe-deck/state`).
fn state_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .join("swipe-deck")
        .join("state")
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(fallback)
    })
}

/// Saved deck position from the last run, if any.  A corrupt file is
/// logged and ignored.
pub fn load_session() -> Option<SavedState> {
    let path = state_path();
    let contents = std::fs::read_to_string(&path).ok()?;
    match contents.parse::<SavedState>() {
        Ok(saved) => Some(saved),
        Err(e) => {
            warn!("ignoring saved state at {}: {e}", path.display());
            None
        }
    }
}

pub fn save_session(saved: &SavedState) -> anyhow::Result<()> {
    let path = state_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, saved.to_string())?;
    Ok(())
}
