//! User configuration: stack options, keybindings, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scroll-stack/config.toml` (default
//! `~/.config/scroll-stack/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::core::controller::{ControllerOptions, GatePolicy, DEFAULT_SECTION_HEIGHT_MULTIPLIER};
use crate::core::tokens::{format_duration, parse_duration, SizeToken};
use crate::core::visibility::DEFAULT_THRESHOLD;
use crate::error::StackResult;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (config file order).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::JumpTop,
        Action::JumpBottom,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::JumpTop => "Jump to Top",
            Action::JumpBottom => "Jump to Bottom",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::JumpTop => "jump_top",
            Action::JumpBottom => "jump_bottom",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys: (code, config-file name, on-screen glyph).
const NAMED_KEYS: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Up, "Up", "↑"),
    (KeyCode::Down, "Down", "↓"),
    (KeyCode::Left, "Left", "←"),
    (KeyCode::Right, "Right", "→"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Tab, "Tab", "Tab"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PageUp", "PgUp"),
    (KeyCode::PageDown, "PageDown", "PgDn"),
    (KeyCode::Char(' '), "Space", "Space"),
];

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers: modifiers & MODIFIER_MASK,
        }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && self.modifiers == (event.modifiers & MODIFIER_MASK)
    }

    /// On-screen form, e.g. `"Ctrl+↓"`.
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form, e.g. `"Ctrl+Down"`.
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, glyphs: bool) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        match NAMED_KEYS.iter().find(|(code, _, _)| *code == self.code) {
            Some((_, name, glyph)) => s.push_str(if glyphs { glyph } else { name }),
            None => match self.code {
                KeyCode::Char(c) => s.push(c),
                KeyCode::F(n) => s.push_str(&format!("F{n}")),
                other => s.push_str(&format!("{other:?}")),
            },
        }
        s
    }

    /// Parse a key string like `"Ctrl+d"`, `"Shift+Down"`, `"j"`.
    fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.rfind('+') {
            // A lone "+" or a trailing "+" means the plus key itself.
            Some(i) if i + 1 < s.len() => (&s[..i], &s[i + 1..]),
            _ => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let lower = key.to_lowercase();
        let code = match NAMED_KEYS
            .iter()
            .find(|(_, name, _)| name.to_lowercase() == lower)
        {
            Some((code, _, _)) => *code,
            None => match lower.as_str() {
                "pgup" => KeyCode::PageUp,
                "pgdn" => KeyCode::PageDown,
                "escape" => KeyCode::Esc,
                "return" => KeyCode::Enter,
                f if f.starts_with('f') && f.len() > 1 => KeyCode::F(f[1..].parse().ok()?),
                _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
                _ => return None,
            },
        };

        Some(KeyBind::new(code, modifiers))
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: stack options and keybindings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Card height token, capped when resolved.
    pub card_height: SizeToken,
    /// Length of the card transition.
    pub animation_duration: Duration,
    /// Section height in viewport heights.
    pub section_height_multiplier: f64,
    /// Visible share that counts as "in view".
    pub intersection_threshold: f64,
    /// Skip recomputation while the section is out of view.
    pub gate_on_visibility: bool,
    /// Rows scrolled per wheel notch or arrow key.
    pub scroll_step: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            card_height: SizeToken::default(),
            animation_duration: Duration::from_millis(500),
            section_height_multiplier: DEFAULT_SECTION_HEIGHT_MULTIPLIER,
            intersection_threshold: DEFAULT_THRESHOLD,
            gate_on_visibility: true,
            scroll_step: 3,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('u'), n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(JumpTop, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(JumpBottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action bound to a key event.  When several bindings match,
    /// the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Bind `bind` to `action`, removing it from every other action first.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Every key bound to `action`, comma separated.
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds
                .iter()
                .map(KeyBind::display)
                .collect::<Vec<_>>()
                .join(", "),
            _ => "(none)".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: page | {}: settings | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::PageDown),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    pub fn gate_policy(&self) -> GatePolicy {
        if self.gate_on_visibility {
            GatePolicy::SkipWhileHidden
        } else {
            GatePolicy::AlwaysListen
        }
    }

    pub fn controller_options(&self) -> StackResult<ControllerOptions> {
        ControllerOptions::new(self.section_height_multiplier, self.gate_policy())
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
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

    fn parse_config(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "card_height" => match value.parse::<SizeToken>() {
                    Ok(t) => cfg.card_height = t,
                    Err(err) => warn!(%err, "ignoring card_height"),
                },
                "animation_duration" => match parse_duration(value) {
                    Ok(d) => cfg.animation_duration = d,
                    Err(err) => warn!(%err, "ignoring animation_duration"),
                },
                "section_height_multiplier" => match value.parse::<f64>() {
                    Ok(v) if v.is_finite() && v > 0.0 => cfg.section_height_multiplier = v,
                    _ => warn!(value, "ignoring section_height_multiplier"),
                },
                "intersection_threshold" => match value.parse::<f64>() {
                    Ok(v) if (0.0..=1.0).contains(&v) => cfg.intersection_threshold = v,
                    _ => warn!(value, "ignoring intersection_threshold"),
                },
                "gate_on_visibility" => cfg.gate_on_visibility = value == "true",
                "scroll_step" => {
                    if let Ok(v) = value.parse::<u16>() {
                        cfg.scroll_step = v.clamp(1, 50);
                    }
                }
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        cfg.bindings.insert(action, parsed);
                    }
                }
            }
        }

        cfg
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scroll-stack configuration".to_string(),
            String::new(),
            "# Stack settings".to_string(),
            format!("card_height = {}", self.card_height),
            format!("animation_duration = {}", format_duration(self.animation_duration)),
            format!("section_height_multiplier = {}", self.section_height_multiplier),
            format!("intersection_threshold = {}", self.intersection_threshold),
            format!("gate_on_visibility = {}", self.gate_on_visibility),
            format!("scroll_step = {}", self.scroll_step),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
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

/// Return the config file path (`$XDG_CONFIG_HOME/scroll-stack/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scroll-stack").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_page_keys_map_to_page_actions() {
        let cfg = AppConfig::default();
        let none = KeyModifiers::NONE;
        assert_eq!(cfg.match_key(key(KeyCode::PageUp, none)), Some(Action::PageUp));
        assert_eq!(cfg.match_key(key(KeyCode::PageDown, none)), Some(Action::PageDown));
        assert_eq!(cfg.match_key(key(KeyCode::Char('u'), none)), Some(Action::PageUp));
        assert!(Action::ALL.iter().all(|a| cfg.bindings.contains_key(a)));
    }

    #[test]
    fn parses_stack_settings() {
        let cfg = AppConfig::parse_config(
            "card_height = 400px\nanimation_duration = 300ms\n\
             section_height_multiplier = 4\nintersection_threshold = 0.25\n\
             gate_on_visibility = false\nscroll_step = 5\n",
        );
        assert_eq!(cfg.card_height, SizeToken::Units(400.0));
        assert_eq!(cfg.animation_duration, Duration::from_millis(300));
        assert_eq!(cfg.section_height_multiplier, 4.0);
        assert_eq!(cfg.intersection_threshold, 0.25);
        assert_eq!(cfg.gate_policy(), GatePolicy::AlwaysListen);
        assert_eq!(cfg.scroll_step, 5);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = AppConfig::parse_config(
            "card_height = tall\nanimation_duration = soon\n\
             section_height_multiplier = -2\nintersection_threshold = 3\n",
        );
        let d = AppConfig::default();
        assert_eq!(cfg.card_height, d.card_height);
        assert_eq!(cfg.animation_duration, d.animation_duration);
        assert_eq!(cfg.section_height_multiplier, d.section_height_multiplier);
        assert_eq!(cfg.intersection_threshold, d.intersection_threshold);
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut cfg = AppConfig::default();
        cfg.section_height_multiplier = 5.0;
        cfg.gate_on_visibility = false;
        cfg.add_binding(Action::ScrollDown, KeyBind::new(KeyCode::Down, KeyModifiers::CONTROL));

        let back = AppConfig::parse_config(&cfg.serialise());
        assert_eq!(back.section_height_multiplier, 5.0);
        assert!(!back.gate_on_visibility);
        assert_eq!(
            back.match_key(key(KeyCode::Down, KeyModifiers::CONTROL)),
            Some(Action::ScrollDown)
        );
        assert_eq!(back.match_key(key(KeyCode::Char(' '), KeyModifiers::NONE)), Some(Action::PageDown));
    }

    #[test]
    fn rebinding_steals_key_from_other_actions() {
        let mut cfg = AppConfig::default();
        cfg.add_binding(Action::Quit, KeyBind::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert!(cfg.bindings[&Action::ScrollDown]
            .iter()
            .all(|b| b.code != KeyCode::Char('j')));
    }

    #[test]
    fn key_strings_parse_with_modifiers() {
        let b = KeyBind::parse("Ctrl+Shift+PageDown").unwrap();
        assert_eq!(b.code, KeyCode::PageDown);
        assert_eq!(b.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(b.to_config_string(), "Ctrl+Shift+PageDown");
        assert_eq!(b.display(), "Ctrl+Shift+PgDn");

        assert_eq!(KeyBind::parse("+").unwrap().code, KeyCode::Char('+'));
        assert_eq!(KeyBind::parse("F5").unwrap().code, KeyCode::F(5));
        assert!(KeyBind::parse("Hyper+x").is_none());
        assert!(KeyBind::parse("nonsense").is_none());
    }

    #[test]
    fn status_hint_uses_first_binding() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("↑/↓: scroll"));
        assert!(hint.contains("?: settings"));
    }
}
