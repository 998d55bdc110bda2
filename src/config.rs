//! User configuration — keybindings, spin timing and share links.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/dew-luck/config.toml` (default `~/.config/dew-luck/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::animator::SpinTiming;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://localhost/dew-luck/";

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Spin,
    Select,
    Absent,
    Cancel,
    NextGroup,
    PrevGroup,
    ResetSelections,
    Share,
    DeleteGroup,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::Spin,
        Action::Select,
        Action::Absent,
        Action::Cancel,
        Action::NextGroup,
        Action::PrevGroup,
        Action::ResetSelections,
        Action::Share,
        Action::DeleteGroup,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Spin => "spin",
            Action::Select => "select",
            Action::Absent => "absent",
            Action::Cancel => "cancel",
            Action::NextGroup => "next_group",
            Action::PrevGroup => "prev_group",
            Action::ResetSelections => "reset_selections",
            Action::Share => "share",
            Action::DeleteGroup => "delete_group",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

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

    /// Only CTRL/ALT/SHIFT take part in matching.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Short form for hints, e.g. `"Space"`, `"↑"`, `"Ctrl+c"`.
    pub fn display(&self) -> String {
        self.render(true)
    }

    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        let name = match (self.code, pretty) {
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Left, true) => "←".into(),
            (KeyCode::Right, true) => "→".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, false) => "Left".into(),
            (KeyCode::Right, false) => "Right".into(),
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::Backspace, _) => "Backspace".into(),
            (KeyCode::Delete, _) => "Delete".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&name);
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (prefix, key_part) = match s.rsplit_once('+') {
            // A bare "+" or a trailing "++" binds the plus key itself.
            Some((pre, "")) => (pre.strip_suffix('+').unwrap_or(pre), "+"),
            Some((pre, key)) => (pre, key),
            None => ("", s),
        };

        for part in prefix.split('+').filter(|p| !p.is_empty()) {
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
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub timing: SpinTiming,
    /// Page that share links point at.
    pub share_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            timing: SpinTiming::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Spin, vec![KeyBind::new(Char(' '), n), KeyBind::new(Char('s'), n)]);
        m.insert(Select, vec![KeyBind::new(Enter, n), KeyBind::new(Char('y'), n)]);
        m.insert(Absent, vec![KeyBind::new(Char('a'), n)]);
        m.insert(Cancel, vec![KeyBind::new(Esc, n), KeyBind::new(Char('n'), n)]);
        m.insert(NextGroup, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(PrevGroup, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ResetSelections, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Share, vec![KeyBind::new(Char('u'), n)]);
        m.insert(DeleteGroup, vec![KeyBind::new(Char('x'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Action bound to `event`.  Bindings with more modifiers win ties.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// First binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: spin | {}/{}: group | {}: reset picks | {}: share | {}: quit",
            self.short_binding(Action::Spin),
            self.short_binding(Action::PrevGroup),
            self.short_binding(Action::NextGroup),
            self.short_binding(Action::ResetSelections),
            self.short_binding(Action::Share),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                }
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for (lineno, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line = lineno + 1, "config line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "rounds" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.timing.rounds = v.clamp(1, 10);
                    }
                    continue;
                }
                "initial_delay_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.timing.initial_delay = Duration::from_millis(v.min(1000));
                    }
                    continue;
                }
                "delay_increment_phase1_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.timing.increment_phase1 = Duration::from_millis(v.min(500));
                    }
                    continue;
                }
                "delay_increment_phase2_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.timing.increment_phase2 = Duration::from_millis(v.min(500));
                    }
                    continue;
                }
                "share_base_url" => {
                    if !value.is_empty() {
                        config.share_base_url = value.to_string();
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::warn!(line = lineno + 1, key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim()))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        // The curve must slow down past the first rotation, and harder past
        // the second.
        let timing = &mut config.timing;
        if timing.increment_phase1.is_zero() || timing.increment_phase2 <= timing.increment_phase1
        {
            tracing::warn!(
                phase1_ms = timing.increment_phase1.as_millis() as u64,
                phase2_ms = timing.increment_phase2.as_millis() as u64,
                "delay increments must satisfy 0 < phase1 < phase2; using defaults"
            );
            let defaults = SpinTiming::default();
            timing.increment_phase1 = defaults.increment_phase1;
            timing.increment_phase2 = defaults.increment_phase2;
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# dew-luck configuration".to_string(),
            String::new(),
            "# Spin animation".to_string(),
            format!("rounds = {}", self.timing.rounds),
            format!("initial_delay_ms = {}", self.timing.initial_delay.as_millis()),
            format!(
                "delay_increment_phase1_ms = {}",
                self.timing.increment_phase1.as_millis()
            ),
            format!(
                "delay_increment_phase2_ms = {}",
                self.timing.increment_phase2.as_millis()
            ),
            String::new(),
            format!("share_base_url = \"{}\"", self.share_base_url),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
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

/// Return the config file path (`$XDG_CONFIG_HOME/dew-luck/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("dew-luck").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut ev = KeyEvent::new(code, modifiers);
        ev.kind = KeyEventKind::Press;
        ev
    }

    #[test]
    fn defaults_match_keys() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.match_key(press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::Spin)
        );
        assert_eq!(
            cfg.match_key(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Cancel)
        );
        assert_eq!(cfg.match_key(press(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parse_reads_timing_and_bindings() {
        let cfg = AppConfig::parse(
            "# comment\n\
             rounds = 5\n\
             initial_delay_ms = 30\n\
             delay_increment_phase1_ms = 4\n\
             delay_increment_phase2_ms = 9\n\
             share_base_url = \"https://picker.example/\"\n\
             spin = Ctrl+s, Enter\n\
             bogus = 1\n\
             no equals sign\n",
        );
        assert_eq!(cfg.timing.rounds, 5);
        assert_eq!(cfg.timing.initial_delay, Duration::from_millis(30));
        assert_eq!(cfg.timing.increment_phase1, Duration::from_millis(4));
        assert_eq!(cfg.timing.increment_phase2, Duration::from_millis(9));
        assert_eq!(cfg.share_base_url, "https://picker.example/");
        assert_eq!(
            cfg.bindings[&Action::Spin],
            vec![
                KeyBind::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Enter, KeyModifiers::NONE),
            ]
        );
        // Untouched actions keep their defaults.
        assert_eq!(cfg.bindings[&Action::Quit], AppConfig::default_bindings()[&Action::Quit]);
    }

    #[test]
    fn flat_or_inverted_increments_fall_back_to_defaults() {
        let defaults = SpinTiming::default();
        for text in [
            "delay_increment_phase1_ms = 0\ndelay_increment_phase2_ms = 10",
            "delay_increment_phase1_ms = 12\ndelay_increment_phase2_ms = 12",
            "delay_increment_phase1_ms = 20\ndelay_increment_phase2_ms = 5",
            "delay_increment_phase2_ms = 3",
        ] {
            let timing = AppConfig::parse(text).timing;
            assert_eq!(timing.increment_phase1, defaults.increment_phase1, "{text}");
            assert_eq!(timing.increment_phase2, defaults.increment_phase2, "{text}");
        }

        let timing = AppConfig::parse("delay_increment_phase2_ms = 7").timing;
        assert_eq!(timing.increment_phase2, Duration::from_millis(7));
    }

    #[test]
    fn rounds_are_clamped() {
        assert_eq!(AppConfig::parse("rounds = 0").timing.rounds, 1);
        assert_eq!(AppConfig::parse("rounds = 99").timing.rounds, 10);
        assert_eq!(AppConfig::parse("rounds = many").timing.rounds, 3);
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut cfg = AppConfig::default();
        cfg.timing.rounds = 4;
        cfg.bindings
            .insert(Action::Share, vec![KeyBind::new(KeyCode::Up, KeyModifiers::ALT)]);
        let back = AppConfig::parse(&cfg.serialise());
        assert_eq!(back.timing, cfg.timing);
        assert_eq!(back.bindings, cfg.bindings);
        assert_eq!(back.share_base_url, cfg.share_base_url);
    }

    #[test]
    fn key_strings() {
        assert_eq!(
            KeyBind::parse("Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT))
        );
        assert_eq!(
            KeyBind::parse("F5"),
            Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE))
        );
        assert_eq!(
            KeyBind::parse("+"),
            Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("Hyper+q"), None);
        assert_eq!(KeyBind::new(KeyCode::Down, KeyModifiers::NONE).display(), "↓");
    }
}
