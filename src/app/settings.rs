//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and the popup renderer consume the same source of truth.

use std::time::Duration;

use super::state::AppState;
use crate::core::tokens::format_duration;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle; reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value as shown in the menu.
    pub fn value(&self, state: &AppState) -> String {
        match self {
            Self::Toggle { get, .. } => {
                let label = if get(state) { "ON" } else { "OFF" };
                label.to_string()
            }
            Self::Cycle { value, .. } => value(state),
        }
    }

    /// Flip the toggle or advance the cycle.
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Toggle { get, set, .. } => {
                let current = get(state);
                set(state, !current);
            }
            Self::Cycle { cycle, .. } => cycle(state),
        }
    }
}

/// Next entry after `current` in `options`, wrapping; unknown values restart
/// at `fallback`.
fn next_after<T: PartialEq + Copy>(options: &[T], current: T, fallback: usize) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(fallback);
    options[(idx + 1) % options.len()]
}

const MULTIPLIERS: &[f64] = &[2.0, 3.0, 4.0, 5.0, 6.0];
const DURATIONS_MS: &[u64] = &[200, 500, 800, 1200];
const SCROLL_STEPS: &[u16] = &[1, 3, 5, 10];

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Gate On Visibility",
        get: |s| s.config.gate_on_visibility,
        set: |s, v| {
            s.set_gate_on_visibility(v);
            s.persist();
            s.status_message = Some(if v {
                "Hidden stack skips recomputation".into()
            } else {
                "Stack recomputes on every frame".into()
            });
        },
    },
    SettingsItem::Cycle {
        label: "Section Height",
        value: |s| format!("{}× viewport", s.config.section_height_multiplier),
        cycle: |s| {
            s.config.section_height_multiplier =
                next_after(MULTIPLIERS, s.config.section_height_multiplier, 0);
            s.persist();
            // New height means new subscriptions, as on a fresh mount.
            s.status_message = Some(match s.mount_section() {
                Ok(()) => format!(
                    "Section height: {}× viewport",
                    s.config.section_height_multiplier
                ),
                Err(err) => err.to_string(),
            });
        },
    },
    SettingsItem::Cycle {
        label: "Transition",
        value: |s| format_duration(s.config.animation_duration),
        cycle: |s| {
            let current = s.config.animation_duration.as_millis() as u64;
            let next = Duration::from_millis(next_after(DURATIONS_MS, current, 0));
            s.set_animation_duration(next);
            s.persist();
            s.status_message = Some(format!("Transition: {}", format_duration(next)));
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Step",
        value: |s| format!("{} rows", s.config.scroll_step),
        cycle: |s| {
            s.config.scroll_step = next_after(SCROLL_STEPS, s.config.scroll_step, 0);
            s.persist();
            s.status_message = Some(format!("Scroll step: {} rows", s.config.scroll_step));
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::state;
    use crate::core::controller::GatePolicy;

    #[test]
    fn cycles_wrap_and_recover_from_unknown_values() {
        assert_eq!(next_after(SCROLL_STEPS, 10, 0), 1);
        assert_eq!(next_after(SCROLL_STEPS, 3, 0), 5);
        assert_eq!(next_after(SCROLL_STEPS, 7, 0), 3);
    }

    #[test]
    fn gate_toggle_reaches_controller() {
        let mut s = state();
        SETTINGS_ITEMS[0].activate(&mut s);
        assert!(!s.config.gate_on_visibility);
        assert_eq!(SETTINGS_ITEMS[0].value(&s), "OFF");
        let gate = s.section.as_ref().unwrap().controller().options().gate;
        assert_eq!(gate, GatePolicy::AlwaysListen);
    }

    #[test]
    fn section_height_cycle_remounts() {
        let mut s = state();
        SETTINGS_ITEMS[1].activate(&mut s);
        assert_eq!(s.config.section_height_multiplier, 4.0);
        assert_eq!(s.page.section_height(), 160.0);
        assert_eq!(s.status_message.as_deref(), Some("Section height: 4× viewport"));
    }

    #[test]
    fn transition_cycle_updates_duration() {
        let mut s = state();
        SETTINGS_ITEMS[2].activate(&mut s);
        assert_eq!(s.config.animation_duration, Duration::from_millis(800));
        assert_eq!(SETTINGS_ITEMS[2].value(&s), "800ms");
    }
}
