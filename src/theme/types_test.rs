use super::*;

// =============================================================
// Theme
// =============================================================

#[test]
fn theme_default_is_light() {
    assert_eq!(Theme::default(), Theme::Light);
}

#[test]
fn theme_parses_only_exact_literals() {
    assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
    assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    assert!("Dark".parse::<Theme>().is_err());
    assert!(" dark".parse::<Theme>().is_err());
    assert!("".parse::<Theme>().is_err());
}

#[test]
fn theme_parse_error_names_the_input() {
    let err = "sepia".parse::<Theme>().unwrap_err();
    assert_eq!(err, ThemeParseError("sepia".into()));
    assert!(err.to_string().contains("sepia"));
}

#[test]
fn theme_display_matches_storage_literal() {
    for theme in [Theme::Light, Theme::Dark] {
        assert_eq!(theme.to_string(), theme.as_str());
        assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
    }
}

#[test]
fn toggled_is_an_involution() {
    for theme in [Theme::Light, Theme::Dark] {
        assert_ne!(theme.toggled(), theme);
        assert_eq!(theme.toggled().toggled(), theme);
    }
}

#[test]
fn from_prefers_dark_maps_both_values() {
    assert_eq!(Theme::from_prefers_dark(true), Theme::Dark);
    assert_eq!(Theme::from_prefers_dark(false), Theme::Light);
}

#[test]
fn theme_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    assert_eq!(serde_json::from_str::<Theme>("\"light\"").unwrap(), Theme::Light);
}

// =============================================================
// ThemeChange
// =============================================================

#[test]
fn theme_change_flags_follow_theme() {
    let dark = ThemeChange::new(Theme::Dark);
    assert!(dark.is_dark);
    assert!(!dark.is_light);

    let light = ThemeChange::new(Theme::Light);
    assert!(!light.is_dark);
    assert!(light.is_light);
}

#[test]
fn theme_change_serializes_as_event_detail() {
    let value = serde_json::to_value(ThemeChange::new(Theme::Dark)).unwrap();
    assert_eq!(value, serde_json::json!({ "theme": "dark", "isDark": true, "isLight": false }));
}

// =============================================================
// ToggleLabel
// =============================================================

#[test]
fn toggle_label_offers_the_other_mode() {
    assert_eq!(ToggleLabel::for_theme(Theme::Dark).text, "Light Mode");
    assert_eq!(ToggleLabel::for_theme(Theme::Light).text, "Dark Mode");
}

#[test]
fn toggle_label_render_joins_icon_and_text() {
    let label = ToggleLabel::for_theme(Theme::Light);
    assert_eq!(label.render(), format!("{} Dark Mode", label.icon));
}

// =============================================================
// KeyInput
// =============================================================

#[test]
fn enter_and_space_activate_toggle() {
    assert!(KeyInput::new("Enter").is_toggle_activation());
    assert!(KeyInput::new(" ").is_toggle_activation());
    assert!(!KeyInput::new("Tab").is_toggle_activation());
}

#[test]
fn global_shortcut_requires_modifier_and_shift() {
    assert!(KeyInput::new("D").with_ctrl().with_shift().is_global_shortcut());
    assert!(KeyInput::new("D").with_meta().with_shift().is_global_shortcut());
    assert!(!KeyInput::new("D").with_shift().is_global_shortcut());
    assert!(!KeyInput::new("D").with_ctrl().is_global_shortcut());
    assert!(!KeyInput::new("d").with_ctrl().with_shift().is_global_shortcut());
}
