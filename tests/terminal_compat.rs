//! Integration tests for terminal/multiplexer capability profiles and the
//! `NO_COLOR` convention, exercised through the crate's public API.

use cellgrid::terminal::{ColorSupport, MultiplexerKind, TerminalKind, merge_multiplexer_limits, profile_for};

#[test]
fn iterm2_capabilities() {
    let caps = profile_for(TerminalKind::ITerm2);
    assert_eq!(caps.color, ColorSupport::TrueColor);
    assert!(caps.synchronized_output);
    assert!(caps.hyperlinks);
    assert!(!caps.kitty_keyboard);
}

#[test]
fn kitty_capabilities_with_keyboard_protocol() {
    let caps = profile_for(TerminalKind::Kitty);
    assert_eq!(caps.color, ColorSupport::TrueColor);
    assert!(caps.kitty_keyboard);
}

#[test]
fn alacritty_has_no_hyperlinks_or_sync_output() {
    let caps = profile_for(TerminalKind::Alacritty);
    assert_eq!(caps.color, ColorSupport::TrueColor);
    assert!(!caps.synchronized_output);
    assert!(!caps.hyperlinks);
}

#[test]
fn wezterm_has_the_full_feature_set() {
    let caps = profile_for(TerminalKind::WezTerm);
    assert!(caps.synchronized_output);
    assert!(caps.kitty_keyboard);
    assert!(caps.hyperlinks);
    assert!(caps.sixel);
}

#[test]
fn terminal_app_is_limited_to_16_colors() {
    let caps = profile_for(TerminalKind::TerminalApp);
    assert_eq!(caps.color, ColorSupport::Basic16);
    assert!(!caps.bracketed_paste);
}

#[test]
fn unknown_terminal_gets_the_conservative_profile() {
    let caps = profile_for(TerminalKind::Unknown);
    assert_eq!(caps.color, ColorSupport::Basic16);
    assert!(!caps.synchronized_output);
    assert!(!caps.hyperlinks);
    assert!(caps.unicode);
    assert!(caps.mouse);
}

#[test]
fn tmux_disables_synchronized_output_but_preserves_color() {
    let kitty = profile_for(TerminalKind::Kitty);
    let tmux_kitty = merge_multiplexer_limits(kitty, MultiplexerKind::Tmux);
    assert!(!tmux_kitty.synchronized_output);
    assert!(tmux_kitty.kitty_keyboard);
    assert_eq!(tmux_kitty.color, ColorSupport::TrueColor);
}

#[test]
fn screen_downgrades_truecolor_and_strips_advanced_features() {
    let kitty = profile_for(TerminalKind::Kitty);
    let screen_kitty = merge_multiplexer_limits(kitty, MultiplexerKind::Screen);
    assert_eq!(screen_kitty.color, ColorSupport::Extended256);
    assert!(!screen_kitty.kitty_keyboard);
    assert!(!screen_kitty.hyperlinks);
    assert!(screen_kitty.unicode);
}

#[test]
fn screen_does_not_downgrade_an_already_256_color_terminal() {
    let xterm = profile_for(TerminalKind::Xterm);
    assert_eq!(xterm.color, ColorSupport::Extended256);
    let screen_xterm = merge_multiplexer_limits(xterm, MultiplexerKind::Screen);
    assert_eq!(screen_xterm.color, ColorSupport::Extended256);
}

#[test]
fn zellij_is_fully_transparent_to_capabilities() {
    let kitty = profile_for(TerminalKind::Kitty);
    let zellij_kitty = merge_multiplexer_limits(kitty.clone(), MultiplexerKind::Zellij);
    assert_eq!(kitty, zellij_kitty);
}

#[test]
fn no_color_forces_the_encoder_to_drop_rgb_sequences() {
    use cellgrid::buffer::CellChange;
    use cellgrid::cell::Cell;
    use cellgrid::color::Color;
    use cellgrid::encoder::Encoder;
    use cellgrid::style::Style;

    let style = Style::new().fg(Color::Rgb { r: 255, g: 0, b: 0 });
    let changes = vec![CellChange {
        x: 0,
        y: 0,
        cell: Cell::new("X", style),
    }];

    unsafe {
        std::env::remove_var("NO_COLOR");
    }
    let mut plain = Encoder::new(ColorSupport::TrueColor);
    let without_no_color = String::from_utf8(plain.encode_diff(&changes)).unwrap();

    unsafe {
        std::env::set_var("NO_COLOR", "1");
    }
    let mut muted = Encoder::new(ColorSupport::TrueColor);
    let with_no_color = String::from_utf8(muted.encode_diff(&changes)).unwrap();
    unsafe {
        std::env::remove_var("NO_COLOR");
    }

    assert!(without_no_color.contains("\x1b[38;2;"));
    assert!(!with_no_color.contains("\x1b[38;2;"));
}
