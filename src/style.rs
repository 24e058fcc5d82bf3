use iced::widget::{button, container, text_input};
use iced::{Border, Color, Theme};
use std::sync::Arc;

// Main theme colors
pub const PRIMARY: Color = Color::from_rgb(0.15, 0.39, 0.92);
pub const ACCENT: Color = Color::from_rgb(0.13, 0.83, 0.93);
pub const BACKGROUND: Color = Color::from_rgb(0.07, 0.09, 0.15);
pub const TEXT: Color = Color::from_rgb(0.9, 0.9, 0.9);
pub const MUTED: Color = Color::from_rgb(0.6, 0.63, 0.68);
pub const ERROR: Color = Color::from_rgb(0.97, 0.44, 0.44);
pub const SUCCESS: Color = Color::from_rgb(0.0, 0.8, 0.3);
pub const WARNING: Color = Color::from_rgb(0.9, 0.6, 0.0);

pub fn custom_theme() -> Theme {
    let palette = iced::theme::Palette {
        background: BACKGROUND,
        text: TEXT,
        primary: PRIMARY,
        success: SUCCESS,
        danger: ERROR,
        warning: WARNING,
    };

    Theme::Custom(Arc::new(iced::theme::Custom::new(
        "stylist-dark".to_string(),
        palette,
    )))
}

pub fn main_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        text_color: Some(TEXT),
        ..container::Style::default()
    }
}

pub fn bordered_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            width: 1.0,
            radius: 12.0.into(),
            color: palette.background.strong.color,
        },
        ..container::Style::default()
    }
}

// Backdrop behind the API key dialog
pub fn backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.75).into()),
        ..container::Style::default()
    }
}

pub fn dialog_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        text_color: Some(TEXT),
        border: Border {
            width: 1.0,
            radius: 12.0.into(),
            color: palette.background.strong.color,
        },
        ..container::Style::default()
    }
}

// Empty dropzone; highlighted while a file is dragged over the window
pub fn dropzone(dragging: bool) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();

        container::Style {
            background: Some(if dragging {
                palette.background.strong.color.into()
            } else {
                palette.background.weak.color.into()
            }),
            text_color: Some(MUTED),
            border: Border {
                width: 2.0,
                radius: 12.0.into(),
                color: if dragging {
                    PRIMARY
                } else {
                    palette.background.strong.color
                },
            },
            ..container::Style::default()
        }
    }
}

// Small dark label drawn over images
pub fn image_label(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.5).into()),
        text_color: Some(Color::WHITE),
        border: Border {
            radius: 4.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

// Selected entry of a segmented control (mode, aspect ratio)
pub fn segment(selected: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme: &Theme, status: button::Status| {
        if selected {
            button::primary(theme, status)
        } else {
            button::secondary(theme, status)
        }
    }
}

pub fn default_text_input(
    theme: &Theme,
    _status: iced::widget::text_input::Status,
) -> text_input::Style {
    let palette = theme.extended_palette();

    text_input::Style {
        background: palette.background.strong.color.into(),
        border: Border {
            radius: 8.0.into(),
            width: 1.0,
            color: palette.background.strongest.color,
        },
        icon: TEXT,
        placeholder: MUTED,
        value: TEXT,
        selection: palette.primary.weak.color,
    }
}
