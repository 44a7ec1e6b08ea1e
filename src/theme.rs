use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Dark,
    SolarizedDark,
}

impl Theme {
    pub fn next(self) -> Theme {
        match self {
            Theme::Dark => Theme::SolarizedDark,
            Theme::SolarizedDark => Theme::Dark,
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            Theme::SolarizedDark => Scheme {
                background: Solarized::Base03.to_color(),
                notification: Style::default()
                    .fg(Solarized::Base1.to_color())
                    .bg(Solarized::Base02.to_color()),
                notification_dismiss_link: Style::default().add_modifier(Modifier::BOLD),
                status: Style::default().fg(Solarized::Base01.to_color()),
                command_input: Style::default()
                    .fg(Solarized::Base1.to_color())
                    .bg(Solarized::Base02.to_color()),
            },
            Theme::Dark => Scheme {
                background: Color::Rgb(0, 0, 0),
                // white at 20% over black
                notification: Style::default()
                    .fg(Color::Rgb(255, 255, 255))
                    .bg(Color::Rgb(51, 51, 51)),
                notification_dismiss_link: Style::default().add_modifier(Modifier::BOLD),
                status: Style::default().fg(Color::DarkGray),
                command_input: Style::default().fg(Color::Black).bg(Color::Yellow),
            },
        }
    }
}

pub struct Scheme {
    /// Color the notification fades into.
    pub background: Color,

    pub notification: Style,
    pub notification_dismiss_link: Style,

    pub status: Style,
    pub command_input: Style,
}

pub enum Solarized {
    Base03,
    Base02,
    Base01,
    Base1,
}

impl Solarized {
    fn to_color(&self) -> Color {
        match self {
            Solarized::Base03 => Color::Rgb(0, 43, 54),
            Solarized::Base02 => Color::Rgb(7, 54, 66),
            Solarized::Base01 => Color::Rgb(88, 110, 117),
            Solarized::Base1 => Color::Rgb(147, 161, 161),
        }
    }
}
