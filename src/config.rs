use std::time::Duration;

use clap::Parser;
use ratatui::style::Color;

use crate::notification::NotificationProps;
use crate::theme::Theme;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Message to show
    #[arg(short, long, default_value = "Saved")]
    pub text: String,
    /// Dismiss automatically after this many milliseconds (0 disables)
    #[arg(short, long)]
    pub dismiss_after: Option<u64>,
    /// Show a [x] which dismisses the notification
    #[arg(long)]
    pub dismissable: bool,
    /// Color name or #rrggbb
    #[arg(long)]
    pub background_color: Option<Color>,
    #[arg(long)]
    pub color: Option<Color>,
    #[arg(long)]
    pub dismiss_color: Option<Color>,
    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,
    /// Log to this file
    #[arg(short, long)]
    pub log: Option<String>,
}

pub fn load_config() -> Config {
    let args = Args::parse();
    Config {
        text: args.text,
        dismiss_after: args.dismiss_after.map(Duration::from_millis),
        dismissable: args.dismissable,
        background_color: args.background_color,
        color: args.color,
        dismiss_color: args.dismiss_color,
        theme: args.theme,
        log_path: args.log,
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub text: String,
    pub dismiss_after: Option<Duration>,
    pub dismissable: bool,
    pub background_color: Option<Color>,
    pub color: Option<Color>,
    pub dismiss_color: Option<Color>,
    pub theme: Theme,
    pub log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new("Saved".to_string())
    }
}

impl Config {
    pub fn new(text: String) -> Config {
        Config {
            text,
            dismiss_after: None,
            dismissable: true,
            background_color: None,
            color: None,
            dismiss_color: None,
            theme: Theme::Dark,
            log_path: None,
        }
    }

    /// Props for the notification mounted at startup.
    pub fn props(&self) -> NotificationProps {
        NotificationProps {
            text: self.text.clone(),
            background_color: self.background_color,
            color: self.color,
            user_dismiss_color: self.dismiss_color,
            user_dismissable: self.dismissable,
            dismiss_after: self.dismiss_after,
            ..NotificationProps::default()
        }
    }
}
