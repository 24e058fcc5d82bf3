use ai_image_stylist::utils::settings;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod style;
mod ui;

/// Logs to stderr and, when a per-user data directory exists, to a daily
/// rolling file. The returned guard must live as long as the app.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_dir = settings::log_dir();

    let (file_layer, guard) = match &log_dir {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ai-image-stylist.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    match log_dir {
        Ok(dir) => info!("Writing logs to {}", dir.display()),
        Err(e) => error!("File logging disabled: {:#}", e),
    }

    guard
}

pub fn main() -> iced::Result {
    let _guard = init_logging();

    iced::application(ui::ImageStylist::new, ui::ImageStylist::update, ui::ImageStylist::view)
        .title(ui::ImageStylist::title)
        .subscription(ui::ImageStylist::subscription)
        .window_size(iced::Size::new(1200f32, 820f32))
        .theme(|_: &ui::ImageStylist| style::custom_theme())
        .centered()
        .run()
}
