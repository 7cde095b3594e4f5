mod settings;

pub use settings::{parse_origin_list, OtelConfig, ServerConfig, Settings, TelegramConfig};
